//! Domain models for the admin panel.

pub mod admin_profile;
pub mod session;

pub use admin_profile::AdminProfile;
pub use session::{Identity, SessionPhase, SessionSnapshot};
