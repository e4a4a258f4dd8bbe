//! Domain type wrappers.
//!
//! Newtypes prevent accidentally mixing raw strings for emails, provider
//! uids, and roles. All validation happens at the boundary when a value is
//! parsed; once constructed a value is known good.

mod email;
mod id;
mod role;

pub use email::{Email, EmailError};
pub use id::IdentityId;
pub use role::AdminRole;
