//! RPTRA Core - Shared types library.
//!
//! This crate provides common types used across the RPTRA components:
//! - `admin` - Staff-facing administration panel
//! - the public informational website (served separately)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, identity ids, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
