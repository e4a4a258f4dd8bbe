//! RPTRA Admin library.
//!
//! This crate provides the staff-facing admin panel as a library, allowing
//! it to be tested and reused.
//!
//! The heart of the crate is the admin session subsystem: a process-local
//! session manager that tracks the currently signed-in identity, resolves
//! whether it is an active admin against the allow-list and profile store,
//! and gates every protected route on the resolved session. Content
//! management screens consume the session read-only; they mutate it only
//! through `sign_in` / `sign_out`.
//!
//! # Security
//!
//! Authorization fails closed everywhere: a backend error, a missing
//! profile, a deactivated profile, or a resolution timeout all resolve to
//! "not an admin".

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod idp;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
