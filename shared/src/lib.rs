//! Shared types for the IPAM UI and console
//!
//! This crate contains common types used across the IPAM console:
//! - Network and device wire models
//! - Backend endpoint layout for both API revisions
//! - The cancellable ping walk

pub mod api;
pub mod models;
pub mod walk;

pub use api::*;
pub use models::*;
