//! IPAM Console Library
//!
//! Web server, backend proxy and terminal commands for the IPAM console.

pub mod cli;
pub mod error;
pub mod server;

pub use error::ConsoleError;
pub use server::{create_router, AppState};
