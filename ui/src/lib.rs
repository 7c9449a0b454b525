//! IPAM UI Library
//!
//! Browser front-end for an IP address management backend, compiled to
//! WebAssembly.
//!
//! # Architecture
//!
//! New networks are staged in an in-memory table, sent one at a time or all
//! at once, and moved into the confirmed table as the backend accepts them.
//! The same pages edit networks and devices, split networks into subnets,
//! and ping devices, singly or as a cancellable walk.
//!
//! # Modules
//!
//! - [`app`]: Root application component and routing
//! - [`client`]: Backend abstraction ([`client::IpamClient`], `fetch`-based [`client::HttpClient`])
//! - [`staging`]: Staged and confirmed table models
//! - [`state`]: Page sessions holding those tables as signals
//! - [`components`]: UI components

pub mod app;
pub mod client;
pub mod components;
pub mod staging;
pub mod state;

pub use app::App;
