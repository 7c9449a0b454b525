//! UI Components
//!
//! This module contains all UI components organized by page:
//! - `networks`: Confirmed and staged network tables, edit and split modals
//! - `devices`: Device table, device edit modal, ping walk toggle
//! - `common`: Shared/reusable components

pub mod common;
pub mod devices;
pub mod networks;
