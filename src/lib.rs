//! Staff user administration panel.
//!
//! Drives the `/staff/usr` REST endpoints (create, edit, delete) and keeps a
//! table of users in step with what the server confirmed, surfacing each
//! outcome as a success or error banner.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod notify;
pub mod panel;
pub mod table;
pub mod templates;
pub mod util;

pub use controller::UserTableController;
pub use error::{ApiError, PanelError};
