//! Terminal client for a task-comments REST backend.
//!
//! The binary in `main.rs` wires these modules to a crossterm terminal; the
//! library split lets integration tests drive the API client and store
//! against a mock server.

pub mod api;
pub mod app;
pub mod config;
pub mod editor;
pub mod form;
pub mod input;
pub mod pagination;
pub mod store;
pub mod toast;
pub mod ui;
