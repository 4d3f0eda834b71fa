//! Lampioni Engine library.
//!
//! This crate contains all server-side code for the Lampioni map engine.
//!
//! ## Structure
//!
//! - `use_cases/` - The temporal filter and layer operations
//! - `infrastructure/` - Port traits and the file-backed data store
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by the unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
