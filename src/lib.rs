//! VeloCollab State - application state, notifications and request tracking
//! for the VeloCollab dashboard.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod models;
pub mod queries;
pub mod state;
pub mod traits;

mod util;
