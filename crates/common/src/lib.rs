//! Segue Common Utilities
//!
//! Shared infrastructure for all Segue crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading and editor defaults

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
