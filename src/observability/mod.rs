//! # Observability Infrastructure
//!
//! Structured logging for the migration flows.

pub mod logging;

pub use logging::{init_logging, LogFormat};
