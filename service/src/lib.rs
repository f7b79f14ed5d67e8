//! Registry service — runs the core state machine behind a single writer.
//!
//! The registry itself is synchronous; this crate gives it the concurrency
//! discipline the protocol requires: one task owns the registry and applies
//! commands from a channel in arrival order, so every mutation is atomic
//! and totally ordered. Also home to configuration loading, logging setup,
//! and graceful shutdown.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod shutdown;

pub use config::RegistryConfig;
pub use error::ServiceError;
pub use logging::{init_logging, LogFormat};
pub use service::{RegistryHandle, RegistryService};
pub use shutdown::ShutdownController;
