//! Append-only event log for the Verinum registry.
//!
//! Every state transition the registry performs lands here as a typed,
//! timestamped, sequence-numbered record. The log is the sole notification
//! channel in the system: verifiers discover selection and requesters
//! discover resolution by subscribing (live) or replaying (history).

pub mod log;
pub mod record;

pub use log::EventLog;
pub use record::{EventFilter, EventKind, EventRecord, RegistryEvent};
