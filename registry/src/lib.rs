//! Verinum verification registry core.
//!
//! The registry is a single globally-ordered state machine: a requester
//! submits a phone number, a pseudo-randomly selected panel of verifiers
//! commits challenges against it, and the requester's response either earns
//! the ownership proof (revoking any stale one) or fails the request.
//! Callers are untrusted; every operation authenticates the acting identity
//! against the request it touches.

pub mod error;
pub mod ownership;
pub mod panel;
pub mod policy;
pub mod registry;
pub mod request;

pub use error::RegistryError;
pub use ownership::OwnershipLedger;
pub use panel::{ChainedSeed, FixedSeed, SeedSource, VerifierPanel};
pub use policy::ResolutionPolicy;
pub use registry::{RequestRegistry, ResponseOutcome};
pub use request::{ChallengeSlot, ChallengeState, RequestStatus, VerificationRequest};
