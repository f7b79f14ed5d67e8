//! Fundamental types for the Verinum registry.
//!
//! Everything here is a plain value type: identities, phone numbers, the
//! fixed-width digests used for ownership and commitments, and timestamps.
//! No logic beyond construction-time validation lives in this crate.

pub mod hash;
pub mod identity;
pub mod phone;
pub mod time;

pub use hash::{CommitmentHash, PhoneNumberHash};
pub use identity::AccountId;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use time::Timestamp;

/// Identifier of a verification request. Allocated sequentially starting at
/// [`FIRST_REQUEST_ID`]; never reused.
pub type RequestId = u64;

/// The id assigned to the first request a registry creates.
pub const FIRST_REQUEST_ID: RequestId = 1;
