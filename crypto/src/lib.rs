//! Hashing primitives for the Verinum registry.
//!
//! Blake2b-256 everywhere: the canonical phone-number digest that keys
//! ownership records, and the commitment one-way function that binds a
//! verifier's challenge to a secret without revealing it.

pub mod commitment;
pub mod hash;

pub use commitment::{commitment_hash, phone_number_hash};
pub use hash::{blake2b_256, blake2b_256_multi};
