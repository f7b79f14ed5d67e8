//! Canonical digests for phone numbers and challenge commitments.
//!
//! Both sides of the protocol hash through these functions: the verifier
//! when committing to a secret, and the registry when checking the
//! requester's response. The encodings below are therefore part of the wire
//! contract — any divergence means no response ever validates.

use crate::hash::blake2b_256_multi;
use verinum_types::{AccountId, CommitmentHash, PhoneNumber, PhoneNumberHash};

/// Domain tag for phone-number digests.
const PHONE_TAG: &[u8] = b"verinum.phone.v1";

/// Domain tag for challenge commitments.
const COMMITMENT_TAG: &[u8] = b"verinum.commitment.v1";

/// Compute the canonical hash of a phone number.
///
/// Encoding: domain tag, country code byte, subscriber number as 8-byte
/// big-endian. Ownership records and event payloads are keyed by this
/// digest, never by the raw number.
pub fn phone_number_hash(phone: &PhoneNumber) -> PhoneNumberHash {
    let number = phone.number().to_be_bytes();
    PhoneNumberHash::new(blake2b_256_multi(&[
        PHONE_TAG,
        &[phone.country_code()],
        &number,
    ]))
}

/// Compute the commitment hash binding a verifier's challenge to a secret.
///
/// Encoding: domain tag, then the ordered tuple
/// `(verifier, requester, country code, number, secret code)`. The two
/// identity strings are length-prefixed (u16 big-endian) so that
/// variable-length ids cannot alias each other; the numeric fields are
/// fixed-width big-endian.
pub fn commitment_hash(
    verifier: &AccountId,
    requester: &AccountId,
    phone: &PhoneNumber,
    secret_code: u32,
) -> CommitmentHash {
    let verifier_len = (verifier.as_bytes().len() as u16).to_be_bytes();
    let requester_len = (requester.as_bytes().len() as u16).to_be_bytes();
    let number = phone.number().to_be_bytes();
    let secret = secret_code.to_be_bytes();

    CommitmentHash::new(blake2b_256_multi(&[
        COMMITMENT_TAG,
        &verifier_len,
        verifier.as_bytes(),
        &requester_len,
        requester.as_bytes(),
        &[phone.country_code()],
        &number,
        &secret,
    ]))
}
