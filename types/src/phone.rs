//! Phone number value type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest subscriber number the registry accepts (40 bits).
pub const MAX_SUBSCRIBER_NUMBER: u64 = (1 << 40) - 1;

/// A phone number as a `(country code, subscriber number)` pair.
///
/// Treated strictly as a value: ownership is always keyed by the canonical
/// hash of the encoded pair, never by the raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    country_code: u8,
    number: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("country code must be non-zero")]
    ZeroCountryCode,

    #[error("subscriber number {0} exceeds 40 bits")]
    NumberTooLarge(u64),
}

impl PhoneNumber {
    /// Create a phone number, validating the 40-bit subscriber bound.
    pub fn new(country_code: u8, number: u64) -> Result<Self, PhoneNumberError> {
        if country_code == 0 {
            return Err(PhoneNumberError::ZeroCountryCode);
        }
        if number > MAX_SUBSCRIBER_NUMBER {
            return Err(PhoneNumberError::NumberTooLarge(number));
        }
        Ok(Self {
            country_code,
            number,
        })
    }

    pub fn country_code(&self) -> u8 {
        self.country_code
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} {}", self.country_code, self.number)
    }
}
