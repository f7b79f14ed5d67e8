//! Multi-verifier resolution policy.
//!
//! With a panel larger than one, how individual challenge outcomes combine
//! into the request outcome is a protocol choice, not something the data
//! model forces. The policy is explicit and configured at construction.

use crate::request::{ChallengeState, VerificationRequest};
use serde::{Deserialize, Serialize};

/// How per-verifier challenge outcomes resolve a whole request.
///
/// A mismatch always fails the request immediately under either policy; the
/// policies differ only in when a match is enough to succeed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// The first response decides the request. With panel size 1 the two
    /// policies coincide; this is the default.
    #[default]
    FirstOutcome,
    /// Every panel member must have recorded a commitment and had its
    /// challenge completed before the request succeeds.
    RequireAll,
}

impl ResolutionPolicy {
    /// Whether a just-completed challenge makes the request succeed now.
    pub fn is_satisfied(&self, request: &VerificationRequest) -> bool {
        match self {
            Self::FirstOutcome => true,
            Self::RequireAll => request.panel.iter().all(|verifier| {
                request
                    .challenges
                    .get(verifier)
                    .is_some_and(|slot| slot.state == ChallengeState::Completed)
            }),
        }
    }
}
