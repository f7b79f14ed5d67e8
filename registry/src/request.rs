//! Verification request state tracking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use verinum_types::{AccountId, CommitmentHash, PhoneNumber, RequestId, Timestamp};

/// The lifecycle of one verification request.
///
/// Created by request submission, mutated only by panel members (recording
/// a commitment) and by the requester (responding to a challenge). Never
/// deleted; resolved requests remain as history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: RequestId,
    /// The identity that submitted the request; the only one allowed to
    /// respond to its challenges.
    pub requester: AccountId,
    pub phone_number: PhoneNumber,
    /// The verifiers assigned to adjudicate this request.
    pub panel: Vec<AccountId>,
    /// Challenge commitments recorded so far, keyed by verifier.
    pub challenges: HashMap<AccountId, ChallengeSlot>,
    pub status: RequestStatus,
    pub submitted_at: Timestamp,
}

impl VerificationRequest {
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }

    pub fn is_panel_member(&self, account: &AccountId) -> bool {
        self.panel.contains(account)
    }
}

/// Terminal-state machine: transitions only `Open -> Succeeded` and
/// `Open -> Failed`, never reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Open,
    Succeeded,
    Failed,
}

/// One verifier's challenge on a request: the commitment and whether the
/// requester has resolved it yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChallengeSlot {
    pub commitment: CommitmentHash,
    pub state: ChallengeState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeState {
    /// Commitment recorded, awaiting the requester's response.
    Pending,
    /// The requester's response matched the commitment.
    Completed,
    /// The requester's response did not match the commitment.
    Failed,
}
