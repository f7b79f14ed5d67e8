//! Event record types and subscription filters.

use serde::{Deserialize, Serialize};
use verinum_types::{AccountId, PhoneNumberHash, RequestId, Timestamp};

/// A registry state transition.
///
/// Payloads carry the phone-number hash, never the raw number: event size
/// stays fixed and consumers can index by number without learning it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A new verification request was created.
    VerificationRequested {
        request_id: RequestId,
        requester: AccountId,
        phone_hash: PhoneNumberHash,
    },
    /// A verifier was assigned to a request's panel.
    VerifierSelected {
        request_id: RequestId,
        verifier: AccountId,
    },
    /// A panel member recorded a challenge commitment.
    ChallengeRecorded {
        request_id: RequestId,
        verifier: AccountId,
    },
    /// A requester's response matched a verifier's commitment.
    ChallengeCompleted {
        request_id: RequestId,
        verifier: AccountId,
    },
    /// A requester's response did not match a verifier's commitment.
    ChallengeFailed {
        request_id: RequestId,
        verifier: AccountId,
    },
    /// A request resolved successfully — ownership was issued.
    VerificationSucceeded {
        request_id: RequestId,
        requester: AccountId,
        phone_hash: PhoneNumberHash,
    },
    /// A request resolved unsuccessfully — no ownership change.
    VerificationFailed {
        request_id: RequestId,
        requester: AccountId,
        phone_hash: PhoneNumberHash,
    },
    /// A previous owner's proof was revoked by a new successful verification.
    OwnershipRevoked {
        previous_owner: AccountId,
        phone_hash: PhoneNumberHash,
    },
}

/// Discriminant of a [`RegistryEvent`], used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    VerificationRequested,
    VerifierSelected,
    ChallengeRecorded,
    ChallengeCompleted,
    ChallengeFailed,
    VerificationSucceeded,
    VerificationFailed,
    OwnershipRevoked,
}

impl RegistryEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::VerificationRequested { .. } => EventKind::VerificationRequested,
            Self::VerifierSelected { .. } => EventKind::VerifierSelected,
            Self::ChallengeRecorded { .. } => EventKind::ChallengeRecorded,
            Self::ChallengeCompleted { .. } => EventKind::ChallengeCompleted,
            Self::ChallengeFailed { .. } => EventKind::ChallengeFailed,
            Self::VerificationSucceeded { .. } => EventKind::VerificationSucceeded,
            Self::VerificationFailed { .. } => EventKind::VerificationFailed,
            Self::OwnershipRevoked { .. } => EventKind::OwnershipRevoked,
        }
    }

    /// The request this event belongs to, if any (revocations have none).
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::VerificationRequested { request_id, .. }
            | Self::VerifierSelected { request_id, .. }
            | Self::ChallengeRecorded { request_id, .. }
            | Self::ChallengeCompleted { request_id, .. }
            | Self::ChallengeFailed { request_id, .. }
            | Self::VerificationSucceeded { request_id, .. }
            | Self::VerificationFailed { request_id, .. } => Some(*request_id),
            Self::OwnershipRevoked { .. } => None,
        }
    }

    /// The phone-number hash carried by this event, if any.
    pub fn phone_hash(&self) -> Option<PhoneNumberHash> {
        match self {
            Self::VerificationRequested { phone_hash, .. }
            | Self::VerificationSucceeded { phone_hash, .. }
            | Self::VerificationFailed { phone_hash, .. }
            | Self::OwnershipRevoked { phone_hash, .. } => Some(*phone_hash),
            _ => None,
        }
    }

    /// The acting or affected identity, where one is indexed.
    pub fn account(&self) -> Option<&AccountId> {
        match self {
            Self::VerificationRequested { requester, .. }
            | Self::VerificationSucceeded { requester, .. }
            | Self::VerificationFailed { requester, .. } => Some(requester),
            Self::VerifierSelected { verifier, .. }
            | Self::ChallengeRecorded { verifier, .. }
            | Self::ChallengeCompleted { verifier, .. }
            | Self::ChallengeFailed { verifier, .. } => Some(verifier),
            Self::OwnershipRevoked { previous_owner, .. } => Some(previous_owner),
        }
    }
}

/// An event together with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Append order, starting at 0; dense and strictly increasing.
    pub seq: u64,
    pub timestamp: Timestamp,
    pub event: RegistryEvent,
}

/// A conjunctive filter over event records.
///
/// `None` fields match everything; set fields must all match. Consumers pass
/// this to [`crate::EventLog::replay`] and apply it to live subscriptions
/// ("verifier selected for me", "events about my request").
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    pub kind: Option<EventKind>,
    pub request_id: Option<RequestId>,
    pub phone_hash: Option<PhoneNumberHash>,
    pub account: Option<AccountId>,
}

impl EventFilter {
    /// Match every event.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn phone_hash(mut self, phone_hash: PhoneNumberHash) -> Self {
        self.phone_hash = Some(phone_hash);
        self
    }

    pub fn account(mut self, account: AccountId) -> Self {
        self.account = Some(account);
        self
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        if let Some(kind) = self.kind {
            if record.event.kind() != kind {
                return false;
            }
        }
        if let Some(request_id) = self.request_id {
            if record.event.request_id() != Some(request_id) {
                return false;
            }
        }
        if let Some(phone_hash) = self.phone_hash {
            if record.event.phone_hash() != Some(phone_hash) {
                return false;
            }
        }
        if let Some(ref account) = self.account {
            if record.event.account() != Some(account) {
                return false;
            }
        }
        true
    }
}
