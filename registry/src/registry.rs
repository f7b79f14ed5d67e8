//! Request registry — orchestrates the full verification lifecycle.
//!
//! Connects panel selection, challenge bookkeeping, response resolution, and
//! ownership transfer into one state machine, announcing every transition on
//! the event log. Mutations are `&mut self`: callers serialize them (the
//! service layer runs a single writer), which is what makes every operation
//! atomic and totally ordered.

use crate::error::RegistryError;
use crate::ownership::OwnershipLedger;
use crate::panel::{SeedSource, VerifierPanel};
use crate::policy::ResolutionPolicy;
use crate::request::{ChallengeSlot, ChallengeState, RequestStatus, VerificationRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use verinum_crypto::{commitment_hash, phone_number_hash};
use verinum_events::{EventLog, RegistryEvent};
use verinum_types::{
    AccountId, CommitmentHash, PhoneNumber, PhoneNumberHash, RequestId, Timestamp,
    FIRST_REQUEST_ID,
};

/// The result of a response submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The request resolved successfully; ownership was transferred.
    Succeeded,
    /// The request resolved unsuccessfully; ownership is unchanged.
    Failed,
    /// The challenge completed but the resolution policy is waiting on
    /// further panel members.
    Pending,
}

/// The verification registry state machine.
pub struct RequestRegistry {
    panel: VerifierPanel,
    ownership: OwnershipLedger,
    policy: ResolutionPolicy,
    seed_source: Box<dyn SeedSource>,
    requests: HashMap<RequestId, VerificationRequest>,
    next_id: RequestId,
    events: Arc<EventLog>,
}

impl RequestRegistry {
    pub fn new(
        panel: VerifierPanel,
        policy: ResolutionPolicy,
        seed_source: Box<dyn SeedSource>,
        events: Arc<EventLog>,
    ) -> Self {
        Self {
            panel,
            ownership: OwnershipLedger::new(),
            policy,
            seed_source,
            requests: HashMap::new(),
            next_id: FIRST_REQUEST_ID,
            events,
        }
    }

    /// Submit a verification request for `phone_number`.
    ///
    /// Always succeeds for a well-formed number: allocates the next id,
    /// selects the panel, and announces the request plus one selection event
    /// per panel member. A requester may hold any number of concurrent open
    /// requests, including for the same number.
    pub fn submit_request(&mut self, caller: &AccountId, phone_number: PhoneNumber) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;

        let phone_hash = phone_number_hash(&phone_number);
        let seed = self.seed_source.seed(&seed_context(id, caller, &phone_hash));
        let panel = self.panel.select_panel(&seed);

        info!(request_id = id, requester = %caller, %phone_hash, "verification requested");

        self.events.append(RegistryEvent::VerificationRequested {
            request_id: id,
            requester: caller.clone(),
            phone_hash,
        });
        for verifier in &panel {
            debug!(request_id = id, %verifier, "verifier selected");
            self.events.append(RegistryEvent::VerifierSelected {
                request_id: id,
                verifier: verifier.clone(),
            });
        }

        self.requests.insert(
            id,
            VerificationRequest {
                id,
                requester: caller.clone(),
                phone_number,
                panel,
                challenges: HashMap::new(),
                status: RequestStatus::Open,
                submitted_at: Timestamp::now(),
            },
        );

        id
    }

    /// Record a verifier's challenge commitment against an open request.
    ///
    /// The caller must be on the request's panel and must not have committed
    /// already. Does not change the request status.
    pub fn record_challenge(
        &mut self,
        caller: &AccountId,
        request_id: RequestId,
        commitment: CommitmentHash,
    ) -> Result<(), RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::RequestNotFound(request_id))?;

        if !request.is_open() {
            return Err(RegistryError::AlreadyResolved(request_id));
        }
        if !request.is_panel_member(caller) {
            return Err(RegistryError::Unauthorized {
                request_id,
                caller: caller.to_string(),
                action: "record a challenge on",
            });
        }
        if request.challenges.contains_key(caller) {
            return Err(RegistryError::AlreadyRecorded {
                request_id,
                verifier: caller.to_string(),
            });
        }

        request.challenges.insert(
            caller.clone(),
            ChallengeSlot {
                commitment,
                state: ChallengeState::Pending,
            },
        );

        info!(request_id, verifier = %caller, "challenge recorded");
        self.events.append(RegistryEvent::ChallengeRecorded {
            request_id,
            verifier: caller.clone(),
        });

        Ok(())
    }

    /// Submit the secret relayed by `verifier`, resolving their challenge.
    ///
    /// Only the original requester may respond. The commitment is recomputed
    /// from `(verifier, requester, phone number, secret)` with the same
    /// one-way function the verifier used; a match completes the challenge
    /// (and, per the resolution policy, the request), a mismatch fails the
    /// request outright.
    pub fn submit_response(
        &mut self,
        caller: &AccountId,
        request_id: RequestId,
        verifier: &AccountId,
        secret_code: u32,
    ) -> Result<ResponseOutcome, RegistryError> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(RegistryError::RequestNotFound(request_id))?;

        if request.requester != *caller {
            return Err(RegistryError::Unauthorized {
                request_id,
                caller: caller.to_string(),
                action: "respond to",
            });
        }
        if !request.is_open() {
            return Err(RegistryError::AlreadyResolved(request_id));
        }
        let slot = request
            .challenges
            .get(verifier)
            .ok_or_else(|| RegistryError::NoSuchChallenge {
                request_id,
                verifier: verifier.to_string(),
            })?;
        if slot.state != ChallengeState::Pending {
            return Err(RegistryError::AlreadyResolved(request_id));
        }

        let expected = commitment_hash(verifier, caller, &request.phone_number, secret_code);

        if expected != slot.commitment {
            request
                .challenges
                .get_mut(verifier)
                .expect("slot checked above")
                .state = ChallengeState::Failed;
            request.status = RequestStatus::Failed;

            info!(request_id, %verifier, "challenge response mismatch — request failed");
            self.events.append(RegistryEvent::ChallengeFailed {
                request_id,
                verifier: verifier.clone(),
            });
            self.events.append(RegistryEvent::VerificationFailed {
                request_id,
                requester: request.requester.clone(),
                phone_hash: phone_number_hash(&request.phone_number),
            });
            return Ok(ResponseOutcome::Failed);
        }

        request
            .challenges
            .get_mut(verifier)
            .expect("slot checked above")
            .state = ChallengeState::Completed;

        info!(request_id, %verifier, "challenge completed");
        self.events.append(RegistryEvent::ChallengeCompleted {
            request_id,
            verifier: verifier.clone(),
        });

        if !self.policy.is_satisfied(request) {
            debug!(request_id, "resolution policy awaiting further challenges");
            return Ok(ResponseOutcome::Pending);
        }

        request.status = RequestStatus::Succeeded;
        let requester = request.requester.clone();
        let phone_hash = phone_number_hash(&request.phone_number);

        info!(request_id, %requester, %phone_hash, "verification succeeded");
        self.events.append(RegistryEvent::VerificationSucceeded {
            request_id,
            requester: requester.clone(),
            phone_hash,
        });

        if let Some(previous_owner) = self.ownership.transfer_ownership(phone_hash, requester) {
            info!(%previous_owner, %phone_hash, "previous ownership proof revoked");
            self.events.append(RegistryEvent::OwnershipRevoked {
                previous_owner,
                phone_hash,
            });
        }

        Ok(ResponseOutcome::Succeeded)
    }

    // ── Read surface ───────────────────────────────────────────────────

    /// Whether `account` currently owns `phone_number`.
    pub fn is_owner(&self, account: &AccountId, phone_number: &PhoneNumber) -> bool {
        self.ownership
            .is_owner(account, &phone_number_hash(phone_number))
    }

    /// The current owner of `phone_number`, if any.
    pub fn owner_of(&self, phone_number: &PhoneNumber) -> Option<&AccountId> {
        self.ownership.owner_of(&phone_number_hash(phone_number))
    }

    /// Look up a request by id.
    pub fn request(&self, request_id: RequestId) -> Option<&VerificationRequest> {
        self.requests.get(&request_id)
    }

    /// The status of a request, if it exists.
    pub fn request_status(&self, request_id: RequestId) -> Option<RequestStatus> {
        self.requests.get(&request_id).map(|r| r.status)
    }

    pub fn panel_size(&self) -> usize {
        self.panel.panel_size()
    }

    pub fn roster_size(&self) -> usize {
        self.panel.roster_size()
    }

    /// The event log this registry announces transitions on.
    pub fn events(&self) -> &Arc<EventLog> {
        &self.events
    }
}

/// Seed derivation context: data unknown to the requester before their
/// request is assigned an id.
fn seed_context(id: RequestId, requester: &AccountId, phone_hash: &PhoneNumberHash) -> Vec<u8> {
    let mut context = Vec::with_capacity(8 + requester.as_bytes().len() + 32);
    context.extend_from_slice(&id.to_be_bytes());
    context.extend_from_slice(requester.as_bytes());
    context.extend_from_slice(phone_hash.as_bytes());
    context
}
