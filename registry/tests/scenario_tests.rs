//! End-to-end flows through the registry: submit, challenge, respond,
//! and check ownership, exercising the event log the way the UI roles do.

use std::sync::Arc;

use verinum_crypto::commitment_hash;
use verinum_events::{EventFilter, EventKind, EventLog, RegistryEvent};
use verinum_registry::{
    FixedSeed, RequestRegistry, RequestStatus, ResolutionPolicy, ResponseOutcome, VerifierPanel,
};
use verinum_types::{AccountId, PhoneNumber};

fn single_verifier_registry() -> RequestRegistry {
    let panel = VerifierPanel::new(vec![AccountId::new("v1")], 1).unwrap();
    RequestRegistry::new(
        panel,
        ResolutionPolicy::FirstOutcome,
        Box::new(FixedSeed([0u8; 32])),
        Arc::new(EventLog::new()),
    )
}

fn phone() -> PhoneNumber {
    PhoneNumber::new(1, 1234567890).unwrap()
}

#[test]
fn single_verifier_happy_path() {
    // Roster [v1], panel size 1: R submits +1 1234567890, v1 commits to
    // secret 42, R returns 42 — request succeeds and R owns the number.
    let mut reg = single_verifier_registry();
    let requester = AccountId::new("requester");
    let v1 = AccountId::new("v1");

    let id = reg.submit_request(&requester, phone());
    assert_eq!(reg.request(id).unwrap().panel, vec![v1.clone()]);

    let commitment = commitment_hash(&v1, &requester, &phone(), 42);
    reg.record_challenge(&v1, id, commitment).unwrap();

    let outcome = reg.submit_response(&requester, id, &v1, 42).unwrap();
    assert_eq!(outcome, ResponseOutcome::Succeeded);
    assert_eq!(reg.request_status(id), Some(RequestStatus::Succeeded));
    assert!(reg.is_owner(&requester, &phone()));
}

#[test]
fn single_verifier_wrong_secret() {
    // Same as the happy path but R returns 43: request fails, no ownership.
    let mut reg = single_verifier_registry();
    let requester = AccountId::new("requester");
    let v1 = AccountId::new("v1");

    let id = reg.submit_request(&requester, phone());
    let commitment = commitment_hash(&v1, &requester, &phone(), 42);
    reg.record_challenge(&v1, id, commitment).unwrap();

    let outcome = reg.submit_response(&requester, id, &v1, 43).unwrap();
    assert_eq!(outcome, ResponseOutcome::Failed);
    assert_eq!(reg.request_status(id), Some(RequestStatus::Failed));
    assert!(!reg.is_owner(&requester, &phone()));
}

#[test]
fn ownership_changes_hands_with_single_revocation() {
    // R1 verifies number X, then R2 verifies the same X: exactly one
    // revocation event naming R1, and only R2 owns X afterwards.
    let mut reg = single_verifier_registry();
    let r1 = AccountId::new("r1");
    let r2 = AccountId::new("r2");
    let v1 = AccountId::new("v1");

    for (requester, secret) in [(&r1, 11u32), (&r2, 22)] {
        let id = reg.submit_request(requester, phone());
        let commitment = commitment_hash(&v1, requester, &phone(), secret);
        reg.record_challenge(&v1, id, commitment).unwrap();
        reg.submit_response(requester, id, &v1, secret).unwrap();
    }

    assert!(!reg.is_owner(&r1, &phone()));
    assert!(reg.is_owner(&r2, &phone()));

    let revocations = reg
        .events()
        .replay(&EventFilter::any().kind(EventKind::OwnershipRevoked), None);
    assert_eq!(revocations.len(), 1);
    match &revocations[0].event {
        RegistryEvent::OwnershipRevoked { previous_owner, .. } => assert_eq!(*previous_owner, r1),
        _ => unreachable!(),
    }
}

#[test]
fn full_roster_panel_is_whole_roster_for_any_seed() {
    // Roster [v1, v2, v3] with panel size 3: the panel is always the full
    // roster, whatever the seed.
    for seed_byte in [0u8, 1, 99, 255] {
        let roster: Vec<AccountId> = ["v1", "v2", "v3"].iter().map(|v| AccountId::new(*v)).collect();
        let panel = VerifierPanel::new(roster.clone(), 3).unwrap();
        let mut reg = RequestRegistry::new(
            panel,
            ResolutionPolicy::FirstOutcome,
            Box::new(FixedSeed([seed_byte; 32])),
            Arc::new(EventLog::new()),
        );

        let id = reg.submit_request(&AccountId::new("requester"), phone());
        let mut selected = reg.request(id).unwrap().panel.clone();
        selected.sort();
        let mut expected = roster;
        expected.sort();
        assert_eq!(selected, expected);
    }
}

#[test]
fn verifier_discovers_work_via_event_replay() {
    // A verifier reconstructs its pending work from history alone, the way
    // the verifier UI replays selection events on reconnect.
    let roster: Vec<AccountId> = (0..4).map(|i| AccountId::new(format!("v{i}"))).collect();
    let panel = VerifierPanel::new(roster, 2).unwrap();
    let mut reg = RequestRegistry::new(
        panel,
        ResolutionPolicy::FirstOutcome,
        Box::new(FixedSeed([5u8; 32])),
        Arc::new(EventLog::new()),
    );

    let requester = AccountId::new("requester");
    let id = reg.submit_request(&requester, phone());
    let member = reg.request(id).unwrap().panel[0].clone();

    let my_selections = reg.events().replay(
        &EventFilter::any()
            .kind(EventKind::VerifierSelected)
            .account(member.clone()),
        Some(10_000),
    );
    assert_eq!(my_selections.len(), 1);
    assert_eq!(my_selections[0].event.request_id(), Some(id));

    // After committing, the same replay plus a recorded-challenge replay
    // lets the verifier drop the request from its queue.
    let commitment = commitment_hash(&member, &requester, &phone(), 9);
    reg.record_challenge(&member, id, commitment).unwrap();
    let my_recorded = reg.events().replay(
        &EventFilter::any()
            .kind(EventKind::ChallengeRecorded)
            .account(member),
        Some(10_000),
    );
    assert_eq!(my_recorded.len(), 1);
}

#[test]
fn requester_observes_resolution_on_the_event_stream() {
    let mut reg = single_verifier_registry();
    let requester = AccountId::new("requester");
    let v1 = AccountId::new("v1");
    let mut rx = reg.events().subscribe();

    let id = reg.submit_request(&requester, phone());
    let commitment = commitment_hash(&v1, &requester, &phone(), 7);
    reg.record_challenge(&v1, id, commitment).unwrap();
    reg.submit_response(&requester, id, &v1, 7).unwrap();

    let mut kinds = Vec::new();
    while let Ok(record) = rx.try_recv() {
        kinds.push(record.event.kind());
    }
    assert_eq!(
        kinds,
        vec![
            EventKind::VerificationRequested,
            EventKind::VerifierSelected,
            EventKind::ChallengeRecorded,
            EventKind::ChallengeCompleted,
            EventKind::VerificationSucceeded,
        ]
    );
}
