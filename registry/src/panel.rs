//! Verifier roster and deterministic panel selection.

use crate::error::RegistryError;
use std::collections::HashSet;
use verinum_crypto::blake2b_256_multi;
use verinum_types::AccountId;

/// Provides the deterministic seed a panel selection is derived from.
///
/// There is no trusted randomness oracle in this environment: seeds come
/// from data that is public but unknown to the requester at submission time
/// (request id plus prior registry state). A sufficiently resourced actor
/// able to influence that state can bias selection — an accepted trade-off,
/// not a hidden one. The trait exists so tests can pin the seed and assert
/// exact panel membership.
pub trait SeedSource: Send + Sync {
    /// Derive a 32-byte seed for the given context (e.g. the encoded
    /// request id and requester).
    fn seed(&self, context: &[u8]) -> [u8; 32];
}

/// Default seed source: chains each derivation into the next.
///
/// The rolling state plays the role of "prior ledger state" — a requester
/// cannot know it without replaying every operation since genesis up to the
/// moment their request is assigned an id.
pub struct ChainedSeed {
    state: std::sync::Mutex<[u8; 32]>,
}

impl ChainedSeed {
    pub fn new(genesis: [u8; 32]) -> Self {
        Self {
            state: std::sync::Mutex::new(genesis),
        }
    }
}

impl SeedSource for ChainedSeed {
    fn seed(&self, context: &[u8]) -> [u8; 32] {
        let mut state = self.state.lock().expect("seed state lock poisoned");
        let next = blake2b_256_multi(&[&*state, context]);
        *state = next;
        next
    }
}

/// Fixed seed for tests: ignores context entirely.
pub struct FixedSeed(pub [u8; 32]);

impl SeedSource for FixedSeed {
    fn seed(&self, _context: &[u8]) -> [u8; 32] {
        self.0
    }
}

/// The fixed roster of authorized verifiers and the configured panel size.
///
/// Immutable after construction; validation happens once here, never per
/// selection.
#[derive(Debug)]
pub struct VerifierPanel {
    roster: Vec<AccountId>,
    panel_size: usize,
}

impl VerifierPanel {
    /// Create a panel selector over `roster` choosing `panel_size` members
    /// per request.
    ///
    /// Fails with [`RegistryError::Configuration`] if the panel size is
    /// zero or exceeds the roster, or if the roster contains duplicates.
    pub fn new(roster: Vec<AccountId>, panel_size: usize) -> Result<Self, RegistryError> {
        if panel_size == 0 {
            return Err(RegistryError::Configuration(
                "panel size must be at least 1".into(),
            ));
        }
        if panel_size > roster.len() {
            return Err(RegistryError::Configuration(format!(
                "panel size {} exceeds roster size {}",
                panel_size,
                roster.len()
            )));
        }
        let unique: HashSet<&AccountId> = roster.iter().collect();
        if unique.len() != roster.len() {
            return Err(RegistryError::Configuration(
                "roster contains duplicate verifiers".into(),
            ));
        }
        Ok(Self { roster, panel_size })
    }

    pub fn roster(&self) -> &[AccountId] {
        &self.roster
    }

    pub fn roster_size(&self) -> usize {
        self.roster.len()
    }

    pub fn panel_size(&self) -> usize {
        self.panel_size
    }

    /// Select a duplicate-free panel of exactly `panel_size` verifiers.
    ///
    /// Derives `Blake2b(seed, attempt counter) mod roster size` repeatedly,
    /// skipping indices already taken, until the panel is full. Deterministic
    /// for a given seed; when `panel_size == roster size` the result is the
    /// whole roster regardless of seed.
    pub fn select_panel(&self, seed: &[u8; 32]) -> Vec<AccountId> {
        let mut selected_indices = HashSet::new();
        let mut panel = Vec::with_capacity(self.panel_size);
        let mut attempt: u64 = 0;

        while panel.len() < self.panel_size {
            let digest = blake2b_256_multi(&[seed, &attempt.to_be_bytes()]);
            let index = (index_prefix(&digest) % self.roster.len() as u64) as usize;
            if selected_indices.insert(index) {
                panel.push(self.roster[index].clone());
            }
            attempt += 1;
        }

        panel
    }
}

/// First eight digest bytes as a big-endian integer, for modulo reduction.
fn index_prefix(digest: &[u8; 32]) -> u64 {
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verinum_crypto::blake2b_256;

    fn roster(n: usize) -> Vec<AccountId> {
        (0..n).map(|i| AccountId::new(format!("v{i}"))).collect()
    }

    #[test]
    fn selection_is_deterministic() {
        let panel = VerifierPanel::new(roster(10), 3).unwrap();
        let seed = blake2b_256(b"seed");
        assert_eq!(panel.select_panel(&seed), panel.select_panel(&seed));
    }

    #[test]
    fn selection_has_exact_size_and_no_duplicates() {
        let panel = VerifierPanel::new(roster(20), 5).unwrap();
        let selected = panel.select_panel(&blake2b_256(b"another seed"));
        assert_eq!(selected.len(), 5);
        let unique: HashSet<&AccountId> = selected.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn full_roster_panel_selects_everyone() {
        let members = roster(3);
        let panel = VerifierPanel::new(members.clone(), 3).unwrap();
        for seed_byte in [0u8, 1, 42, 255] {
            let mut selected = panel.select_panel(&[seed_byte; 32]);
            selected.sort();
            let mut expected = members.clone();
            expected.sort();
            assert_eq!(selected, expected);
        }
    }

    #[test]
    fn different_seeds_produce_different_panels() {
        let panel = VerifierPanel::new(roster(50), 5).unwrap();
        let a = panel.select_panel(&[10u8; 32]);
        let b = panel.select_panel(&[20u8; 32]);
        assert_ne!(
            a, b,
            "different seeds should generally produce different panels"
        );
    }

    #[test]
    fn zero_panel_size_rejected() {
        let err = VerifierPanel::new(roster(3), 0).unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)));
    }

    #[test]
    fn panel_size_exceeding_roster_rejected() {
        let err = VerifierPanel::new(roster(3), 4).unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)));
    }

    #[test]
    fn duplicate_roster_rejected() {
        let mut members = roster(3);
        members.push(AccountId::new("v0"));
        let err = VerifierPanel::new(members, 2).unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)));
    }

    #[test]
    fn chained_seed_differs_per_call() {
        let source = ChainedSeed::new([0u8; 32]);
        let s1 = source.seed(b"ctx");
        let s2 = source.seed(b"ctx");
        assert_ne!(s1, s2, "identical contexts must not repeat seeds");
    }

    #[test]
    fn fixed_seed_ignores_context() {
        let source = FixedSeed([7u8; 32]);
        assert_eq!(source.seed(b"a"), source.seed(b"b"));
    }
}
