//! Current-owner mapping with transfer-and-revoke semantics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use verinum_types::{AccountId, PhoneNumberHash};

/// Maps a phone-number hash to its current owner.
///
/// Invariant: at most one owner per hash at any time. The only mutation
/// path is [`transfer_ownership`](Self::transfer_ownership), driven by the
/// registry's successful-resolution path.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OwnershipLedger {
    owners: HashMap<PhoneNumberHash, AccountId>,
}

impl OwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `new_owner` as the owner of `phone_hash`.
    ///
    /// Returns the distinct previous owner, if one existed, so the caller
    /// can emit a revocation event. Transferring to the current owner is a
    /// no-op and returns `None`. Never fails.
    pub fn transfer_ownership(
        &mut self,
        phone_hash: PhoneNumberHash,
        new_owner: AccountId,
    ) -> Option<AccountId> {
        match self.owners.get(&phone_hash) {
            Some(current) if *current == new_owner => None,
            _ => self.owners.insert(phone_hash, new_owner),
        }
    }

    /// Whether `account` is the stored owner of `phone_hash`.
    pub fn is_owner(&self, account: &AccountId, phone_hash: &PhoneNumberHash) -> bool {
        self.owners.get(phone_hash) == Some(account)
    }

    /// The current owner of `phone_hash`, if any.
    pub fn owner_of(&self, phone_hash: &PhoneNumberHash) -> Option<&AccountId> {
        self.owners.get(phone_hash)
    }

    /// Number of phone numbers with a current owner.
    pub fn owned_count(&self) -> usize {
        self.owners.len()
    }
}
