//! Ownership registry: assigns sequential token ids to recipients.
//!
//! Ids are unique, contiguous, start at 1, and are never reassigned.
//! The registry has no notion of caps or phases; the engine decides
//! whether a mint may happen and the registry only records it.

use std::collections::HashMap;

use mintsale_types::{AccountId, Result, SaleError, TokenId};

/// The engine's view of the external ownership bookkeeping.
pub trait OwnershipRegistry {
    /// Assign the next `count` ids to `recipient`; returns the first one.
    ///
    /// # Errors
    /// Returns `RegistryRejected` if the assignment cannot be recorded.
    fn assign_sequential_ids(&mut self, recipient: AccountId, count: u32) -> Result<TokenId>;

    /// Current owner of `id`, if it has been minted.
    fn owner_of(&self, id: TokenId) -> Option<AccountId>;

    /// Whether `id` has been minted.
    fn is_minted(&self, id: TokenId) -> bool {
        self.owner_of(id).is_some()
    }

    /// Number of ids assigned so far.
    fn minted_count(&self) -> u64;

    /// Number of ids held by `account`.
    fn balance_of(&self, account: AccountId) -> u64;
}

/// In-process registry backed by a dense vector (index = id − 1).
pub struct InMemoryRegistry {
    /// Owner of each minted id, in id order.
    owners: Vec<AccountId>,
    /// Per-account token counts.
    balances: HashMap<AccountId, u64>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: Vec::new(),
            balances: HashMap::new(),
        }
    }

    /// Ids owned by `account`, ascending.
    #[must_use]
    pub fn tokens_of(&self, account: AccountId) -> Vec<TokenId> {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner == account)
            .map(|(idx, _)| TokenId::after(idx as u64))
            .collect()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnershipRegistry for InMemoryRegistry {
    fn assign_sequential_ids(&mut self, recipient: AccountId, count: u32) -> Result<TokenId> {
        if count == 0 {
            return Err(SaleError::RegistryRejected {
                reason: "cannot assign zero ids".to_string(),
            });
        }
        let first = TokenId::after(self.owners.len() as u64);
        let count = count as usize;
        self.owners
            .try_reserve(count)
            .map_err(|e| SaleError::RegistryRejected {
                reason: e.to_string(),
            })?;
        self.owners
            .extend(std::iter::repeat_n(recipient, count));
        *self.balances.entry(recipient).or_insert(0) += count as u64;

        tracing::debug!(
            recipient = %recipient,
            first_id = %first,
            count,
            "Ids assigned"
        );
        Ok(first)
    }

    fn owner_of(&self, id: TokenId) -> Option<AccountId> {
        let idx = id.0.checked_sub(TokenId::FIRST.0)?;
        let idx = usize::try_from(idx).ok()?;
        self.owners.get(idx).copied()
    }

    fn minted_count(&self) -> u64 {
        self.owners.len() as u64
    }

    fn balance_of(&self, account: AccountId) -> u64 {
        self.balances.get(&account).copied().unwrap_or(0)
    }
}
