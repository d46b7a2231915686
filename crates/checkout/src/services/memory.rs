//! In-memory collaborator implementations.
//!
//! Useful as defaults for local runs and as honest backends in tests. The
//! recipient book in particular mirrors what the hosted portal keeps as a
//! per-session convenience store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use duma_core::Msisdn;

use super::{
    ProfileBalances, ProfileError, ProfileKey, ProfileStore, RecipientBook, RecipientError,
    RecipientInfo,
};

/// Profile balances held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<ProfileKey, ProfileBalances>>,
}

impl MemoryProfileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace the balances for an identity.
    pub fn set(&self, key: ProfileKey, balances: ProfileBalances) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, balances);
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn balances(&self, key: &ProfileKey) -> Result<Option<ProfileBalances>, ProfileError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied())
    }
}

/// Recipient memory held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryRecipientBook {
    records: Mutex<HashMap<Msisdn, RecipientInfo>>,
}

impl MemoryRecipientBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remembered recipients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no recipients are remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecipientBook for MemoryRecipientBook {
    async fn lookup(&self, msisdn: &Msisdn) -> Result<Option<RecipientInfo>, RecipientError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(msisdn)
            .cloned())
    }

    async fn remember(&self, recipient: RecipientInfo) -> Result<(), RecipientError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(recipient.msisdn.clone(), recipient);
        Ok(())
    }
}
