//! Shared provider credential.
//!
//! The embedding and generation adapters hold clones of the same handle, so
//! `RagService::set_credential` reaches both without rebuilding them.

use std::sync::{Arc, RwLock};

/// Cloneable handle to an optional API key.
#[derive(Clone, Default)]
pub struct SharedCredential {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedCredential {
    pub fn new(key: Option<String>) -> Self {
        let credential = Self::default();
        credential.set(key);
        credential
    }

    /// Replace the key. Blank keys clear it.
    pub fn set(&self, key: Option<String>) {
        let key = key.filter(|k| !k.trim().is_empty());
        match self.inner.write() {
            Ok(mut guard) => *guard = key,
            Err(poisoned) => *poisoned.into_inner() = key,
        }
    }

    pub fn get(&self) -> Option<String> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_present(&self) -> bool {
        match self.inner.read() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }
}

impl std::fmt::Debug for SharedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCredential")
            .field("present", &self.is_present())
            .finish()
    }
}
