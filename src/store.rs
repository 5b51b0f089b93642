//! Persisted preference storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser backs [`PreferenceStore`] with `localStorage`; tests use
//! [`MemoryStore`]. The controller never talks to a store directly: it goes
//! through [`PreferenceSlot`], which owns the one key this widget writes.
//!
//! ERROR HANDLING
//! ==============
//! `localStorage` can be missing or throw (private browsing, quota, sandboxed
//! iframes). The first failure flips the slot to session-only mode: the value
//! lives in memory for the rest of the page session and the store is not
//! touched again.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("preference storage is unavailable")]
    Unavailable,
    #[error("preference storage failed to {operation} `{key}`: {reason}")]
    Rejected { operation: &'static str, key: String, reason: String },
}

/// Key-value store that survives page reloads.
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage refuses the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage refuses the removal.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same entries, so a test can keep a
/// handle after moving one into a controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        store
    }

    /// Store whose every operation fails, like a blocked `localStorage`.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    /// Current entry for `key`, bypassing the failure switch.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Drop every entry, as a user clearing site data would.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable { Err(StoreError::Unavailable) } else { Ok(()) }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.entry(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Where the preference currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persistence {
    /// Reads and writes go to the store.
    Durable,
    /// The store failed; the value is kept in memory for this session only.
    SessionOnly,
}

/// The single persisted preference slot owned by a controller.
pub struct PreferenceSlot {
    store: Box<dyn PreferenceStore>,
    key: String,
    session: Option<String>,
    persistence: Persistence,
}

impl PreferenceSlot {
    pub fn new(store: Box<dyn PreferenceStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into(), session: None, persistence: Persistence::Durable }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn persistence(&self) -> Persistence {
        self.persistence
    }

    /// Raw persisted value, if any.
    pub fn load(&mut self) -> Option<String> {
        if self.persistence == Persistence::Durable {
            match self.store.get(&self.key) {
                Ok(value) => return value,
                Err(err) => self.degrade(&err),
            }
        }
        self.session.clone()
    }

    pub fn save(&mut self, value: &str) {
        self.session = Some(value.to_owned());
        if self.persistence == Persistence::Durable {
            if let Err(err) = self.store.set(&self.key, value) {
                self.degrade(&err);
            }
        }
    }

    pub fn clear(&mut self) {
        self.session = None;
        if self.persistence == Persistence::Durable {
            if let Err(err) = self.store.remove(&self.key) {
                self.degrade(&err);
            }
        }
    }

    fn degrade(&mut self, err: &StoreError) {
        leptos::logging::warn!("{err}; keeping theme preference for this session only");
        self.persistence = Persistence::SessionOnly;
    }
}
