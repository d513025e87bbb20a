//! Key-value persistence for saves and settings.
//!
//! [`KeyValueStorage`] mirrors the small get/set/remove surface a browser's
//! local storage offers. [`GameStateStore`] layers save-game semantics on top:
//! loading never fails (unreadable data yields a fresh game) and a failed
//! write is logged once and reported so the caller can carry on in memory.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;
use crate::state::GameState;

/// Key the game state is saved under.
pub const STORAGE_KEY: &str = "cvc-spin-game-state-v1";

/// Minimal string key-value backend.
pub trait KeyValueStorage {
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the key cannot be removed.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    quota: Option<usize>,
    offline: Rc<Cell<bool>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses writes once stored values exceed `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Make every operation fail until switched back, as when storage is
    /// blocked by the host.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn ensure_online(&self) -> Result<(), StorageError> {
        if self.offline.get() {
            return Err(StorageError::Unavailable("storage is offline".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_online()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_online()?;
        let mut items = self.items.borrow_mut();
        if let Some(quota) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_online()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and saves [`GameState`] under a single key.
#[derive(Debug, Clone)]
pub struct GameStateStore<S> {
    storage: S,
    key: String,
    memory_fallback: bool,
}

impl<S: KeyValueStorage> GameStateStore<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            memory_fallback: false,
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved game, or a fresh one when nothing usable is stored.
    #[must_use]
    pub fn load(&self) -> GameState {
        match self.storage.get_item(&self.key) {
            Ok(raw) => GameState::from_storage(raw.as_deref()),
            Err(err) => {
                log::warn!("failed to read saved game, starting fresh: {err}");
                GameState::default()
            }
        }
    }

    /// Write `state`. After the first failure the store stops reporting
    /// itself as persisted until a later write succeeds.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] when the write fails.
    pub fn save(&mut self, state: &GameState) -> Result<(), StorageError> {
        let result = state
            .to_json()
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(&self.key, &json));
        match result {
            Ok(()) => {
                self.memory_fallback = false;
                Ok(())
            }
            Err(err) => {
                if !self.memory_fallback {
                    log::warn!("failed to save game, progress will be lost on restart: {err}");
                    self.memory_fallback = true;
                }
                Err(err)
            }
        }
    }

    /// Remove the saved game. Failures are logged and otherwise ignored.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove_item(&self.key) {
            log::warn!("failed to clear saved game: {err}");
        }
    }

    /// `false` once a save has failed and no later save has succeeded.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        !self.memory_fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameSnapshot;

    fn sample_state() -> GameState {
        GameState::new(GameSnapshot {
            tokens: 12,
            spin_count: 4,
            correct_answers: 3,
            ..GameSnapshot::default()
        })
        .expect("valid state")
    }

    #[test]
    fn empty_storage_loads_defaults() {
        let store = GameStateStore::new(MemoryStorage::new());
        assert_eq!(store.load(), GameState::default());
        assert_eq!(store.key(), STORAGE_KEY);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let storage = MemoryStorage::new();
        let mut store = GameStateStore::new(storage.clone());
        store.save(&sample_state()).expect("saved");
        assert_eq!(storage.len(), 1);
        assert_eq!(store.load(), sample_state());
        assert!(store.is_persisted());
    }

    #[test]
    fn corrupt_or_invalid_saves_load_defaults() {
        let storage = MemoryStorage::new();
        let store = GameStateStore::new(storage.clone());
        storage.set_item(STORAGE_KEY, "{not json").expect("write");
        assert_eq!(store.load(), GameState::default());
        storage
            .set_item(STORAGE_KEY, r#"{"spinCount":0,"correctAnswers":3}"#)
            .expect("write");
        assert_eq!(store.load(), GameState::default());
        storage.set_item(STORAGE_KEY, "42").expect("write");
        assert_eq!(store.load(), GameState::default());
    }

    #[test]
    fn failed_save_flags_memory_fallback_until_recovery() {
        let storage = MemoryStorage::new();
        let mut store = GameStateStore::new(storage.clone());
        storage.set_offline(true);
        assert!(store.save(&sample_state()).is_err());
        assert!(!store.is_persisted());
        assert!(store.save(&sample_state()).is_err());
        assert_eq!(store.load(), GameState::default());

        storage.set_offline(false);
        store.save(&sample_state()).expect("saved");
        assert!(store.is_persisted());
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let mut store = GameStateStore::new(MemoryStorage::with_quota(16));
        assert!(matches!(
            store.save(&sample_state()),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert!(!store.is_persisted());
    }

    #[test]
    fn clear_removes_the_save() {
        let storage = MemoryStorage::new();
        let mut store = GameStateStore::with_key(storage.clone(), "slot-2");
        store.save(&sample_state()).expect("saved");
        store.clear();
        assert!(storage.is_empty());
        assert_eq!(store.load(), GameState::default());
    }
}
