//! `localStorage` preference store

use crate::{
    error::{PlaybackError, Result},
    preferences::PreferenceStore,
};
use web_sys::Storage;

/// Preferences in the page's `localStorage`
///
/// Values are stored as raw strings. When storage is disabled every read
/// misses and every write fails, which the player logs and ignores.
#[derive(Debug, Clone)]
pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    /// Open the window's local storage
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage is unavailable, preferences will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| PlaybackError::Storage("localStorage is unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| PlaybackError::Storage(format!("{e:?}")))
    }
}
