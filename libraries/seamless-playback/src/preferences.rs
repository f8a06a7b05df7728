//! Persisted listener preferences
//!
//! Two keys in a durable key-value store: the de-normalized volume as a
//! decimal string, and the replaygain toggle as `on` / `off`. Storage
//! failures are logged and otherwise ignored; playback never depends on
//! a write succeeding.

use crate::error::Result;
use std::collections::HashMap;

/// Key holding the de-normalized volume
pub const VOLUME_KEY: &str = "volume";

/// Key holding the replaygain toggle
pub const REPLAYGAIN_KEY: &str = "replaygain";

/// Volume used when nothing (or garbage) is stored
pub const DEFAULT_VOLUME: f64 = 1.0;

/// Durable string key-value store
pub trait PreferenceStore {
    /// Read a value, `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            read_only: false,
        }
    }

    /// Make every write fail, like a full or disabled browser storage
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Stored raw value
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            return Err(crate::PlaybackError::Storage(format!(
                "store is read-only, can't write {key}"
            )));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences read at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredPreferences {
    /// De-normalized volume (not yet clamped to the output's range)
    pub volume: f64,

    /// Replaygain toggle
    pub replaygain_enabled: bool,
}

impl Default for StoredPreferences {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            replaygain_enabled: true,
        }
    }
}

/// Typed access to the preference keys
#[derive(Debug)]
pub struct Preferences<S: PreferenceStore> {
    store: S,
}

impl<S: PreferenceStore> Preferences<S> {
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read both preferences
    ///
    /// A missing or unparsable volume reads as 1.0; a negative one as 0.
    /// Any replaygain value other than `off` means enabled.
    pub fn load(&self) -> StoredPreferences {
        let volume = match self.store.get(VOLUME_KEY) {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v.max(0.0),
                _ => {
                    tracing::warn!("Ignoring stored volume {:?}", raw);
                    DEFAULT_VOLUME
                }
            },
            None => DEFAULT_VOLUME,
        };

        let replaygain_enabled = self.store.get(REPLAYGAIN_KEY).as_deref() != Some("off");

        StoredPreferences {
            volume,
            replaygain_enabled,
        }
    }

    /// Persist the de-normalized volume
    pub fn store_volume(&mut self, volume: f64) {
        if let Err(e) = self.store.set(VOLUME_KEY, &volume.to_string()) {
            tracing::warn!("Failed to persist volume: {}", e);
        }
    }

    /// Persist the replaygain toggle
    pub fn store_replaygain(&mut self, enabled: bool) {
        let value = if enabled { "on" } else { "off" };
        if let Err(e) = self.store.set(REPLAYGAIN_KEY, value) {
            tracing::warn!("Failed to persist replaygain setting: {}", e);
        }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}
