//! Shared handle for serving preferences to concurrent callers.
//!
//! A patch is applied under one exclusive lock from parsing to commit, so
//! grouped keys are never observed half-applied and two patches never
//! interleave. Snapshots take the same lock.

use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value as Json};

use crate::applicator::{ApplyReport, Preferences};
use crate::error::{PrefsError, Result};
use crate::field::keys;
use crate::folders::FolderRegistry;
use crate::locale::LocaleHandle;
use crate::store::ConfigStore;

pub struct PreferencesInterface<S: ConfigStore, R: FolderRegistry> {
    preferences: Mutex<Preferences<S, R>>,
    locale: LocaleHandle,
}

impl<S: ConfigStore, R: FolderRegistry> PreferencesInterface<S, R> {
    pub fn new(preferences: Preferences<S, R>) -> Self {
        let locale = preferences.locale().handle();
        Self { preferences: Mutex::new(preferences), locale }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Preferences<S, R>>> {
        self.preferences.lock().map_err(|e| PrefsError::Lock(e.to_string()))
    }

    /// Parses and applies a patch while holding the exclusive section.
    pub fn apply(&self, raw: &str) -> Result<ApplyReport> {
        self.lock()?.apply_str(raw)
    }

    pub fn snapshot(&self) -> Result<Map<String, Json>> {
        Ok(self.lock()?.snapshot())
    }

    pub fn default_save_path(&self) -> Result<String> {
        let preferences = self.lock()?;
        let path = preferences.store().get(keys::SAVE_PATH);
        Ok(path.and_then(|v| v.as_text().map(str::to_string)).unwrap_or_default())
    }

    /// The active locale, readable without waiting for a running patch.
    pub fn locale(&self) -> LocaleHandle {
        self.locale.clone()
    }
}
