//! webprefs – serve an application's preferences as a JSON document that
//! remote clients read in full and update piece by piece.
//!
//! The heart of the crate is the *partial update* pipeline: a client sends a
//! sparse patch, and only the keys present in it are changed. Key presence,
//! not value, signals intent; a key sent as `false`, `0` or `""` is still a
//! request to change that setting.
//!
//! ## Modules
//! * [`patch`] – [`patch::PatchReader`], a typed read view over a patch.
//! * [`field`] – The static field catalogue and the [`field::Value`] type.
//! * [`sentinel`] – [`sentinel::Limit`], the "disabled or threshold" encoding
//!   used by share ratio and seeding time limits.
//! * [`folders`] – Watched folders and the [`folders::Reconciler`] that
//!   syncs a registry with the set a client asks for.
//! * [`locale`] – The active locale and the [`locale::LocaleSwitcher`].
//! * [`subnet`] – Parsing of the authentication bypass whitelist.
//! * [`credential`] – One way hashing of the web UI password.
//! * [`applicator`] – [`applicator::Preferences`], which ties it all together.
//! * [`snapshot`] – The full read view.
//! * [`interface`] – Serialized access for concurrent callers.
//! * [`server`] – HTTP routes on top of the interface.
//!
//! ## Grouped keys
//! Some keys are meaningless alone. A scheduler bound changes only when both
//! its hour and minute are present, and a limit magnitude is only consulted
//! when its `_enabled` key is. These groups are resolved as a unit before
//! anything is written.
//!
//! ## Failures
//! A patch that is not valid JSON, or that holds a value of the wrong type,
//! is rejected as a whole before any setting changes. Watched folder
//! operations and translation loading may fail on their own; those failures
//! are reported and the rest of the patch still applies.
//!
//! ## Quick Start
//! ```
//! use webprefs::applicator::Preferences;
//! use webprefs::credential::Argon2Hasher;
//! use webprefs::folders::SlashNormalizer;
//! use webprefs::locale::{new_locale_handle, ActiveLocale, LocaleSwitcher};
//! use webprefs::memory::{MemoryFolderRegistry, MemoryStore, StaticLoader};
//!
//! let locale = LocaleSwitcher::new(
//!     Box::new(StaticLoader::new()),
//!     new_locale_handle(ActiveLocale::untranslated("en")),
//! );
//! let mut prefs = Preferences::new(
//!     MemoryStore::with_defaults(),
//!     MemoryFolderRegistry::new(),
//!     Box::new(SlashNormalizer),
//!     Box::new(Argon2Hasher::default()),
//!     locale,
//! );
//! prefs.apply_str(r#"{"dht": true, "max_ratio_enabled": false}"#).unwrap();
//! assert_eq!(prefs.snapshot()["dht"], true);
//! assert_eq!(prefs.snapshot()["max_ratio_enabled"], false);
//! ```

pub mod applicator;
pub mod config;
pub mod credential;
pub mod error;
pub mod field;
pub mod folders;
pub mod interface;
pub mod locale;
pub mod memory;
pub mod patch;
pub mod sentinel;
pub mod server;
pub mod snapshot;
pub mod store;
pub mod subnet;

use std::fs;

use tracing::info;

use crate::applicator::Preferences;
use crate::config::Settings;
use crate::credential::Argon2Hasher;
use crate::error::Result;
use crate::field::{keys, Value};
use crate::folders::SlashNormalizer;
use crate::interface::PreferencesInterface;
use crate::locale::{new_locale_handle, ActiveLocale, DirectoryLoader, LocaleSwitcher, TranslationLoader};
use crate::memory::{MemoryFolderRegistry, MemoryStore, StaticLoader};
use crate::store::ConfigStore;

pub type StandalonePreferences = PreferencesInterface<MemoryStore, MemoryFolderRegistry>;

/// Wires the in-memory collaborators together according to `settings` and
/// applies the seed patch, if one is configured.
pub fn standalone(settings: &Settings) -> Result<StandalonePreferences> {
    let mut store = MemoryStore::with_defaults();
    store.set(keys::LOCALE, Value::Text(settings.default_locale.clone()));
    let mut registry = MemoryFolderRegistry::new();
    if settings.check_folders {
        registry = registry.checking_filesystem();
    }
    let loader: Box<dyn TranslationLoader> = match &settings.translations_dir {
        Some(dir) => Box::new(DirectoryLoader::new(dir)),
        None => Box::new(StaticLoader::new()),
    };
    let locale = LocaleSwitcher::new(loader, new_locale_handle(ActiveLocale::untranslated("")));
    locale.switch_to(&settings.default_locale);
    let hasher = Argon2Hasher::new(settings.credential_memory_kib, settings.credential_iterations)?;
    let mut preferences = Preferences::new(
        store,
        registry,
        Box::new(SlashNormalizer),
        Box::new(hasher),
        locale,
    );
    if let Some(seed) = &settings.seed {
        let raw = fs::read_to_string(seed)?;
        let report = preferences.apply_str(&raw)?;
        info!(seed = %seed.display(), applied = report.applied.len(), "seed preferences applied");
    }
    Ok(PreferencesInterface::new(preferences))
}
