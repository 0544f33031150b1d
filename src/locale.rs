//! Active locale and switching between translations.
//!
//! The active locale is shared by the whole process through a
//! [`LocaleHandle`]. It is only ever replaced as a whole, so a reader sees
//! either the old `(id, translation)` pair or the new one.
//!
//! Switching to a locale without a translation still makes that locale the
//! active one; only the translation degrades to the identity translation.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

// ------------- Translation -------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    messages: HashMap<String, String>,
}

impl Translation {
    /// Translates every message to itself.
    pub fn identity() -> Self {
        Self::default()
    }
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }
    pub fn translate<'a>(&'a self, source: &'a str) -> &'a str {
        self.messages.get(source).map(String::as_str).unwrap_or(source)
    }
    pub fn is_identity(&self) -> bool {
        self.messages.is_empty()
    }
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("no translation for locale '{0}'")]
    NotFound(String),
    #[error("invalid locale identifier '{0}'")]
    InvalidLocale(String),
    #[error("cannot read translation: {0}")]
    Io(String),
    #[error("cannot parse translation: {0}")]
    Parse(String),
}

pub trait TranslationLoader: Send + Sync {
    fn load(&self, locale: &str) -> Result<Translation, LoadError>;
}

/// Loads `<dir>/<locale>.json` files holding a flat object of source
/// message to translated message.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TranslationLoader for DirectoryLoader {
    fn load(&self, locale: &str) -> Result<Translation, LoadError> {
        let valid = !locale.is_empty()
            && locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LoadError::InvalidLocale(locale.to_string()));
        }
        let path = self.dir.join(format!("{}.json", locale));
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(locale.to_string()),
            _ => LoadError::Io(e.to_string()),
        })?;
        let messages: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| LoadError::Parse(e.to_string()))?;
        Ok(Translation::new(messages))
    }
}

// ------------- Active locale -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLocale {
    pub id: String,
    pub translation: Arc<Translation>,
}

impl ActiveLocale {
    pub fn untranslated(id: impl Into<String>) -> Self {
        Self { id: id.into(), translation: Arc::new(Translation::identity()) }
    }
}

pub type LocaleHandle = Arc<ArcSwap<ActiveLocale>>;

pub fn new_locale_handle(initial: ActiveLocale) -> LocaleHandle {
    Arc::new(ArcSwap::from_pointee(initial))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum LocaleSwitch {
    /// The requested locale was already active.
    Unchanged,
    Loaded,
    /// The locale is active but its translation could not be loaded.
    Fallback { reason: String },
}

// ------------- Switcher -------------
pub struct LocaleSwitcher {
    loader: Box<dyn TranslationLoader>,
    active: LocaleHandle,
}

impl LocaleSwitcher {
    pub fn new(loader: Box<dyn TranslationLoader>, active: LocaleHandle) -> Self {
        Self { loader, active }
    }
    pub fn handle(&self) -> LocaleHandle {
        Arc::clone(&self.active)
    }
    pub fn current(&self) -> Arc<ActiveLocale> {
        self.active.load_full()
    }
    pub fn switch_to(&self, locale: &str) -> LocaleSwitch {
        if self.active.load().id == locale {
            return LocaleSwitch::Unchanged;
        }
        match self.loader.load(locale) {
            Ok(translation) => {
                debug!(locale, messages = translation.len(), "locale recognized, using translation");
                self.active.store(Arc::new(ActiveLocale {
                    id: locale.to_string(),
                    translation: Arc::new(translation),
                }));
                LocaleSwitch::Loaded
            }
            Err(e) => {
                warn!(locale, error = %e, "locale unrecognized, using default translation");
                self.active.store(Arc::new(ActiveLocale::untranslated(locale)));
                LocaleSwitch::Fallback { reason: e.to_string() }
            }
        }
    }
}
