#![allow(dead_code)]

use webprefs::applicator::Preferences;
use webprefs::credential::Argon2Hasher;
use webprefs::folders::{FolderSpec, SlashNormalizer, WatchedFolderSet};
use webprefs::locale::{new_locale_handle, ActiveLocale, LocaleSwitcher, Translation};
use webprefs::memory::{MemoryFolderRegistry, MemoryStore, StaticLoader};

pub type TestPreferences = Preferences<MemoryStore, MemoryFolderRegistry>;

pub fn german() -> Translation {
    let messages = [("Watch folder", "Überwachter Ordner"), ("Default folder", "Standardordner")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Translation::new(messages)
}

pub fn preferences_with(registry: MemoryFolderRegistry) -> TestPreferences {
    let loader = StaticLoader::new().with("de", german());
    let locale = LocaleSwitcher::new(
        Box::new(loader),
        new_locale_handle(ActiveLocale::untranslated("en")),
    );
    Preferences::new(
        MemoryStore::with_defaults(),
        registry,
        Box::new(SlashNormalizer),
        Box::new(Argon2Hasher::new(64, 1).expect("argon2 parameters")),
        locale,
    )
}

pub fn preferences() -> TestPreferences {
    preferences_with(MemoryFolderRegistry::new())
}

pub fn folders(entries: &[(&str, FolderSpec)]) -> WatchedFolderSet {
    entries.iter().map(|(p, s)| (p.to_string(), s.clone())).collect()
}
