//! In-memory collaborators.
//!
//! These back the standalone server and the tests. The folder registry can
//! optionally check the filesystem the way a real folder watcher would.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveTime;
use tracing::debug;

use crate::error::Result;
use crate::field::{keys, FieldKind, Value, FIELDS};
use crate::folders::{FolderError, FolderOp, FolderRegistry, FolderSpec, WatchedFolderSet};
use crate::locale::{LoadError, Translation, TranslationLoader};
use crate::sentinel::Limit;
use crate::store::ConfigStore;

// ------------- Store -------------
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    /// A store holding a value for every catalogue field and group, as a
    /// freshly installed application would.
    pub fn with_defaults() -> Self {
        let mut values = HashMap::new();
        for field in FIELDS {
            let value = match field.kind {
                FieldKind::Bool => Value::Bool(false),
                FieldKind::Int | FieldKind::Choice(_) => Value::Int(0),
                FieldKind::Real => Value::Real(0.0),
                FieldKind::Text => Value::Text(String::new()),
                FieldKind::TextList(_) => Value::TextList(Vec::new()),
            };
            values.insert(field.key.to_string(), value);
        }
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
        values.insert(keys::SCHEDULE_FROM.into(), Value::Time(hm(8, 0)));
        values.insert(keys::SCHEDULE_TO.into(), Value::Time(hm(20, 0)));
        values.insert(keys::MAX_RATIO.into(), Value::Real(Limit::<f64>::Disabled.encode()));
        values.insert(keys::MAX_SEEDING_TIME.into(), Value::Int(Limit::<i64>::Disabled.encode()));
        values.insert(keys::SUBNET_WHITELIST.into(), Value::TextList(Vec::new()));
        values.insert(keys::SCAN_DIRS.into(), Value::Folders(WatchedFolderSet::new()));
        values.insert(keys::LOCALE.into(), Value::Text("en".into()));
        values.insert("web_ui_port".into(), Value::Int(8080));
        values.insert("listen_port".into(), Value::Int(6881));
        values.insert("web_ui_username".into(), Value::Text("admin".into()));
        Self { values, commits: 0 }
    }
    pub fn commits(&self) -> usize {
        self.commits
    }
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        debug!(commits = self.commits, "preferences committed");
        Ok(())
    }
}

// ------------- Folder registry -------------
#[derive(Debug, Clone, Default)]
pub struct MemoryFolderRegistry {
    folders: WatchedFolderSet,
    failures: HashMap<String, FolderError>,
    check_filesystem: bool,
    log: Vec<(FolderOp, String)>,
}

impl MemoryFolderRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_folders(folders: WatchedFolderSet) -> Self {
        Self { folders, ..Self::default() }
    }
    /// Rejects added or updated folders that are not readable directories.
    pub fn checking_filesystem(mut self) -> Self {
        self.check_filesystem = true;
        self
    }
    /// Makes every operation on `path` fail with `error`.
    pub fn fail(&mut self, path: &str, error: FolderError) {
        self.failures.insert(path.to_string(), error);
    }
    pub fn folders(&self) -> &WatchedFolderSet {
        &self.folders
    }
    /// Every operation issued so far, in order, including failed ones.
    pub fn log(&self) -> &[(FolderOp, String)] {
        &self.log
    }

    fn check(&mut self, op: FolderOp, path: &str) -> std::result::Result<(), FolderError> {
        self.log.push((op, path.to_string()));
        if path.is_empty() {
            return Err(FolderError::InvalidPath(path.to_string()));
        }
        if let Some(error) = self.failures.get(path) {
            return Err(error.clone());
        }
        if self.check_filesystem && op != FolderOp::Remove {
            let dir = Path::new(path);
            if !dir.is_dir() {
                return Err(FolderError::DoesNotExist);
            }
            fs::read_dir(dir).map_err(|_| FolderError::CannotRead)?;
        }
        Ok(())
    }
}

impl FolderRegistry for MemoryFolderRegistry {
    fn list(&self) -> WatchedFolderSet {
        self.folders.clone()
    }
    fn add(&mut self, path: &str, spec: &FolderSpec) -> std::result::Result<(), FolderError> {
        self.check(FolderOp::Add, path)?;
        if self.folders.contains_key(path) {
            return Err(FolderError::AlreadyInList);
        }
        self.folders.insert(path.to_string(), spec.clone());
        Ok(())
    }
    fn update(&mut self, path: &str, spec: &FolderSpec) -> std::result::Result<(), FolderError> {
        self.check(FolderOp::Update, path)?;
        match self.folders.get_mut(path) {
            Some(current) => {
                *current = spec.clone();
                Ok(())
            }
            None => Err(FolderError::NotInList),
        }
    }
    fn remove(&mut self, path: &str) -> std::result::Result<(), FolderError> {
        self.check(FolderOp::Remove, path)?;
        self.folders.remove(path).map(|_| ()).ok_or(FolderError::NotInList)
    }
}

// ------------- Translations -------------
/// Serves translations from memory; unknown locales are not found.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    translations: HashMap<String, Translation>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, locale: &str, translation: Translation) -> Self {
        self.translations.insert(locale.to_string(), translation);
        self
    }
}

impl TranslationLoader for StaticLoader {
    fn load(&self, locale: &str) -> std::result::Result<Translation, LoadError> {
        self.translations
            .get(locale)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(locale.to_string()))
    }
}
