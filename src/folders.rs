//! Watched folders and their reconciliation.
//!
//! A client sends the complete set of folders it wants monitored. The
//! [`Reconciler`] diffs that set against what the [`FolderRegistry`]
//! currently watches and issues one add, update or remove per folder. Each
//! operation may fail on its own (a folder removed between listing and adding
//! is the common case); failures are collected into the
//! [`ReconcileReport`] and never stop the remaining operations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Value as Json};
use thiserror::Error;
use tracing::{debug, warn};

/// Display label for folders that download into the default save path.
pub const DEFAULT_LOCATION_LABEL: &str = "Default folder";
/// Display label for folders that download into themselves.
pub const WATCH_FOLDER_LABEL: &str = "Watch folder";

// wire values of the numeric location kinds
const KIND_WATCH_FOLDER: i64 = 0;
const KIND_DEFAULT_LOCATION: i64 = 1;

// ------------- FolderSpec -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderSpec {
    Default,
    Watched,
    Custom(String),
}

impl FolderSpec {
    /// Clients send either a numeric location kind or a destination string.
    /// Returns `None` for anything else, including the bare custom kind
    /// without a destination.
    pub fn from_wire(value: &Json) -> Option<FolderSpec> {
        match value {
            Json::String(destination) if !destination.is_empty() => {
                Some(FolderSpec::Custom(destination.clone()))
            }
            Json::Number(n) => match n.as_i64()? {
                KIND_WATCH_FOLDER => Some(FolderSpec::Watched),
                KIND_DEFAULT_LOCATION => Some(FolderSpec::Default),
                _ => None,
            },
            _ => None,
        }
    }
    pub fn to_wire(&self) -> Json {
        match self {
            FolderSpec::Watched => json!(KIND_WATCH_FOLDER),
            FolderSpec::Default => json!(KIND_DEFAULT_LOCATION),
            FolderSpec::Custom(destination) => json!(destination),
        }
    }
    /// Where torrents found in the folder are saved, as shown to users.
    pub fn destination_label(&self) -> &str {
        match self {
            FolderSpec::Default => DEFAULT_LOCATION_LABEL,
            FolderSpec::Watched => WATCH_FOLDER_LABEL,
            FolderSpec::Custom(destination) => destination,
        }
    }
}

impl Serialize for FolderSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

/// Normalized folder path mapped to what should happen with its torrents.
pub type WatchedFolderSet = BTreeMap<String, FolderSpec>;

pub fn to_wire(folders: &WatchedFolderSet) -> Json {
    Json::Object(
        folders
            .iter()
            .map(|(path, spec)| (path.clone(), spec.to_wire()))
            .collect(),
    )
}

// ------------- Collaborators -------------
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolderError {
    #[error("folder does not exist")]
    DoesNotExist,
    #[error("folder cannot be read")]
    CannotRead,
    #[error("folder is already watched")]
    AlreadyInList,
    #[error("folder is not watched")]
    NotInList,
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// The component that actually monitors folders.
pub trait FolderRegistry: Send {
    fn list(&self) -> WatchedFolderSet;
    fn add(&mut self, path: &str, spec: &FolderSpec) -> Result<(), FolderError>;
    fn update(&mut self, path: &str, spec: &FolderSpec) -> Result<(), FolderError>;
    fn remove(&mut self, path: &str) -> Result<(), FolderError>;
}

/// Turns a client supplied path into the canonical form the registry uses.
pub trait PathNormalizer: Send + Sync {
    fn normalize(&self, path: &str) -> String;
}

/// Uses forward slashes and drops trailing separators, keeping a lone root.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlashNormalizer;

impl PathNormalizer for SlashNormalizer {
    fn normalize(&self, path: &str) -> String {
        let path = path.trim().replace('\\', "/");
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() && path.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

// ------------- Plan -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderOp {
    Add,
    Update,
    Remove,
}

impl fmt::Display for FolderOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FolderOp::Add => write!(f, "add"),
            FolderOp::Update => write!(f, "update"),
            FolderOp::Remove => write!(f, "remove"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationPlan {
    pub adds: Vec<(String, FolderSpec)>,
    pub updates: Vec<(String, FolderSpec)>,
    pub removes: Vec<String>,
}

impl ReconciliationPlan {
    /// Every desired folder is either added or updated, even when its spec
    /// did not change; detecting no-ops is up to the registry.
    pub fn between(current: &WatchedFolderSet, desired: &WatchedFolderSet) -> Self {
        let mut plan = Self::default();
        for (path, spec) in desired {
            if current.contains_key(path) {
                plan.updates.push((path.clone(), spec.clone()));
            } else {
                plan.adds.push((path.clone(), spec.clone()));
            }
        }
        plan.removes = current
            .keys()
            .filter(|path| !desired.contains_key(*path))
            .cloned()
            .collect();
        plan
    }
    pub fn len(&self) -> usize {
        self.adds.len() + self.updates.len() + self.removes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ------------- Report -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedFolder {
    pub path: String,
    pub operation: FolderOp,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// Folders that were successfully added or updated.
    pub accepted: WatchedFolderSet,
    pub rejected: Vec<RejectedFolder>,
}

impl ReconcileReport {
    fn reject(&mut self, path: &str, operation: FolderOp, error: FolderError) {
        warn!(path, %operation, %error, "watched folder rejected");
        self.rejected.push(RejectedFolder {
            path: path.to_string(),
            operation,
            reason: error.to_string(),
        });
    }
    pub fn is_rejected(&self, path: &str) -> bool {
        self.rejected.iter().any(|r| r.path == path)
    }
}

// ------------- Reconciler -------------
pub struct Reconciler<'a> {
    registry: &'a mut dyn FolderRegistry,
    normalizer: &'a dyn PathNormalizer,
}

impl<'a> Reconciler<'a> {
    pub fn new(registry: &'a mut dyn FolderRegistry, normalizer: &'a dyn PathNormalizer) -> Self {
        Self { registry, normalizer }
    }

    /// Normalizes folder paths and custom destinations. When two paths end up
    /// identical the later one wins.
    pub fn normalize(&self, desired: Vec<(String, FolderSpec)>) -> WatchedFolderSet {
        let mut normalized = WatchedFolderSet::new();
        for (path, spec) in desired {
            let spec = match spec {
                FolderSpec::Custom(destination) => {
                    FolderSpec::Custom(self.normalizer.normalize(&destination))
                }
                other => other,
            };
            let path = self.normalizer.normalize(&path);
            if normalized.insert(path.clone(), spec).is_some() {
                debug!(%path, "duplicate watched folder after normalization");
            }
        }
        normalized
    }

    pub fn plan(&self, desired: &WatchedFolderSet) -> ReconciliationPlan {
        ReconciliationPlan::between(&self.registry.list(), desired)
    }

    /// Executes every operation in the plan. Never fails as a whole.
    pub fn execute(&mut self, plan: ReconciliationPlan) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for (path, spec) in plan.adds {
            match self.registry.add(&path, &spec) {
                Ok(()) => {
                    debug!(%path, destination = spec.destination_label(), "new watched folder");
                    report.accepted.insert(path, spec);
                }
                Err(e) => report.reject(&path, FolderOp::Add, e),
            }
        }
        for (path, spec) in plan.updates {
            match self.registry.update(&path, &spec) {
                Ok(()) => {
                    debug!(%path, destination = spec.destination_label(), "updated watched folder");
                    report.accepted.insert(path, spec);
                }
                Err(e) => report.reject(&path, FolderOp::Update, e),
            }
        }
        for path in plan.removes {
            match self.registry.remove(&path) {
                Ok(()) => debug!(%path, "removed watched folder"),
                Err(e) => report.reject(&path, FolderOp::Remove, e),
            }
        }
        report
    }

    pub fn reconcile(&mut self, desired: Vec<(String, FolderSpec)>) -> ReconcileReport {
        let desired = self.normalize(desired);
        let plan = self.plan(&desired);
        self.execute(plan)
    }
}
