//! Applying a patch to the live configuration.
//!
//! Application runs in two phases. The resolve phase reads every present key,
//! coerces it and folds dependent keys into single updates; it touches no
//! collaborator, so a patch that cannot be understood is rejected with the
//! configuration untouched. The apply phase then writes the updates,
//! reconciles watched folders, switches the locale and commits once.

use chrono::NaiveTime;
use serde::Serialize;
use serde_json::{Map, Value as Json};
use tracing::{debug, info};

use crate::credential::CredentialHasher;
use crate::error::{PrefsError, Result};
use crate::field::{self, keys, Value, FIELDS};
use crate::folders::{FolderRegistry, FolderSpec, PathNormalizer, ReconcileReport, Reconciler};
use crate::locale::{LocaleSwitch, LocaleSwitcher};
use crate::patch::PatchReader;
use crate::sentinel::{Limit, Threshold};
use crate::snapshot;
use crate::store::ConfigStore;
use crate::subnet;

/// Patch keys that are resolved together with other keys rather than
/// through the catalogue.
pub const GROUPED_KEYS: &[&str] = &[
    keys::SCHEDULE_FROM_HOUR,
    keys::SCHEDULE_FROM_MIN,
    keys::SCHEDULE_TO_HOUR,
    keys::SCHEDULE_TO_MIN,
    keys::MAX_RATIO,
    keys::MAX_RATIO_ENABLED,
    keys::MAX_SEEDING_TIME,
    keys::MAX_SEEDING_TIME_ENABLED,
    keys::WEB_UI_PASSWORD,
    keys::SUBNET_WHITELIST,
    keys::SCAN_DIRS,
    keys::LOCALE,
];

// ------------- Resolved updates -------------
#[derive(Debug, Clone, PartialEq)]
enum Update {
    /// A single store write under the given key.
    Set(&'static str, Value),
    Folders(Vec<(String, FolderSpec)>),
    Locale(String),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    /// Store keys written by this patch.
    pub applied: Vec<String>,
    /// Patch keys nobody knows about, that are read-only, or that belong to
    /// a group whose other keys are missing.
    pub ignored: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders: Option<ReconcileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<LocaleSwitch>,
}

// ------------- Preferences -------------
/// The configuration pipeline together with every collaborator it drives.
pub struct Preferences<S: ConfigStore, R: FolderRegistry> {
    store: S,
    registry: R,
    normalizer: Box<dyn PathNormalizer>,
    hasher: Box<dyn CredentialHasher>,
    locale: LocaleSwitcher,
}

impl<S: ConfigStore, R: FolderRegistry> Preferences<S, R> {
    pub fn new(
        store: S,
        registry: R,
        normalizer: Box<dyn PathNormalizer>,
        hasher: Box<dyn CredentialHasher>,
        locale: LocaleSwitcher,
    ) -> Self {
        Self { store, registry, normalizer, hasher, locale }
    }
    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn registry(&self) -> &R {
        &self.registry
    }
    pub fn locale(&self) -> &LocaleSwitcher {
        &self.locale
    }

    /// Parses and applies a raw patch document.
    pub fn apply_str(&mut self, raw: &str) -> Result<ApplyReport> {
        let reader = PatchReader::parse(raw)?;
        self.apply(&reader)
    }

    pub fn apply(&mut self, patch: &PatchReader) -> Result<ApplyReport> {
        let mut ignored: Vec<String> = patch
            .keys()
            .filter(|key| !is_writable(key))
            .map(str::to_string)
            .collect();
        let updates = self.resolve(patch, &mut ignored)?;
        let mut report = ApplyReport { ignored, ..ApplyReport::default() };
        if !report.ignored.is_empty() {
            debug!(keys = ?report.ignored, "ignoring unknown, read-only or incomplete keys");
        }
        for update in updates {
            match update {
                Update::Set(key, value) => {
                    self.store.set(key, value);
                    report.applied.push(key.to_string());
                }
                Update::Folders(desired) => {
                    let folders = Reconciler::new(&mut self.registry, self.normalizer.as_ref())
                        .reconcile(desired);
                    self.store.set(keys::SCAN_DIRS, Value::Folders(folders.accepted.clone()));
                    report.applied.push(keys::SCAN_DIRS.to_string());
                    report.folders = Some(folders);
                }
                Update::Locale(locale) => {
                    let outcome = self.locale.switch_to(&locale);
                    if outcome != LocaleSwitch::Unchanged {
                        self.store.set(keys::LOCALE, Value::Text(locale));
                        report.applied.push(keys::LOCALE.to_string());
                    }
                    report.locale = Some(outcome);
                }
            }
        }
        self.store.commit()?;
        info!(applied = report.applied.len(), ignored = report.ignored.len(), "preferences applied");
        Ok(report)
    }

    /// The full current configuration in wire form.
    pub fn snapshot(&self) -> Map<String, Json> {
        snapshot::assemble(&self.store)
    }

    /// Keys that are dropped because their group is incomplete are added to
    /// `ignored`.
    fn resolve(&self, patch: &PatchReader, ignored: &mut Vec<String>) -> Result<Vec<Update>> {
        let mut updates = Vec::new();
        for field in FIELDS.iter().filter(|f| f.writable()) {
            if let Some(value) = patch.value(field.key, field.kind)? {
                updates.push(Update::Set(field.key, value));
            }
        }
        if let Some(start) = resolve_time(patch, keys::SCHEDULE_FROM_HOUR, keys::SCHEDULE_FROM_MIN, ignored)? {
            updates.push(Update::Set(keys::SCHEDULE_FROM, Value::Time(start)));
        }
        if let Some(end) = resolve_time(patch, keys::SCHEDULE_TO_HOUR, keys::SCHEDULE_TO_MIN, ignored)? {
            updates.push(Update::Set(keys::SCHEDULE_TO, Value::Time(end)));
        }
        let ratio = resolve_limit(
            patch,
            keys::MAX_RATIO_ENABLED,
            keys::MAX_RATIO,
            PatchReader::real,
            ignored,
        )?;
        if let Some(ratio) = ratio {
            updates.push(Update::Set(keys::MAX_RATIO, Value::Real(ratio.encode())));
        }
        let seeding = resolve_limit(
            patch,
            keys::MAX_SEEDING_TIME_ENABLED,
            keys::MAX_SEEDING_TIME,
            PatchReader::int,
            ignored,
        )?;
        if let Some(seeding) = seeding {
            updates.push(Update::Set(keys::MAX_SEEDING_TIME, Value::Int(seeding.encode())));
        }
        if let Some(password) = patch.text(keys::WEB_UI_PASSWORD)? {
            let digest = self.hasher.hash(&password)?;
            updates.push(Update::Set(keys::WEB_UI_PASSWORD_HASH, Value::Text(digest)));
        }
        if let Some(whitelist) = patch.text(keys::SUBNET_WHITELIST)? {
            let entries = subnet::canonical_whitelist(&whitelist);
            updates.push(Update::Set(keys::SUBNET_WHITELIST, Value::TextList(entries)));
        }
        if let Some(folders) = patch.folders(keys::SCAN_DIRS)? {
            updates.push(Update::Folders(folders));
        }
        if let Some(locale) = patch.text(keys::LOCALE)? {
            updates.push(Update::Locale(locale));
        }
        Ok(updates)
    }
}

fn incomplete<T>(ignored: &mut Vec<String>, key: &str) -> Option<T> {
    debug!(key, "dropping key of an incomplete group");
    ignored.push(key.to_string());
    None
}

fn is_writable(key: &str) -> bool {
    GROUPED_KEYS.contains(&key) || field::find(key).is_some_and(|f| f.writable())
}

/// A schedule bound changes only when both its hour and its minute are
/// present; either one alone is ignored.
fn resolve_time(
    patch: &PatchReader,
    hour_key: &str,
    minute_key: &str,
    ignored: &mut Vec<String>,
) -> Result<Option<NaiveTime>> {
    match (patch.has(hour_key), patch.has(minute_key)) {
        (true, true) => {}
        (false, false) => return Ok(None),
        (true, false) => return Ok(incomplete(ignored, hour_key)),
        (false, true) => return Ok(incomplete(ignored, minute_key)),
    }
    let (Some(hour), Some(minute)) = (patch.int(hour_key)?, patch.int(minute_key)?) else {
        return Ok(None);
    };
    let time = u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0));
    time.map(Some).ok_or_else(|| PrefsError::InvalidValue {
        key: hour_key.to_string(),
        reason: format!("{}:{} is not a time of day", hour, minute),
    })
}

/// The enabled key decides: disabled ignores the magnitude, enabled takes a
/// non-negative magnitude or zero when none is given. A magnitude without its
/// enabled key is ignored.
fn resolve_limit<T: Threshold>(
    patch: &PatchReader,
    enabled_key: &str,
    magnitude_key: &str,
    magnitude: impl Fn(&PatchReader, &str) -> Result<Option<T>>,
    ignored: &mut Vec<String>,
) -> Result<Option<Limit<T>>> {
    match patch.bool(enabled_key)? {
        None if patch.has(magnitude_key) => Ok(incomplete(ignored, magnitude_key)),
        None => Ok(None),
        Some(false) => Ok(Some(Limit::Disabled)),
        Some(true) => match magnitude(patch, magnitude_key)? {
            None => Ok(Some(Limit::Enabled(T::ZERO))),
            Some(threshold) if threshold < T::ZERO => Err(PrefsError::InvalidValue {
                key: magnitude_key.to_string(),
                reason: format!("{:?} is negative", threshold),
            }),
            Some(threshold) => Ok(Some(Limit::Enabled(threshold))),
        },
    }
}
