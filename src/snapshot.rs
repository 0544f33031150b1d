// used to split the scheduler bounds into hour and minute keys
use chrono::Timelike;
use serde_json::{json, Map, Value as Json};

use crate::field::{keys, FIELDS};
use crate::folders;
use crate::sentinel::Limit;
use crate::store::ConfigStore;

/// Reads every declared preference from the store and lays it out with the
/// same keys a patch uses. Credentials are never part of the output.
pub fn assemble<S: ConfigStore + ?Sized>(store: &S) -> Map<String, Json> {
    let mut data = Map::new();
    for field in FIELDS {
        let value = store.get(field.key).map(|v| field.kind.to_json(&v)).unwrap_or(Json::Null);
        data.insert(field.key.to_string(), value);
    }

    // Scheduler window
    for (key, hour_key, minute_key) in [
        (keys::SCHEDULE_FROM, keys::SCHEDULE_FROM_HOUR, keys::SCHEDULE_FROM_MIN),
        (keys::SCHEDULE_TO, keys::SCHEDULE_TO_HOUR, keys::SCHEDULE_TO_MIN),
    ] {
        let time = store.get(key).and_then(|v| v.as_time());
        data.insert(hour_key.to_string(), time.map_or(Json::Null, |t| json!(t.hour())));
        data.insert(minute_key.to_string(), time.map_or(Json::Null, |t| json!(t.minute())));
    }

    // Share limits
    let ratio = store
        .get(keys::MAX_RATIO)
        .and_then(|v| v.as_real())
        .map_or(Limit::Disabled, Limit::decode);
    let (enabled, magnitude) = ratio.to_wire();
    data.insert(keys::MAX_RATIO_ENABLED.to_string(), json!(enabled));
    data.insert(keys::MAX_RATIO.to_string(), json!(magnitude));
    let seeding = store
        .get(keys::MAX_SEEDING_TIME)
        .and_then(|v| v.as_int())
        .map_or(Limit::Disabled, Limit::decode);
    let (enabled, magnitude) = seeding.to_wire();
    data.insert(keys::MAX_SEEDING_TIME_ENABLED.to_string(), json!(enabled));
    data.insert(keys::MAX_SEEDING_TIME.to_string(), json!(magnitude));

    let whitelist = store
        .get(keys::SUBNET_WHITELIST)
        .and_then(|v| v.as_text_list().map(|l| l.join("\n")))
        .unwrap_or_default();
    data.insert(keys::SUBNET_WHITELIST.to_string(), json!(whitelist));

    let folders = store
        .get(keys::SCAN_DIRS)
        .and_then(|v| v.as_folders().map(folders::to_wire))
        .unwrap_or_else(|| json!({}));
    data.insert(keys::SCAN_DIRS.to_string(), folders);

    let locale = store.get(keys::LOCALE).and_then(|v| v.as_text().map(str::to_string));
    data.insert(keys::LOCALE.to_string(), locale.map_or(Json::Null, Json::String));
    data
}
