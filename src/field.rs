//! Typed values and the static field catalogue.
//!
//! Every preference a client can read or patch is declared once in
//! [`FIELDS`]. Keys that only make sense together with other keys (the
//! scheduler window, the limit pairs, the credential, the subnet whitelist,
//! watched folders and the locale) are not in the catalogue; they are
//! resolved as groups by the applicator and stored under the names in
//! [`keys`].

// used for the scheduler window bounds
use chrono::NaiveTime;
// used to render values back into the wire format
use serde_json::{json, Value as Json};

use crate::folders::WatchedFolderSet;

// ------------- Value -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    TextList(Vec<String>),
    Time(NaiveTime),
    Folders(WatchedFolderSet),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
    // integers widen, since the store may hold either for a real field
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            Value::TextList(l) => Some(l),
            _ => None,
        }
    }
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
    pub fn as_folders(&self) -> Option<&WatchedFolderSet> {
        match self {
            Value::Folders(f) => Some(f),
            _ => None,
        }
    }
}

// ------------- Field -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Real,
    Text,
    /// A list carried on the wire as one string joined by the delimiter.
    TextList(&'static str),
    /// An enumeration whose wire value is an integer in `0..n`.
    Choice(u8),
}

impl FieldKind {
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Bool => "a boolean",
            FieldKind::Int => "an integer",
            FieldKind::Real => "a number",
            FieldKind::Text => "a string",
            FieldKind::TextList(_) => "a string or an array of strings",
            FieldKind::Choice(_) => "an integer choice",
        }
    }
    /// Renders a stored value in the wire format of this kind. Values of an
    /// unexpected shape are rendered as they are rather than dropped.
    pub fn to_json(&self, value: &Value) -> Json {
        match (self, value) {
            (FieldKind::TextList(delimiter), Value::TextList(list)) => json!(list.join(*delimiter)),
            (_, value) => value_to_json(value),
        }
    }
}

pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::Real(r) => json!(r),
        Value::Text(s) => json!(s),
        Value::TextList(l) => json!(l),
        Value::Time(t) => json!(t.format("%H:%M").to_string()),
        Value::Folders(f) => crate::folders::to_wire(f),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Reported in the snapshot, ignored in patches.
    ReadOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub kind: FieldKind,
    pub access: Access,
}

impl Field {
    const fn rw(key: &'static str, kind: FieldKind) -> Self {
        Self { key, kind, access: Access::ReadWrite }
    }
    const fn ro(key: &'static str, kind: FieldKind) -> Self {
        Self { key, kind, access: Access::ReadOnly }
    }
    pub fn writable(&self) -> bool {
        self.access == Access::ReadWrite
    }
}

/// Looks up a catalogue field by its wire key.
pub fn find(key: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.key == key)
}

/// Store and wire keys of the fields that are resolved as groups.
pub mod keys {
    pub const SCHEDULE_FROM: &str = "schedule_from";
    pub const SCHEDULE_TO: &str = "schedule_to";
    pub const SCHEDULE_FROM_HOUR: &str = "schedule_from_hour";
    pub const SCHEDULE_FROM_MIN: &str = "schedule_from_min";
    pub const SCHEDULE_TO_HOUR: &str = "schedule_to_hour";
    pub const SCHEDULE_TO_MIN: &str = "schedule_to_min";
    pub const MAX_RATIO: &str = "max_ratio";
    pub const MAX_RATIO_ENABLED: &str = "max_ratio_enabled";
    pub const MAX_SEEDING_TIME: &str = "max_seeding_time";
    pub const MAX_SEEDING_TIME_ENABLED: &str = "max_seeding_time_enabled";
    pub const WEB_UI_PASSWORD: &str = "web_ui_password";
    pub const WEB_UI_PASSWORD_HASH: &str = "web_ui_password_hash";
    pub const SUBNET_WHITELIST: &str = "bypass_auth_subnet_whitelist";
    pub const SCAN_DIRS: &str = "scan_dirs";
    pub const LOCALE: &str = "locale";
    pub const SAVE_PATH: &str = "save_path";
}

use FieldKind::*;

pub static FIELDS: &[Field] = &[
    // Downloads: when adding a torrent
    Field::rw("create_subfolder_enabled", Bool),
    Field::rw("start_paused_enabled", Bool),
    Field::rw("auto_delete_mode", Choice(3)),
    Field::rw("preallocate_all", Bool),
    Field::rw("incomplete_files_ext", Bool),
    // Downloads: saving management
    Field::rw("auto_tmm_enabled", Bool),
    Field::rw("torrent_changed_tmm_enabled", Bool),
    Field::rw("save_path_changed_tmm_enabled", Bool),
    Field::rw("category_changed_tmm_enabled", Bool),
    Field::rw(keys::SAVE_PATH, Text),
    Field::rw("temp_path_enabled", Bool),
    Field::rw("temp_path", Text),
    Field::rw("export_dir", Text),
    Field::rw("export_dir_fin", Text),
    // Downloads: mail notification
    Field::rw("mail_notification_enabled", Bool),
    Field::rw("mail_notification_sender", Text),
    Field::rw("mail_notification_email", Text),
    Field::rw("mail_notification_smtp", Text),
    Field::rw("mail_notification_ssl_enabled", Bool),
    Field::rw("mail_notification_auth_enabled", Bool),
    Field::rw("mail_notification_username", Text),
    Field::rw("mail_notification_password", Text),
    Field::rw("autorun_enabled", Bool),
    Field::rw("autorun_program", Text),
    // Connection
    Field::rw("listen_port", Int),
    Field::rw("upnp", Bool),
    Field::rw("random_port", Bool),
    Field::rw("max_connec", Int),
    Field::rw("max_connec_per_torrent", Int),
    Field::rw("max_uploads", Int),
    Field::rw("max_uploads_per_torrent", Int),
    // Connection: proxy
    Field::rw("proxy_type", Choice(6)),
    Field::rw("proxy_ip", Text),
    Field::rw("proxy_port", Int),
    Field::ro("proxy_auth_enabled", Bool),
    Field::rw("proxy_username", Text),
    Field::rw("proxy_password", Text),
    Field::rw("proxy_peer_connections", Bool),
    Field::rw("force_proxy", Bool),
    Field::rw("proxy_torrents_only", Bool),
    // Connection: IP filtering
    Field::rw("ip_filter_enabled", Bool),
    Field::rw("ip_filter_path", Text),
    Field::rw("ip_filter_trackers", Bool),
    Field::rw("banned_IPs", TextList("\n")),
    // Speed
    Field::rw("dl_limit", Int),
    Field::rw("up_limit", Int),
    Field::rw("alt_dl_limit", Int),
    Field::rw("alt_up_limit", Int),
    Field::rw("bittorrent_protocol", Choice(3)),
    Field::rw("limit_utp_rate", Bool),
    Field::rw("limit_tcp_overhead", Bool),
    Field::rw("limit_lan_peers", Bool),
    Field::rw("scheduler_enabled", Bool),
    Field::rw("scheduler_days", Choice(10)),
    // BitTorrent: privacy
    Field::rw("dht", Bool),
    Field::rw("pex", Bool),
    Field::rw("lsd", Bool),
    Field::rw("encryption", Choice(3)),
    Field::rw("anonymous_mode", Bool),
    // BitTorrent: queueing
    Field::rw("queueing_enabled", Bool),
    Field::rw("max_active_downloads", Int),
    Field::rw("max_active_torrents", Int),
    Field::rw("max_active_uploads", Int),
    Field::rw("dont_count_slow_torrents", Bool),
    Field::rw("slow_torrent_dl_rate_threshold", Int),
    Field::rw("slow_torrent_ul_rate_threshold", Int),
    Field::rw("slow_torrent_inactive_timer", Int),
    Field::rw("max_ratio_act", Choice(2)),
    Field::rw("add_trackers_enabled", Bool),
    Field::rw("add_trackers", Text),
    // Web UI
    Field::rw("web_ui_domain_list", Text),
    Field::rw("web_ui_address", Text),
    Field::rw("web_ui_port", Int),
    Field::rw("web_ui_upnp", Bool),
    Field::rw("use_https", Bool),
    Field::rw("web_ui_https_cert_path", Text),
    Field::rw("web_ui_https_key_path", Text),
    Field::rw("web_ui_username", Text),
    Field::rw("bypass_local_auth", Bool),
    Field::rw("bypass_auth_subnet_whitelist_enabled", Bool),
    Field::rw("alternative_webui_enabled", Bool),
    Field::rw("alternative_webui_path", Text),
    Field::rw("web_ui_clickjacking_protection_enabled", Bool),
    Field::rw("web_ui_csrf_protection_enabled", Bool),
    Field::rw("web_ui_host_header_validation_enabled", Bool),
    Field::rw("dyndns_enabled", Bool),
    Field::rw("dyndns_service", Choice(2)),
    Field::rw("dyndns_username", Text),
    Field::rw("dyndns_password", Text),
    Field::rw("dyndns_domain", Text),
    // RSS
    Field::rw("rss_refresh_interval", Int),
    Field::rw("rss_max_articles_per_feed", Int),
    Field::rw("rss_processing_enabled", Bool),
    Field::rw("rss_auto_downloading_enabled", Bool),
];
