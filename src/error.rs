// Error types for webprefs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Malformed patch: {0}")]
    MalformedPatch(String),
    #[error("Type mismatch for '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("Store error: {0}")]
    Store(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Credential hashing failed: {0}")]
    Credential(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl PrefsError {
    /// Errors raised while the patch is being understood. Nothing has been
    /// written to any collaborator when one of these is returned.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedPatch(_) | Self::TypeMismatch { .. } | Self::InvalidValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PrefsError>;

// Helper conversions
impl From<serde_json::Error> for PrefsError {
    fn from(e: serde_json::Error) -> Self { Self::MalformedPatch(e.to_string()) }
}
impl From<config::ConfigError> for PrefsError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<std::io::Error> for PrefsError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
