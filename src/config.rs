//! Server settings.
//!
//! Read from an optional `webprefs.json` (or any format the `config` crate
//! recognizes under that base name) and then from `WEBPREFS_*` environment
//! variables, which take priority. Every setting has a default so the server
//! starts without any file at all.

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{PrefsError, Result};

pub const DEFAULT_CONFIG_NAME: &str = "webprefs";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP surface listens on.
    pub bind: String,
    pub port: u16,
    /// Directory holding `<locale>.json` translations.
    pub translations_dir: Option<PathBuf>,
    /// Locale active at startup.
    pub default_locale: String,
    /// argon2 memory cost of the web UI password digest, in KiB.
    pub credential_memory_kib: u32,
    /// argon2 time cost of the web UI password digest.
    pub credential_iterations: u32,
    /// A patch document applied once at startup.
    pub seed: Option<PathBuf>,
    /// Reject watched folders that are not readable directories.
    pub check_folders: bool,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            translations_dir: None,
            default_locale: "en".to_string(),
            credential_memory_kib: argon2::Params::DEFAULT_M_COST,
            credential_iterations: argon2::Params::DEFAULT_T_COST,
            seed: None,
            check_folders: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `name` (a base file name, extension optional) and
    /// the environment.
    pub fn load(name: Option<&str>) -> Result<Self> {
        let name = name.unwrap_or(DEFAULT_CONFIG_NAME);
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(
                Environment::with_prefix("WEBPREFS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| PrefsError::Config(format!("invalid bind address {}:{}: {}", self.bind, self.port, e)))
    }
}
