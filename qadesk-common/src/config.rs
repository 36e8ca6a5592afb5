//! Configuration loading for the review service
//!
//! Every setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (bind address only)
//!
//! The database URL and the session secret have no default; resolution
//! fails with [`Error::Config`] when neither source provides them.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ENV_DATABASE_URL: &str = "QADESK_DATABASE_URL";
pub const ENV_SESSION_SECRET: &str = "QADESK_SESSION_SECRET";
pub const ENV_BIND: &str = "QADESK_BIND";

/// Default listen address for the review service
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Minimum session secret length in bytes
pub const MIN_SECRET_LEN: usize = 16;

/// Values that may appear in the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database_url: Option<String>,
    pub session_secret: Option<String>,
    pub bind: Option<String>,
}

impl TomlConfig {
    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_url: Option<String>,
    pub session_secret: Option<String>,
    pub bind: Option<String>,
    /// Explicit config file; a missing explicit file is an error
    pub config_file: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub session_secret: String,
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("database_url", &self.database_url)
            .field("session_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl ServiceConfig {
    /// Resolve the full service configuration
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml = load_toml(cli.config_file.as_deref())?;

        let database_url = resolve_store_url(cli, &toml)?;

        let session_secret = resolve_setting(
            cli.session_secret.as_deref(),
            ENV_SESSION_SECRET,
            toml.session_secret.as_deref(),
        )
        .ok_or_else(|| missing("session secret", "--session-secret", ENV_SESSION_SECRET))?;
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        let bind = resolve_setting(cli.bind.as_deref(), ENV_BIND, toml.bind.as_deref())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

        Ok(Self {
            database_url,
            session_secret,
            bind_addr,
        })
    }
}

/// Resolve only the database URL (used by the offline CLI commands)
pub fn resolve_database_url(cli: &CliOverrides) -> Result<String> {
    let toml = load_toml(cli.config_file.as_deref())?;
    resolve_store_url(cli, &toml)
}

fn resolve_store_url(cli: &CliOverrides, toml: &TomlConfig) -> Result<String> {
    resolve_setting(
        cli.database_url.as_deref(),
        ENV_DATABASE_URL,
        toml.database_url.as_deref(),
    )
    .ok_or_else(|| missing("database URL", "--database-url", ENV_DATABASE_URL))
}

/// Pick the first non-empty value from CLI, environment, then TOML
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<String> {
    // Priority 1: Command-line argument
    if let Some(value) = non_empty(cli_arg) {
        return Some(value);
    }

    // Priority 2: Environment variable
    if let Some(value) = non_empty(std::env::var(env_var_name).ok().as_deref()) {
        return Some(value);
    }

    // Priority 3: TOML config file
    non_empty(toml_value)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn missing(what: &str, flag: &str, env_var: &str) -> Error {
    Error::Config(format!(
        "{} is not set (use {}, {} or the config file)",
        what, flag, env_var
    ))
}

fn load_toml(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        info!("Loading config file {}", path.display());
        return TomlConfig::load(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading config file {}", path.display());
            TomlConfig::load(&path)
        }
        _ => {
            debug!("No config file found, using CLI and environment only");
            Ok(TomlConfig::default())
        }
    }
}

/// Platform config file location: `<config dir>/qadesk/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qadesk").join("config.toml"))
}
