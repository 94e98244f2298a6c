//! Configuration for the airmon poller.
//!
//! TOML file + `AIRMON_` environment layered over defaults with `figment`,
//! password resolution (env var, system keyring, plaintext), and
//! translation to `airmon_core::PollerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use airmon_core::PollerConfig;

const KEYRING_SERVICE: &str = "airmon";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for device '{device}'")]
    NoCredentials { device: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn missing(field: &str) -> Self {
        Self::Validation {
            field: field.into(),
            reason: "not set".into(),
        }
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// On-disk configuration. Every field can also come from `AIRMON_<FIELD>`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Device address, with or without scheme (e.g. "192.168.1.20").
    pub device: Option<String>,

    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or `password_env`.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Fixed source identifier instead of the device hostname.
    pub source_id: Option<String>,

    #[serde(default = "default_period")]
    pub period_secs: u64,

    /// Publish per-second rates next to raw counters.
    #[serde(default = "default_rates")]
    pub rates: bool,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: None,
            username: None,
            password: None,
            password_env: None,
            source_id: None,
            period_secs: default_period(),
            rates: default_rates(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_period() -> u64 {
    5
}
fn default_rates() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "airmon", "airmon").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("airmon");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults, then `path` (or the platform config file), then the
/// environment. A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("AIRMON_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a device address, defaulting to HTTPS when no scheme is given.
pub fn parse_device_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("https://{raw}")
    };

    let url: Url = with_scheme.parse().map_err(|e| ConfigError::Validation {
        field: "device".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if url.host_str().is_none() {
        return Err(ConfigError::Validation {
            field: "device".into(),
            reason: format!("no host in '{raw}'"),
        });
    }
    Ok(url)
}

impl Config {
    /// Resolve the device password.
    ///
    /// Order: env var named by `password_env`, system keyring
    /// (`airmon` / `{host}/password`), plaintext `password`.
    pub fn resolve_password(&self, host: &str) -> Result<SecretString, ConfigError> {
        // 1. Env var
        if let Some(ref env_name) = self.password_env {
            if let Ok(val) = std::env::var(env_name) {
                return Ok(SecretString::from(val));
            }
        }

        // 2. Keyring
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/password")) {
            if let Ok(pw) = entry.get_password() {
                return Ok(SecretString::from(pw));
            }
        }

        // 3. Plaintext in config
        if let Some(ref pw) = self.password {
            return Ok(SecretString::from(pw.clone()));
        }

        Err(ConfigError::NoCredentials {
            device: host.into(),
        })
    }

    /// Validate and build the poller's runtime configuration.
    pub fn to_poller_config(&self) -> Result<PollerConfig, ConfigError> {
        let raw_device = self
            .device
            .as_deref()
            .ok_or_else(|| ConfigError::missing("device"))?;
        let device = parse_device_url(raw_device)?;

        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::missing("username"))?
            .to_owned();

        if self.period_secs == 0 {
            return Err(ConfigError::Validation {
                field: "period_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let host = device.host_str().unwrap_or_default().to_owned();
        let password = self.resolve_password(&host)?;

        Ok(PollerConfig {
            device,
            username,
            password,
            source_id: self.source_id.clone().filter(|s| !s.is_empty()),
            period: Duration::from_secs(self.period_secs),
            rates: self.rates,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
