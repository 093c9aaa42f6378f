//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_GROUP_HEADER;
use crate::controller::{DEFAULT_GROUP_LEDS, GroupLedSet};
use crate::credential::{self, CredentialResolver};
use crate::error::Result;
use crate::retry::RetryConfig;
use crate::service::{Endpoints, StateField};
use crate::transport::Method;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# ledring configuration. Changes made outside the tool may be overwritten.\n\n";

/// Default REST root of the light service.
pub const DEFAULT_BASE_URL: &str = "https://balanced-civet-91.hasura.app/api/rest/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Group id override. Empty = resolve from environment or secret file.
    #[serde(default)]
    pub group_id: String,

    /// Light ids forming the ring, in chase order. Default: 20..=27.
    #[serde(default = "default_group_leds")]
    pub group_leds: Vec<u32>,

    /// Candidate secret files holding the group id, tried in order.
    #[serde(default = "credential::default_secret_paths")]
    pub secret_paths: Vec<PathBuf>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

/// Remote service location and request shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Header carrying the group id on every request.
    #[serde(default = "default_group_header")]
    pub group_header: String,

    #[serde(default = "default_lights_path")]
    pub lights_path: String,

    /// `{id}` is replaced by the light id.
    #[serde(default = "default_light_path")]
    pub light_path: String,

    #[serde(default = "default_set_path")]
    pub set_path: String,

    #[serde(default = "default_delete_path")]
    pub delete_path: String,

    #[serde(default = "default_set_method")]
    pub set_method: Method,

    /// Name of the power field in the set body: "on" or "state".
    #[serde(default = "default_state_field")]
    pub state_field: StateField,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Request pacing and 429 backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_group_leds() -> Vec<u32> {
    DEFAULT_GROUP_LEDS.to_vec()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_group_header() -> String {
    DEFAULT_GROUP_HEADER.into()
}
fn default_lights_path() -> String {
    Endpoints::default().lights_path
}
fn default_light_path() -> String {
    Endpoints::default().light_path
}
fn default_set_path() -> String {
    Endpoints::default().set_path
}
fn default_delete_path() -> String {
    Endpoints::default().delete_path
}
fn default_set_method() -> Method {
    Method::Put
}
fn default_state_field() -> StateField {
    StateField::On
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_pacing_ms() -> u64 {
    100
}
fn default_base_backoff_ms() -> u64 {
    500
}
fn default_max_retries() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            group_id: String::new(),
            group_leds: default_group_leds(),
            secret_paths: credential::default_secret_paths(),
            api: ApiConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            group_header: default_group_header(),
            lights_path: default_lights_path(),
            light_path: default_light_path(),
            set_path: default_set_path(),
            delete_path: default_delete_path(),
            set_method: default_set_method(),
            state_field: default_state_field(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            pacing_ms: default_pacing_ms(),
            base_backoff_ms: default_base_backoff_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `group_leds` is empty.
    EmptyRing,
    /// A light id appears more than once in `group_leds`.
    DuplicateLed(u32),
    /// `api.base_url` is not an http(s) URL.
    InvalidBaseUrl(String),
    /// `api.group_header` is empty or whitespace-only.
    EmptyGroupHeader,
    /// `api.timeout_secs` is zero.
    ZeroTimeout,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyRing => write!(f, "group_leds cannot be empty"),
            ValidationError::DuplicateLed(id) => {
                write!(f, "group_leds lists light {id} more than once")
            }
            ValidationError::InvalidBaseUrl(url) => {
                write!(f, "Invalid api.base_url \"{url}\": must start with http:// or https://")
            }
            ValidationError::EmptyGroupHeader => write!(f, "api.group_header cannot be empty"),
            ValidationError::ZeroTimeout => write!(f, "api.timeout_secs must be at least 1"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ledring"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.group_leds.is_empty() {
            errors.push(ValidationError::EmptyRing);
        }
        let mut seen = Vec::with_capacity(self.group_leds.len());
        for &id in &self.group_leds {
            if seen.contains(&id) {
                if !errors.contains(&ValidationError::DuplicateLed(id)) {
                    errors.push(ValidationError::DuplicateLed(id));
                }
            } else {
                seen.push(id);
            }
        }

        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::InvalidBaseUrl(self.api.base_url.clone()));
        }
        if self.api.group_header.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupHeader);
        }
        if self.api.timeout_secs == 0 {
            errors.push(ValidationError::ZeroTimeout);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    // ── Conversions into runtime components ──

    /// The ring, or a config error if `group_leds` is empty.
    pub fn ring(&self) -> Result<GroupLedSet> {
        GroupLedSet::new(self.group_leds.clone())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            lights_path: self.api.lights_path.clone(),
            light_path: self.api.light_path.clone(),
            set_path: self.api.set_path.clone(),
            delete_path: self.api.delete_path.clone(),
            set_method: self.api.set_method,
            state_field: self.api.state_field,
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            pacing: Duration::from_millis(self.timing.pacing_ms),
            base_backoff: Duration::from_millis(self.timing.base_backoff_ms),
            max_retries: self.timing.max_retries,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Credential resolver for this config.
    ///
    /// `group_override` (e.g. from the command line) wins over `group_id`.
    pub fn credential_resolver(&self, group_override: Option<&str>) -> Arc<CredentialResolver> {
        let override_value = group_override
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| Some(self.group_id.clone()));
        Arc::new(CredentialResolver::new(
            override_value,
            self.secret_paths.clone(),
        ))
    }
}
