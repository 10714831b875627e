//! Shared configuration for the shopview CLI and TUI.
//!
//! TOML file + `SHOPVIEW_*` environment layering, named product sources,
//! and translation to `shopview_core::CatalogueConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopview_core::{CatalogueConfig, DEFAULT_ENDPOINT};

/// Name of the source used when nothing else is selected.
pub const DEFAULT_SOURCE: &str = "default";

/// Environment variable that points at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "SHOPVIEW_CONFIG";

const ENV_PREFIX: &str = "SHOPVIEW_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown source '{name}' (available: {available})")]
    UnknownSource { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Source used when `--source` is not given.
    pub default_source: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named product sources.
    #[serde(default)]
    pub sources: BTreeMap<String, Source>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: Some(DEFAULT_SOURCE.into()),
            defaults: Defaults::default(),
            sources: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds. Unset leaves the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named product source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Endpoint answering `GET` with a JSON array of products.
    pub endpoint: String,

    /// Override the default timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override the `User-Agent` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Source {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
            user_agent: None,
        }
    }

    /// The source every install has, even with no config file.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl Config {
    /// Source name to use, honoring an explicit override first.
    pub fn active_source_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_source.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE.into())
    }

    /// Look up a source by name. `default` falls back to the built-in
    /// endpoint when the file does not define it.
    pub fn source(&self, name: &str) -> Result<Source, ConfigError> {
        if let Some(source) = self.sources.get(name) {
            return Ok(source.clone());
        }
        if name == DEFAULT_SOURCE {
            return Ok(Source::builtin());
        }
        Err(ConfigError::UnknownSource {
            name: name.into(),
            available: self.available_sources().join(", "),
        })
    }

    /// Every selectable source name, including the built-in one.
    pub fn available_sources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.keys().cloned().collect();
        if !self.sources.contains_key(DEFAULT_SOURCE) {
            names.insert(0, DEFAULT_SOURCE.into());
        }
        names
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$SHOPVIEW_CONFIG`, then platform
/// conventions, then `$HOME/.config/shopview`.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("dev", "shopview", "shopview").map_or_else(
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
    p.push("shopview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is not
/// an error; it just contributes nothing.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `CatalogueConfig` for a named source, no flag overrides.
pub fn resolve_source(cfg: &Config, name: &str) -> Result<CatalogueConfig, ConfigError> {
    let source = cfg.source(name)?;
    source_to_catalogue_config(&source, &cfg.defaults)
}

/// Translate one source plus global defaults into a `CatalogueConfig`.
pub fn source_to_catalogue_config(
    source: &Source,
    defaults: &Defaults,
) -> Result<CatalogueConfig, ConfigError> {
    let endpoint = parse_endpoint(&source.endpoint)?;
    let secs = source.timeout.or(defaults.timeout);

    Ok(CatalogueConfig {
        endpoint,
        // 0 means "leave the transport default alone".
        timeout: secs.filter(|&s| s > 0).map(Duration::from_secs),
        user_agent: source.user_agent.clone(),
    })
}

/// Parse and validate an endpoint URL. Only http(s) is accepted.
pub fn parse_endpoint(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("unsupported scheme '{}', expected http or https", url.scheme()),
        });
    }
    Ok(url)
}
