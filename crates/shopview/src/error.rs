//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shopview_config::ConfigError;
use shopview_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const LOAD_FAILED: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Loading ──────────────────────────────────────────────────────
    #[error("Failed to load products.")]
    #[diagnostic(
        code(shopview::load_failed),
        help(
            "Could not fetch a product list from {endpoint}\n\
             Run with -v for the underlying error, or pick another source with --source."
        )
    )]
    LoadFailed { endpoint: String },

    #[error(transparent)]
    #[diagnostic(code(shopview::core))]
    Core(#[from] CoreError),

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shopview::not_found),
        help("Run: shopview {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopview::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Source '{name}' not found in configuration")]
    #[diagnostic(
        code(shopview::source_not_found),
        help(
            "Available sources: {available}\n\
             Add one with: shopview config set sources.<name>.endpoint <URL>"
        )
    )]
    SourceNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(shopview::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(shopview::config))]
    Config { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoadFailed { .. } => exit_code::LOAD_FAILED,
            Self::Core(e) if e.is_load_failure() => exit_code::LOAD_FAILED,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownSource { name, available } => {
                CliError::SourceNotFound { name, available }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failures_exit_7() {
        let err = CliError::LoadFailed {
            endpoint: "http://127.0.0.1:1/products".into(),
        };
        assert_eq!(err.exit_code(), exit_code::LOAD_FAILED);
        assert_eq!(
            CliError::from(CoreError::load_failure("boom")).exit_code(),
            exit_code::LOAD_FAILED
        );
    }

    #[test]
    fn unknown_source_maps_to_source_not_found() {
        let err = CliError::from(ConfigError::UnknownSource {
            name: "prod".into(),
            available: "default".into(),
        });
        assert!(matches!(err, CliError::SourceNotFound { .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "endpoint".into(),
            reason: "invalid URL: x".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
