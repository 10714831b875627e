//! CLI configuration: thin wrapper around `shopview_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--source,
//! --endpoint, --timeout, --output, --color).

use std::time::Duration;

use clap::ValueEnum;

use shopview_core::CatalogueConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use shopview_config::{
    Config, DEFAULT_SOURCE, Source, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active source name from CLI flags and config.
pub fn active_source_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_source_name(global.source.as_deref())
}

/// Build the `CatalogueConfig` for this invocation.
///
/// `--endpoint` wins outright; otherwise the selected source is used.
/// `--timeout` overrides whatever the source or defaults say.
pub fn resolve_catalogue(global: &GlobalOpts, config: &Config) -> Result<CatalogueConfig, CliError> {
    let mut source = match global.endpoint {
        Some(ref endpoint) => Source::new(endpoint.clone()),
        None => config.source(&active_source_name(global, config))?,
    };
    if let Some(timeout) = global.timeout {
        source.timeout = Some(timeout);
    }

    Ok(shopview_config::source_to_catalogue_config(
        &source,
        &config.defaults,
    )?)
}

/// Output format: flag > `defaults.output` > table.
pub fn effective_output(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag > `defaults.color` > auto.
pub fn effective_color(global: &GlobalOpts, config: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

/// Timeout actually applied, for messages.
pub fn describe_timeout(catalogue: &CatalogueConfig) -> String {
    catalogue
        .timeout
        .map_or_else(|| "none".into(), |d: Duration| format!("{}s", d.as_secs()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn opts() -> GlobalOpts {
        GlobalOpts {
            source: None,
            endpoint: None,
            timeout: None,
            output: None,
            color: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn endpoint_flag_beats_source() {
        let mut global = opts();
        global.endpoint = Some("http://127.0.0.1:9999/products".into());
        global.source = Some("does-not-exist".into());

        let catalogue = resolve_catalogue(&global, &Config::default()).unwrap();
        assert_eq!(catalogue.endpoint.as_str(), "http://127.0.0.1:9999/products");
    }

    #[test]
    fn unknown_source_is_an_error() {
        let mut global = opts();
        global.source = Some("nope".into());
        let err = resolve_catalogue(&global, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::SourceNotFound { .. }));
    }

    #[test]
    fn timeout_flag_overrides_defaults() {
        let mut global = opts();
        global.timeout = Some(3);
        let catalogue = resolve_catalogue(&global, &Config::default()).unwrap();
        assert_eq!(catalogue.timeout, Some(Duration::from_secs(3)));
        assert_eq!(describe_timeout(&catalogue), "3s");
    }

    #[test]
    fn no_timeout_configured_leaves_transport_default() {
        let catalogue = resolve_catalogue(&opts(), &Config::default()).unwrap();
        assert_eq!(catalogue.timeout, None);
        assert_eq!(describe_timeout(&catalogue), "none");
    }

    #[test]
    fn output_falls_back_to_config_then_table() {
        let mut cfg = Config::default();
        assert_eq!(effective_output(&opts(), &cfg), OutputFormat::Table);

        cfg.defaults.output = "json-compact".into();
        assert_eq!(effective_output(&opts(), &cfg), OutputFormat::JsonCompact);

        let mut global = opts();
        global.output = Some(OutputFormat::Yaml);
        assert_eq!(effective_output(&global, &cfg), OutputFormat::Yaml);

        cfg.defaults.output = "bogus".into();
        assert_eq!(effective_output(&opts(), &cfg), OutputFormat::Table);
    }
}
