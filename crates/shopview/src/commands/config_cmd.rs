//! Config subcommand handlers.

use std::fmt::Write as _;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DEFAULT_SOURCE, Source};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-ish text for the table view.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_source {
        let _ = writeln!(out, "default_source = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    if let Some(timeout) = cfg.defaults.timeout {
        let _ = writeln!(out, "timeout = {timeout}");
    }

    for (name, s) in &cfg.sources {
        let _ = writeln!(out);
        let _ = writeln!(out, "[sources.{name}]");
        let _ = writeln!(out, "endpoint = \"{}\"", s.endpoint);
        if let Some(timeout) = s.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref agent) = s.user_agent {
            let _ = writeln!(out, "user_agent = \"{agent}\"");
        }
    }

    out.trim_end().to_owned()
}

fn parse_timeout(field: &str, value: &str) -> Result<u64, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be a number (seconds)".into(),
    })
}

fn unknown_key(key: &str) -> CliError {
    CliError::Validation {
        field: key.into(),
        reason: format!(
            "unknown config key '{key}'. Valid keys: default_source, defaults.output, \
             defaults.color, defaults.timeout, sources.<name>.endpoint, \
             sources.<name>.timeout, sources.<name>.user_agent"
        ),
    }
}

/// Apply one `key = value` assignment to the config in memory.
pub(crate) fn apply_set(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["default_source" | "default-source"] => cfg.default_source = Some(value),
        ["defaults", "output"] => {
            if !matches!(
                value.as_str(),
                "table" | "json" | "json-compact" | "yaml" | "plain"
            ) {
                return Err(CliError::Validation {
                    field: "defaults.output".into(),
                    reason: "must be 'table', 'json', 'json-compact', 'yaml', or 'plain'".into(),
                });
            }
            cfg.defaults.output = value;
        }
        ["defaults", "color"] => {
            if !matches!(value.as_str(), "auto" | "always" | "never") {
                return Err(CliError::Validation {
                    field: "defaults.color".into(),
                    reason: "must be 'auto', 'always', or 'never'".into(),
                });
            }
            cfg.defaults.color = value;
        }
        ["defaults", "timeout"] => cfg.defaults.timeout = Some(parse_timeout(key, &value)?),
        ["sources", name, field] => {
            let name = (*name).to_owned();
            match *field {
                "endpoint" => {
                    shopview_config::parse_endpoint(&value)?;
                    match cfg.sources.get_mut(&name) {
                        Some(source) => source.endpoint = value,
                        None => {
                            cfg.sources.insert(name, Source::new(value));
                        }
                    }
                }
                "timeout" => {
                    let timeout = parse_timeout(key, &value)?;
                    source_mut(cfg, &name, key)?.timeout = Some(timeout);
                }
                "user_agent" | "user-agent" => {
                    source_mut(cfg, &name, key)?.user_agent = Some(value);
                }
                _ => return Err(unknown_key(key)),
            }
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

/// Existing source, or the built-in one materialized for `default`.
fn source_mut<'a>(cfg: &'a mut Config, name: &str, key: &str) -> Result<&'a mut Source, CliError> {
    if name == DEFAULT_SOURCE {
        return Ok(cfg
            .sources
            .entry(name.to_owned())
            .or_insert_with(Source::builtin));
    }
    cfg.sources.get_mut(name).ok_or_else(|| CliError::Validation {
        field: key.into(),
        reason: format!("source '{name}' has no endpoint yet; set sources.{name}.endpoint first"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let color = output::should_color(config::effective_color(global, &cfg));

    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut starter = Config::default();
            starter
                .sources
                .insert(DEFAULT_SOURCE.into(), Source::builtin());
            let written = config::save_config(&starter)?;

            output::print_status(
                &output::success(
                    &format!("✓ Configuration written to {}", written.display()),
                    color,
                ),
                global.quiet,
            );
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let format = config::effective_output(global, &cfg);
            let out = output::render_single(format, &cfg, format_config, |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = cfg;
            apply_set(&mut cfg, &key, value)?;
            config::save_config(&cfg)?;
            output::print_status(&output::success(&format!("✓ Set {key}"), color), global.quiet);
            Ok(())
        }

        // ── Sources ─────────────────────────────────────────────────
        ConfigCommand::Sources => {
            let active = config::active_source_name(global, &cfg);
            for name in cfg.available_sources() {
                let endpoint = cfg.source(&name).map(|s| s.endpoint).unwrap_or_default();
                let marker = if name == active { " *" } else { "" };
                output::print_output(&format!("{name}{marker}\t{endpoint}"), global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = cfg;
            cfg.source(&name)?;
            cfg.default_source = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(
                &output::success(&format!("✓ Default source set to '{name}'"), color),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_creates_a_source_from_its_endpoint() {
        let mut cfg = Config::default();
        apply_set(&mut cfg, "sources.local.endpoint", "http://127.0.0.1:3000/products".into())
            .unwrap();
        apply_set(&mut cfg, "sources.local.timeout", "4".into()).unwrap();

        let local = &cfg.sources["local"];
        assert_eq!(local.endpoint, "http://127.0.0.1:3000/products");
        assert_eq!(local.timeout, Some(4));
    }

    #[test]
    fn set_defaults_timeout() {
        let mut cfg = Config::default();
        assert_eq!(cfg.defaults.timeout, None);
        apply_set(&mut cfg, "defaults.timeout", "15".into()).unwrap();
        assert_eq!(cfg.defaults.timeout, Some(15));
        assert!(format_config(&cfg).contains("timeout = 15"));
    }

    #[test]
    fn set_timeout_on_missing_source_fails() {
        let mut cfg = Config::default();
        assert!(apply_set(&mut cfg, "sources.ghost.timeout", "4".into()).is_err());
    }

    #[test]
    fn set_on_default_materializes_builtin() {
        let mut cfg = Config::default();
        apply_set(&mut cfg, "sources.default.timeout", "9".into()).unwrap();
        assert_eq!(cfg.sources["default"].endpoint, shopview_core::DEFAULT_ENDPOINT);
    }

    #[test]
    fn set_validates_values() {
        let mut cfg = Config::default();
        assert!(apply_set(&mut cfg, "defaults.output", "xml".into()).is_err());
        assert!(apply_set(&mut cfg, "defaults.timeout", "soon".into()).is_err());
        assert!(apply_set(&mut cfg, "sources.x.endpoint", "ftp://x".into()).is_err());
        assert!(apply_set(&mut cfg, "nonsense", "1".into()).is_err());
    }

    #[test]
    fn format_config_lists_sources() {
        let mut cfg = Config::default();
        cfg.sources
            .insert("local".into(), Source::new("http://127.0.0.1:3000/products"));
        let text = format_config(&cfg);
        assert!(text.contains("default_source = \"default\""));
        assert!(text.contains("[sources.local]"));
    }
}
