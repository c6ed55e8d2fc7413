//! Configuration management for sheetscore using the prefer crate.

mod settings;

pub use settings::{Settings, ENV_FETCH_TIMEOUT, ENV_SURNAME, ENV_WORKERS};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::Strategy;
use crate::sources::SourceConfig;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {detail}")]
    Parse { format: &'static str, detail: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A source as written in a config file.
///
/// Older configs describe the strategy with boolean flags; an explicit
/// `strategy` key takes priority over them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub name: String,
    /// Path to the source's CSV export.
    #[serde(alias = "location")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub prefer_total: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sum_until_total: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub take_last_total: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SourceEntry {
    /// The effective strategy for this source.
    pub fn strategy(&self) -> Strategy {
        self.strategy.unwrap_or_else(|| {
            Strategy::from_flags(self.prefer_total, self.sum_until_total, self.take_last_total)
        })
    }
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of sources evaluated concurrently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Per-source fetch timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout: Option<u64>,
    /// Default target surname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Gradebook sources, evaluated and reported in this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceEntry>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no config file is found or it cannot be parsed.
    pub async fn load() -> Self {
        match prefer::load("sheetscore").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring discovered config: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                detail: e.to_string(),
            }),
            "json" => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                detail: e.to_string(),
            }),
            _ => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                detail: e.to_string(),
            }),
        }
    }

    /// Directory holding the loaded config file; relative export paths start here.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.source_path.as_deref().and_then(Path::parent).map(Path::to_path_buf)
    }

    /// Apply configuration to settings, resolving source paths against `base_dir`.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) -> Result<(), ConfigError> {
        if let Some(workers) = self.workers {
            settings.workers = workers.max(1);
        }
        if let Some(timeout) = self.fetch_timeout {
            settings.fetch_timeout = Duration::from_secs(timeout.max(1));
        }
        if let Some(ref surname) = self.surname {
            settings.surname = Some(surname.clone());
        }

        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(self.sources.len());
        for entry in &self.sources {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid("source with an empty name".to_string()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::Invalid(format!("duplicate source name '{}'", name)));
            }
            let location = resolve_export_path(&entry.path, base_dir);
            sources.push(SourceConfig::new(
                name,
                &location.to_string_lossy(),
                entry.strategy(),
            ));
        }
        settings.sources = sources;
        Ok(())
    }
}

/// Locate a source's CSV export: `~` expands to the home directory and
/// relative paths hang off `base_dir`.
fn resolve_export_path(raw: &str, base_dir: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

/// Options controlling where configuration comes from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file (skips discovery).
    pub config_path: Option<PathBuf>,
    /// Resolve relative paths from the working directory instead of the config file.
    pub use_cwd: bool,
}

/// Load configuration and resolve it into settings.
///
/// An explicit config path must load; a discovered one falls back to
/// defaults. Environment variables override both.
pub async fn load_settings_with_options(options: LoadOptions) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = if options.use_cwd {
        cwd
    } else {
        config.config_dir().unwrap_or(cwd)
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir)?;
    settings.apply_env_overrides();

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_CONFIG: &str = r#"
workers = 2
fetch_timeout = 5

[[sources]]
name = "ИСРПО"
path = "exports/isrpo.csv"
sum_until_total = true

[[sources]]
name = "ДМ"
path = "/data/dm.csv"
take_last_total = true
prefer_total = true

[[sources]]
name = "ОП"
location = "op.csv"
strategy = "prefer_total"
take_last_total = true
"#;

    #[test]
    fn test_parse_toml_with_legacy_flags() {
        let config = Config::parse(TOML_CONFIG, "toml").unwrap();
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[0].strategy(), Strategy::SumUntilTotal);
        assert_eq!(config.sources[1].strategy(), Strategy::TakeLast);
        // Explicit strategy beats legacy flags.
        assert_eq!(config.sources[2].strategy(), Strategy::PreferTotal);
        assert_eq!(config.sources[2].path, "op.csv");
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = "sources:\n  - name: Алгоритмы\n    path: algo.csv\n    strategy: take_last\n";
        let config = Config::parse(yaml, "yml").unwrap();
        assert_eq!(config.sources[0].strategy(), Strategy::TakeLast);

        let json = r#"{"surname": "Иванов", "sources": [{"name": "ДМ", "path": "dm.csv"}]}"#;
        let config = Config::parse(json, "json").unwrap();
        assert_eq!(config.surname.as_deref(), Some("Иванов"));
        assert_eq!(config.sources[0].strategy(), Strategy::SumUntilTotal);
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = Config::parse("workers = [", "toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_apply_resolves_relative_paths() {
        let config = Config::parse(TOML_CONFIG, "toml").unwrap();
        let mut settings = Settings::default();
        config
            .apply_to_settings(&mut settings, Path::new("/srv/grades"))
            .unwrap();

        assert_eq!(settings.workers, 2);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(5));
        assert_eq!(
            PathBuf::from(&settings.sources[0].location),
            PathBuf::from("/srv/grades/exports/isrpo.csv")
        );
        assert_eq!(settings.sources[1].location, "/data/dm.csv");
    }

    #[test]
    fn test_zero_fetch_timeout_clamped() {
        let config = Config::parse("fetch_timeout = 0\nworkers = 0\n", "toml").unwrap();
        let mut settings = Settings::default();
        config
            .apply_to_settings(&mut settings, Path::new("."))
            .unwrap();
        assert_eq!(settings.fetch_timeout, Duration::from_secs(1));
        assert_eq!(settings.workers, 1);
    }

    #[test]
    fn test_duplicate_source_names_rejected() {
        let toml = r#"
[[sources]]
name = "ДМ"
path = "a.csv"

[[sources]]
name = "дм"
path = "b.csv"
"#;
        let config = Config::parse(toml, "toml").unwrap();
        let err = config
            .apply_to_settings(&mut Settings::default(), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_load_from_path_records_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetscore.toml");
        std::fs::write(&path, TOML_CONFIG).unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.config_dir().as_deref(), Some(dir.path()));
    }
}
