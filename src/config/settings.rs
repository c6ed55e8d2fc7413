//! Resolved runtime settings.

use std::time::Duration;

use crate::sources::{SourceConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_WORKERS};

/// Environment variable overriding the worker count.
pub const ENV_WORKERS: &str = "SHEETSCORE_WORKERS";
/// Environment variable overriding the fetch timeout (seconds).
pub const ENV_FETCH_TIMEOUT: &str = "SHEETSCORE_FETCH_TIMEOUT";
/// Environment variable providing the default target surname.
pub const ENV_SURNAME: &str = "SHEETSCORE_SURNAME";

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Maximum number of sources evaluated concurrently.
    pub workers: usize,
    /// Per-source fetch timeout.
    pub fetch_timeout: Duration,
    /// Target used when the command line does not name one.
    pub surname: Option<String>,
    /// Configured sources, in configuration order, with paths resolved.
    pub sources: Vec<SourceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            surname: None,
            sources: Vec::new(),
        }
    }
}

impl Settings {
    /// Look up a configured source by name (case-insensitive).
    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources
            .iter()
            .find(|s| s.name.to_lowercase() == name.to_lowercase())
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read variables. Unparseable or empty
    /// values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(workers) = read(ENV_WORKERS).and_then(|v| v.parse::<usize>().ok()) {
            tracing::debug!("Using {} from environment: {}", ENV_WORKERS, workers);
            self.workers = workers.max(1);
        }
        if let Some(secs) = read(ENV_FETCH_TIMEOUT).and_then(|v| v.parse::<u64>().ok()) {
            tracing::debug!("Using {} from environment: {}", ENV_FETCH_TIMEOUT, secs);
            self.fetch_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(surname) = read(ENV_SURNAME) {
            self.surname = Some(surname);
        }
    }
}
