//! Gradebook sources and multi-source score runs.

mod runner;

pub use runner::{ScoreRunner, DEFAULT_FETCH_TIMEOUT, DEFAULT_WORKERS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{ExtractionResult, Strategy};
use crate::fetch::FetchError;

/// One gradebook to look a person up in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name, unique within a run (e.g., a course name).
    pub name: String,
    /// Where the fetcher finds the table (a file path for CSV exports).
    pub location: String,
    #[serde(default)]
    pub strategy: Strategy,
}

impl SourceConfig {
    pub fn new(name: &str, location: &str, strategy: Strategy) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            strategy,
        }
    }
}

/// Why a source produced no result at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Source task failed: {0}")]
    Task(String),
}

/// Result of evaluating one source.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: String,
    /// `Ok(None)` means the person has no row in this source.
    pub result: Result<Option<ExtractionResult>, SourceError>,
}

impl SourceOutcome {
    /// The extracted score, if the person was found and had numeric data.
    pub fn score(&self) -> Option<f64> {
        match &self.result {
            Ok(Some(found)) => found.score,
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.result.is_err()
    }

    pub fn error(&self) -> Option<&SourceError> {
        self.result.as_ref().err()
    }
}

/// All outcomes of one run, ordered like the input sources.
#[derive(Debug)]
pub struct ScoreReport {
    pub target: String,
    pub outcomes: Vec<SourceOutcome>,
    pub generated_at: DateTime<Utc>,
}

impl ScoreReport {
    pub fn new(target: &str, outcomes: Vec<SourceOutcome>) -> Self {
        Self {
            target: target.to_string(),
            outcomes,
            generated_at: Utc::now(),
        }
    }

    /// Sources that produced a score.
    pub fn found_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.score().is_some()).count()
    }

    /// Sources that answered but had no score for the target.
    pub fn not_found_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.is_failed() && o.score().is_none())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &SourceError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.source.as_str(), e)))
    }
}
