//! Shared helper functions for CLI commands.

use serde::Serialize;

use crate::extract::round3;
use crate::sources::ScoreReport;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Format a score rounded to three decimals, without trailing zeros.
pub fn format_score(value: f64) -> String {
    format!("{}", round3(value))
}

/// One source in the JSON score report.
#[derive(Debug, Serialize)]
pub struct ScoreItem {
    pub name: String,
    pub score: Option<f64>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON score report.
#[derive(Debug, Serialize)]
pub struct ScorePayload {
    pub surname: String,
    pub items: Vec<ScoreItem>,
    pub ts: String,
}

impl From<&ScoreReport> for ScorePayload {
    fn from(report: &ScoreReport) -> Self {
        let items = report
            .outcomes
            .iter()
            .map(|outcome| {
                let score = outcome.score().map(round3);
                ScoreItem {
                    name: outcome.source.clone(),
                    score,
                    ok: score.is_some(),
                    error: outcome.error().map(|e| e.to_string()),
                }
            })
            .collect();

        Self {
            surname: report.target.clone(),
            items,
            ts: report.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}
