//! Finished-session results with JSON persistence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use confquiz_core::aggregate::Summary;
use confquiz_core::model::AnswerRecord;
use confquiz_core::SessionOutcome;

/// A submitted session as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub quiz_id: String,
    /// When the submission was accepted.
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    /// Answers in question order.
    pub answers: Vec<AnswerRecord>,
}

impl SessionResult {
    pub fn from_outcome(outcome: &SessionOutcome) -> Self {
        Self {
            quiz_id: outcome.quiz_id.clone(),
            finished_at: Utc::now(),
            summary: outcome.summary.clone(),
            answers: outcome.answers.clone(),
        }
    }

    /// File name used when exporting into a directory.
    pub fn file_name(&self) -> String {
        format!("result-{}.json", self.finished_at.format("%Y-%m-%dT%H%M%S"))
    }

    /// Write the result into `dir`, returning the path of the new file.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        self.save_json(&path)?;
        Ok(path)
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: SessionResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }
}
