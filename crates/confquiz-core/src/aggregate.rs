//! Score and confidence aggregation.
//!
//! Everything here is recomputed from the answer collection on demand; no
//! result is cached across mutations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerRecord, Confidence};

/// Number of correct answers.
pub fn score(answers: &[AnswerRecord]) -> u32 {
    answers.iter().filter(|a| a.is_correct).count() as u32
}

/// Arithmetic mean of the confidence ratings, `None` for no answers.
pub fn average_confidence(answers: &[AnswerRecord]) -> Option<f64> {
    if answers.is_empty() {
        return None;
    }
    let sum: u32 = answers.iter().map(|a| a.confidence.value() as u32).sum();
    Some(sum as f64 / answers.len() as f64)
}

/// Incorrect answers that landed on a machine-generated distractor.
pub fn generated_distractor_picks(answers: &[AnswerRecord]) -> u32 {
    answers
        .iter()
        .filter(|a| !a.is_correct && a.is_generated == Some(true))
        .count() as u32
}

/// Headline numbers for a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub score: u32,
    pub total_questions: u32,
    /// `None` only when there were no answers.
    pub avg_confidence: Option<f64>,
}

impl Summary {
    pub fn compute(answers: &[AnswerRecord], total_questions: usize) -> Self {
        Self {
            score: score(answers),
            total_questions: total_questions as u32,
            avg_confidence: average_confidence(answers),
        }
    }

    /// Score as a whole percentage of the question count, rounded.
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as u32
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_percentage(self.percentage())
    }
}

/// Coarse rating of a score, used to colour the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => ScoreBand::High,
            60..=79 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}

/// How often the user was right at each confidence level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationRow {
    pub answered: u32,
    pub correct: u32,
}

impl CalibrationRow {
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64
        }
    }
}

/// Answered and correct counts for every confidence level that occurs.
pub fn calibration(answers: &[AnswerRecord]) -> BTreeMap<Confidence, CalibrationRow> {
    let mut rows: BTreeMap<Confidence, CalibrationRow> = BTreeMap::new();
    for a in answers {
        let row = rows.entry(a.confidence).or_default();
        row.answered += 1;
        if a.is_correct {
            row.correct += 1;
        }
    }
    rows
}
