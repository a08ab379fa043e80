//! Core data model types for confquiz.
//!
//! These are the fundamental types the whole confquiz system uses to
//! represent questions, distractors, confidence ratings, and answer records.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

/// Lowest supported confidence rating.
pub const MIN_CONFIDENCE: u8 = 1;
/// Highest supported confidence rating.
pub const MAX_CONFIDENCE: u8 = 5;

/// A single multiple-choice question, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier. Older services omit it; the English text is
    /// used as the identity key in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Question text in English.
    pub question: String,
    /// Question text in German.
    #[serde(default)]
    pub question_de: String,
    /// The one correct option.
    pub correct_answer: String,
    /// Incorrect options offered alongside the correct answer.
    #[serde(default)]
    pub distractors: Vec<Distractor>,
    /// Whether the distractors of this question were machine-generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_generated: Option<bool>,
}

impl Question {
    /// The identity key of this question within a session.
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.question)
    }

    /// Question text for the given locale, falling back to English when
    /// no translation was supplied.
    pub fn text(&self, locale: Locale) -> &str {
        match locale {
            Locale::De if !self.question_de.trim().is_empty() => &self.question_de,
            _ => &self.question,
        }
    }

    /// Look up a distractor by its text.
    pub fn distractor(&self, text: &str) -> Option<&Distractor> {
        self.distractors.iter().find(|d| d.text == text)
    }

    /// Check the invariants the rest of the session relies on.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer {
                question: self.identity().to_string(),
            });
        }

        let mut seen = HashSet::new();
        for d in &self.distractors {
            if d.text == self.correct_answer {
                return Err(QuestionError::DistractorMatchesAnswer {
                    question: self.identity().to_string(),
                    text: d.text.clone(),
                });
            }
            if !seen.insert(d.text.as_str()) {
                return Err(QuestionError::DuplicateDistractor {
                    question: self.identity().to_string(),
                    text: d.text.clone(),
                });
            }
        }
        Ok(())
    }
}

/// An incorrect option plus its provenance.
///
/// On the wire a distractor is either a bare string (human-authored) or an
/// object `{ "text": ..., "is_generated": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireDistractor")]
pub struct Distractor {
    pub text: String,
    pub is_generated: bool,
}

impl Distractor {
    pub fn authored(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_generated: false,
        }
    }

    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_generated: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDistractor {
    Plain(String),
    Flagged {
        text: String,
        #[serde(default)]
        is_generated: bool,
    },
}

impl From<WireDistractor> for Distractor {
    fn from(wire: WireDistractor) -> Self {
        match wire {
            WireDistractor::Plain(text) => Distractor::authored(text),
            WireDistractor::Flagged { text, is_generated } => Distractor { text, is_generated },
        }
    }
}

/// A self-reported certainty rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// Every supported rating, lowest first.
    pub fn all() -> impl Iterator<Item = Confidence> {
        (MIN_CONFIDENCE..=MAX_CONFIDENCE).map(Confidence)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Human-readable label as shown next to the rating.
    pub fn label(self) -> String {
        match self.0 {
            MIN_CONFIDENCE => format!("{} (Not confident)", self.0),
            MAX_CONFIDENCE => format!("{} (Very confident)", self.0),
            n => n.to_string(),
        }
    }
}

impl TryFrom<u8> for Confidence {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&value) {
            Ok(Confidence(value))
        } else {
            Err(format!(
                "confidence must be between {MIN_CONFIDENCE} and {MAX_CONFIDENCE}, got {value}"
            ))
        }
    }
}

impl From<Confidence> for u8 {
    fn from(c: Confidence) -> u8 {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("not a confidence rating: {s}"))?;
        Confidence::try_from(n)
    }
}

/// Display locale for question text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    /// The other locale, for a two-way language toggle.
    pub fn toggled(self) -> Self {
        match self {
            Locale::En => Locale::De,
            Locale::De => Locale::En,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::De => write!(f, "de"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "de" | "german" | "deutsch" => Ok(Locale::De),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// The durable result of answering one question.
///
/// Field names match the JSON the result service stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Question text; identifies the question to the result service.
    pub question: String,
    /// The option the user picked.
    pub answer: String,
    /// Every presented option that was not picked.
    pub not_selected_answers: Vec<String>,
    pub is_correct: bool,
    pub confidence: Confidence,
    pub correct_answer: String,
    /// Provenance of the picked option, see [`crate::answer::build_answer_record`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_generated: Option<bool>,
}
