//! Session state store.
//!
//! Holds the ordered question list, at most one [`AnswerRecord`] per
//! question, the focused question, and the memoized option orders. The
//! store decides completion; it never talks to the network.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{AnswerRecord, Question};
use crate::options::OptionCache;

/// How far through the question set the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Answered share as a whole percentage, rounded.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.answered as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug)]
pub struct SessionStore {
    questions: Vec<Question>,
    answers: BTreeMap<usize, AnswerRecord>,
    focus: usize,
    completed: bool,
    submission_in_flight: bool,
    options: OptionCache,
    rng: StdRng,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// A store whose option shuffles are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            questions: Vec::new(),
            answers: BTreeMap::new(),
            focus: 0,
            completed: false,
            submission_in_flight: false,
            options: OptionCache::new(),
            rng,
        }
    }

    /// Replace the question set and clear everything derived from the old one.
    pub fn initialize(&mut self, questions: Vec<Question>) -> Result<(), StoreError> {
        if self.submission_in_flight {
            return Err(StoreError::InvalidState);
        }
        self.questions = questions;
        self.answers.clear();
        self.focus = 0;
        self.completed = false;
        self.options.invalidate();
        tracing::debug!(questions = self.questions.len(), "session store initialized");
        Ok(())
    }

    /// Insert or replace the answer for the question at `index`.
    pub fn upsert_answer(&mut self, index: usize, record: AnswerRecord) -> Result<(), StoreError> {
        if self.submission_in_flight {
            return Err(StoreError::InvalidState);
        }
        let question = self.question(index)?;
        if record.question != question.question {
            return Err(StoreError::QuestionMismatch {
                expected: question.question.clone(),
                got: record.question,
            });
        }
        self.answers.insert(index, record);
        Ok(())
    }

    /// Record which question is currently most visible. Observational only.
    pub fn set_focus(&mut self, index: usize) -> Result<(), StoreError> {
        self.question(index)?;
        self.focus = index;
        Ok(())
    }

    /// True iff there is at least one question and every question has an answer.
    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.answers.len() == self.questions.len()
    }

    /// Presentation order for the question at `index`, shuffled on first use.
    pub fn presented_options(&mut self, index: usize) -> Result<Vec<String>, StoreError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        Ok(self.options.get_or_shuffle(question, &mut self.rng).to_vec())
    }

    pub fn begin_submission(&mut self) -> Result<(), StoreError> {
        if self.submission_in_flight {
            return Err(StoreError::InvalidState);
        }
        self.submission_in_flight = true;
        Ok(())
    }

    pub fn end_submission(&mut self) {
        self.submission_in_flight = false;
    }

    pub fn submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn question(&self, index: usize) -> Result<&Question, StoreError> {
        self.questions.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.questions.len(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(&index)
    }

    /// Answers in question order.
    pub fn answers_in_order(&self) -> Vec<AnswerRecord> {
        self.answers.values().cloned().collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.len(),
            total: self.questions.len(),
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Indices of questions still lacking an answer.
    pub fn unanswered(&self) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|i| !self.answers.contains_key(i))
            .collect()
    }
}
