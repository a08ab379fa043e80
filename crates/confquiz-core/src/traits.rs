//! The boundary to the external question/result service.
//!
//! `confquiz-client` implements [`QuizService`] over HTTP; tests use the
//! in-memory mock from the same crate.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::{AnswerRecord, Question};

/// Trait for services that hand out sessions and questions and accept results.
#[async_trait]
pub trait QuizService: Send + Sync {
    /// Human-readable service name (e.g. "http").
    fn name(&self) -> &str;

    /// Open a new session.
    async fn start_session(&self) -> Result<StartResponse, ServiceError>;

    /// Fetch the full question set for `quiz_id`.
    async fn fetch_questions(&self, quiz_id: &str) -> Result<QuestionsResponse, ServiceError>;

    /// Submit a finished session.
    async fn submit_results(&self, submission: &Submission)
        -> Result<SubmitResponse, ServiceError>;
}

/// Response to a start call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub status: String,
    pub quiz_id: String,
    #[serde(default)]
    pub message: String,
}

/// Response to a fetch-questions call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub status: String,
    pub quiz_id: String,
    pub questions: Vec<Question>,
    pub total_questions: u32,
}

impl QuestionsResponse {
    /// Reject responses the session could not run on.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.questions.is_empty() {
            return Err(ServiceError::MalformedResponse(
                "question set is empty".into(),
            ));
        }
        if self.total_questions as usize != self.questions.len() {
            return Err(ServiceError::MalformedResponse(format!(
                "total_questions is {} but {} questions were sent",
                self.total_questions,
                self.questions.len()
            )));
        }
        let mut seen = HashSet::new();
        for q in &self.questions {
            q.validate()
                .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
            if !seen.insert(q.identity()) {
                return Err(ServiceError::MalformedResponse(format!(
                    "question '{}' appears more than once",
                    q.identity()
                )));
            }
        }
        Ok(())
    }
}

/// Request body for a submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub quiz_id: String,
    pub answers: Vec<AnswerRecord>,
    pub score: u32,
    pub avg_confidence: f64,
    pub total_questions: u32,
}

/// Response to a submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}
