//! Error types for confquiz.
//!
//! `ServiceError` is defined here rather than in `confquiz-client` so the
//! session controller can classify and surface failures from any
//! `QuizService` implementation without string matching.

use thiserror::Error;

/// Errors that can occur when talking to the external quiz service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The service answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// The service answered 2xx but the body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl ServiceError {
    /// The message to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A question that violates the session invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question '{question}' has no correct answer")]
    EmptyCorrectAnswer { question: String },

    #[error("question '{question}' lists its correct answer '{text}' as a distractor")]
    DistractorMatchesAnswer { question: String, text: String },

    #[error("question '{question}' lists distractor '{text}' twice")]
    DuplicateDistractor { question: String, text: String },
}

/// Failure to turn a selection into an answer record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("'{0}' is not one of the presented options")]
    UnknownOption(String),
}

/// Errors emitted by the session state store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("operation not allowed while a submission is in flight")]
    InvalidState,

    #[error("question index {index} out of range ({len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("answer for '{got}' cannot be stored under question '{expected}'")]
    QuestionMismatch { expected: String, got: String },
}

/// Errors emitted by the session controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    /// The operation is not valid in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: crate::controller::ControllerState,
    },

    /// Another start or submit is still in flight.
    #[error("another request is already in flight")]
    Busy,

    /// Submission attempted before every question has an answer.
    #[error("{answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Answer(#[from] AnswerError),
}
