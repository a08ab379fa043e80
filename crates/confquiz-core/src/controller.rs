//! Quiz session controller.
//!
//! Drives one session through `Idle -> Starting -> Active -> Submitting ->
//! Completed` and back to `Idle` on restart. A failed start returns to
//! `Idle`, a failed submit returns to `Active` with every answer intact; in
//! both cases the message stays available through
//! [`SessionController::last_error`] until dismissed.
//!
//! All methods take `&self`. State is held behind a mutex that is never held
//! across an await, so focus changes keep working while a request is pending
//! and a second `start`/`submit`/`restart` during one is rejected with
//! [`ControllerError::Busy`]. Dropping a pending `start` or `submit` future
//! puts the controller back in `Idle` or `Active` respectively.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::aggregate::Summary;
use crate::answer::AnswerDraft;
use crate::error::{AnswerError, ControllerError, ServiceError};
use crate::model::{AnswerRecord, Confidence, Question};
use crate::store::{Progress, SessionStore};
use crate::traits::{QuizService, Submission};

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    Idle,
    Starting,
    Active,
    Submitting,
    Completed,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Idle => write!(f, "idle"),
            ControllerState::Starting => write!(f, "starting"),
            ControllerState::Active => write!(f, "active"),
            ControllerState::Submitting => write!(f, "submitting"),
            ControllerState::Completed => write!(f, "completed"),
        }
    }
}

/// What a completed session leaves behind for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub quiz_id: String,
    pub questions: Vec<Question>,
    pub answers: Vec<AnswerRecord>,
    pub summary: Summary,
    /// Confirmation message from the result service.
    pub message: String,
}

#[derive(Debug)]
struct ActiveSession {
    quiz_id: String,
    store: SessionStore,
    drafts: Vec<AnswerDraft>,
}

impl ActiveSession {
    fn select(&mut self, index: usize, option: &str) -> Result<(), ControllerError> {
        let presented = self.store.presented_options(index)?;
        if !presented.iter().any(|o| o == option) {
            return Err(AnswerError::UnknownOption(option.to_string()).into());
        }
        self.drafts[index].selected = Some(option.to_string());
        self.sync(index, &presented)
    }

    fn rate(&mut self, index: usize, confidence: Confidence) -> Result<(), ControllerError> {
        let presented = self.store.presented_options(index)?;
        self.drafts[index].confidence = Some(confidence);
        self.sync(index, &presented)
    }

    /// Push the draft for `index` into the store once it is complete.
    fn sync(&mut self, index: usize, presented: &[String]) -> Result<(), ControllerError> {
        let question = self.store.question(index)?;
        if let Some(record) = self.drafts[index].complete(question, presented) {
            self.store.upsert_answer(index, record?)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Starting,
    Active(ActiveSession),
    Submitting(ActiveSession),
    Completed(SessionOutcome),
}

impl Phase {
    fn state(&self) -> ControllerState {
        match self {
            Phase::Idle => ControllerState::Idle,
            Phase::Starting => ControllerState::Starting,
            Phase::Active(_) => ControllerState::Active,
            Phase::Submitting(_) => ControllerState::Submitting,
            Phase::Completed(_) => ControllerState::Completed,
        }
    }
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    last_error: Option<String>,
}

/// Returns the controller to a stable phase when a pending `start` or
/// `submit` future is dropped before its request finishes. A dropped submit
/// may still have reached the service.
struct PendingGuard<'a> {
    inner: &'a Mutex<Inner>,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(inner: &'a Mutex<Inner>) -> Self {
        Self { inner, armed: true }
    }

    /// The request finished; the caller settles the phase itself.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match std::mem::replace(&mut inner.phase, Phase::Idle) {
            Phase::Starting => tracing::warn!("quiz start abandoned before it finished"),
            Phase::Submitting(mut session) => {
                tracing::warn!(quiz_id = %session.quiz_id, "quiz submission abandoned before it finished");
                session.store.end_submission();
                inner.phase = Phase::Active(session);
            }
            other => inner.phase = other,
        }
    }
}

/// Orchestrates a quiz session against a [`QuizService`].
pub struct SessionController {
    service: Arc<dyn QuizService>,
    inner: Mutex<Inner>,
    shuffle_seed: Option<u64>,
}

impl SessionController {
    pub fn new(service: Arc<dyn QuizService>) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner {
                phase: Phase::Idle,
                last_error: None,
            }),
            shuffle_seed: None,
        }
    }

    /// Make option shuffles reproducible.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a session and load its questions.
    pub async fn start(&self) -> Result<(), ControllerError> {
        {
            let mut inner = self.lock();
            match inner.phase.state() {
                ControllerState::Idle => {
                    inner.phase = Phase::Starting;
                    inner.last_error = None;
                }
                ControllerState::Starting | ControllerState::Submitting => {
                    return Err(ControllerError::Busy)
                }
                state => {
                    return Err(ControllerError::InvalidTransition {
                        action: "start",
                        state,
                    })
                }
            }
        }
        tracing::info!(service = self.service.name(), "starting quiz session");

        let guard = PendingGuard::new(&self.inner);
        let loaded = self.load_session().await;
        guard.disarm();

        let mut inner = self.lock();
        match loaded {
            Ok(session) => {
                tracing::info!(
                    quiz_id = %session.quiz_id,
                    questions = session.store.questions().len(),
                    "quiz session active"
                );
                inner.phase = Phase::Active(session);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to start quiz session: {e}");
                inner.phase = Phase::Idle;
                inner.last_error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    async fn load_session(&self) -> Result<ActiveSession, ServiceError> {
        let started = self.service.start_session().await?;
        let fetched = self.service.fetch_questions(&started.quiz_id).await?;
        fetched.validate()?;

        let quiz_id = if fetched.quiz_id.is_empty() || fetched.quiz_id == started.quiz_id {
            started.quiz_id
        } else {
            tracing::debug!(
                started = %started.quiz_id,
                served = %fetched.quiz_id,
                "service reissued quiz id with questions"
            );
            fetched.quiz_id
        };

        let mut store = match self.shuffle_seed {
            Some(seed) => SessionStore::with_seed(seed),
            None => SessionStore::new(),
        };
        let count = fetched.questions.len();
        store
            .initialize(fetched.questions)
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        Ok(ActiveSession {
            quiz_id,
            store,
            drafts: vec![AnswerDraft::default(); count],
        })
    }

    /// Pick `option` for the question at `index`.
    pub fn select_option(&self, index: usize, option: &str) -> Result<(), ControllerError> {
        self.with_active("answer", |session| session.select(index, option))
    }

    /// Pick the option shown at position `option_index` for the question at `index`.
    pub fn select_option_at(&self, index: usize, option_index: usize) -> Result<(), ControllerError> {
        self.with_active("answer", |session| {
            let presented = session.store.presented_options(index)?;
            let option = presented
                .get(option_index)
                .ok_or_else(|| AnswerError::UnknownOption(format!("option #{}", option_index + 1)))?;
            session.select(index, option)
        })
    }

    /// Rate the confidence for the question at `index`.
    pub fn set_confidence(&self, index: usize, confidence: Confidence) -> Result<(), ControllerError> {
        self.with_active("rate confidence", |session| session.rate(index, confidence))
    }

    /// Record the question most visible to the user. Allowed while a submit
    /// is pending.
    pub fn set_focus(&self, index: usize) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        match &mut inner.phase {
            Phase::Active(session) | Phase::Submitting(session) => {
                session.store.set_focus(index)?;
                Ok(())
            }
            other => Err(ControllerError::InvalidTransition {
                action: "change focus",
                state: other.state(),
            }),
        }
    }

    fn with_active<T>(
        &self,
        action: &'static str,
        f: impl FnOnce(&mut ActiveSession) -> Result<T, ControllerError>,
    ) -> Result<T, ControllerError> {
        let mut inner = self.lock();
        match &mut inner.phase {
            Phase::Active(session) => f(session),
            Phase::Starting | Phase::Submitting(_) => Err(ControllerError::Busy),
            other => Err(ControllerError::InvalidTransition {
                action,
                state: other.state(),
            }),
        }
    }

    /// Score the session and send it to the result service.
    ///
    /// Only permitted once every question has an answer.
    pub async fn submit(&self) -> Result<(), ControllerError> {
        let submission = {
            let mut inner = self.lock();
            let session = match &mut inner.phase {
                Phase::Active(session) => session,
                Phase::Starting | Phase::Submitting(_) => return Err(ControllerError::Busy),
                other => {
                    return Err(ControllerError::InvalidTransition {
                        action: "submit",
                        state: other.state(),
                    })
                }
            };
            if !session.store.is_complete() {
                let progress = session.store.progress();
                return Err(ControllerError::Incomplete {
                    answered: progress.answered,
                    total: progress.total,
                });
            }
            session.store.begin_submission()?;

            let answers = session.store.answers_in_order();
            let summary = Summary::compute(&answers, session.store.questions().len());
            let submission = Submission {
                quiz_id: session.quiz_id.clone(),
                avg_confidence: summary.avg_confidence.unwrap_or_default(),
                score: summary.score,
                total_questions: summary.total_questions,
                answers,
            };

            inner.last_error = None;
            if let Phase::Active(session) = std::mem::replace(&mut inner.phase, Phase::Idle) {
                inner.phase = Phase::Submitting(session);
            }
            submission
        };
        tracing::info!(
            quiz_id = %submission.quiz_id,
            score = submission.score,
            total = submission.total_questions,
            "submitting quiz results"
        );

        let guard = PendingGuard::new(&self.inner);
        let result = self.service.submit_results(&submission).await;
        guard.disarm();

        let mut inner = self.lock();
        let mut session = match std::mem::replace(&mut inner.phase, Phase::Idle) {
            Phase::Submitting(session) => session,
            other => {
                let state = other.state();
                inner.phase = other;
                return Err(ControllerError::InvalidTransition {
                    action: "finish submitting",
                    state,
                });
            }
        };
        session.store.end_submission();

        match result {
            Ok(response) => {
                session.store.mark_completed();
                tracing::info!(quiz_id = %session.quiz_id, "quiz submitted");
                inner.phase = Phase::Completed(SessionOutcome {
                    quiz_id: session.quiz_id,
                    questions: session.store.questions().to_vec(),
                    summary: Summary::compute(&submission.answers, submission.total_questions as usize),
                    answers: submission.answers,
                    message: response.message,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(quiz_id = %session.quiz_id, "failed to submit quiz: {e}");
                inner.phase = Phase::Active(session);
                inner.last_error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Discard the session and return to `Idle`.
    ///
    /// Allowed from `Completed`, and from `Active` to abandon a session.
    pub fn restart(&self) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        match &inner.phase {
            Phase::Starting | Phase::Submitting(_) => return Err(ControllerError::Busy),
            Phase::Active(session) => {
                tracing::info!(quiz_id = %session.quiz_id, "abandoning quiz session");
            }
            Phase::Idle | Phase::Completed(_) => {}
        }
        *inner = Inner {
            phase: Phase::Idle,
            last_error: None,
        };
        Ok(())
    }

    pub fn state(&self) -> ControllerState {
        self.lock().phase.state()
    }

    /// The message of the last failed start or submit, until dismissed.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn dismiss_error(&self) {
        self.lock().last_error = None;
    }

    pub fn quiz_id(&self) -> Option<String> {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => Some(s.quiz_id.clone()),
            Phase::Completed(outcome) => Some(outcome.quiz_id.clone()),
            Phase::Idle | Phase::Starting => None,
        }
    }

    /// Questions of the running session, in display order.
    pub fn questions(&self) -> Vec<Question> {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => s.store.questions().to_vec(),
            Phase::Completed(outcome) => outcome.questions.clone(),
            Phase::Idle | Phase::Starting => Vec::new(),
        }
    }

    /// The memoized option order for the question at `index`.
    pub fn presented_options(&self, index: usize) -> Result<Vec<String>, ControllerError> {
        let mut inner = self.lock();
        match &mut inner.phase {
            Phase::Active(s) | Phase::Submitting(s) => Ok(s.store.presented_options(index)?),
            other => Err(ControllerError::InvalidTransition {
                action: "show options",
                state: other.state(),
            }),
        }
    }

    pub fn answer(&self, index: usize) -> Option<AnswerRecord> {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => s.store.answer(index).cloned(),
            _ => None,
        }
    }

    pub fn draft(&self, index: usize) -> Option<AnswerDraft> {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => s.drafts.get(index).cloned(),
            _ => None,
        }
    }

    /// Answered versus total questions; zero outside a running session.
    pub fn progress(&self) -> Progress {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => s.store.progress(),
            Phase::Completed(outcome) => Progress {
                answered: outcome.answers.len(),
                total: outcome.questions.len(),
            },
            Phase::Idle | Phase::Starting => Progress {
                answered: 0,
                total: 0,
            },
        }
    }

    pub fn focus(&self) -> Option<usize> {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => Some(s.store.focus()),
            _ => None,
        }
    }

    /// Whether submission is currently possible.
    pub fn can_submit(&self) -> bool {
        matches!(&self.lock().phase, Phase::Active(s) if s.store.is_complete())
    }

    /// Score and confidence of the answers given so far.
    pub fn current_summary(&self) -> Option<Summary> {
        match &self.lock().phase {
            Phase::Active(s) | Phase::Submitting(s) => Some(Summary::compute(
                &s.store.answers_in_order(),
                s.store.questions().len(),
            )),
            Phase::Completed(outcome) => Some(outcome.summary.clone()),
            Phase::Idle | Phase::Starting => None,
        }
    }

    /// The finished session, once `Completed`.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match &self.lock().phase {
            Phase::Completed(outcome) => Some(outcome.clone()),
            _ => None,
        }
    }
}
