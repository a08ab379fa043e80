//! Mock quiz service for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use confquiz_core::error::ServiceError;
use confquiz_core::model::Question;
use confquiz_core::traits::{QuestionsResponse, QuizService, StartResponse, Submission, SubmitResponse};

/// An in-memory quiz service for exercising the session controller
/// without a backend.
///
/// Serves a fixed question set, records every submission, and can be told
/// to fail upcoming calls.
pub struct MockQuizService {
    questions: Vec<Question>,
    /// Failures queued for the next start calls.
    start_failures: Mutex<VecDeque<ServiceError>>,
    /// Failures queued for the next submit calls.
    submit_failures: Mutex<VecDeque<ServiceError>>,
    /// Submissions accepted so far.
    submissions: Mutex<Vec<Submission>>,
    /// Artificial latency applied to every call.
    latency: Duration,
    /// Number of calls made.
    call_count: AtomicU32,
}

impl MockQuizService {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            start_failures: Mutex::new(VecDeque::new()),
            submit_failures: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next start call fail with `error`.
    pub fn fail_next_start(&self, error: ServiceError) {
        lock(&self.start_failures).push_back(error);
    }

    /// Make the next submit call fail with `error`.
    pub fn fail_next_submit(&self, error: ServiceError) {
        lock(&self.submit_failures).push_back(error);
    }

    /// Submissions accepted so far.
    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.submissions).clone()
    }

    /// Get the number of calls made to this service.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    async fn enter(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl QuizService for MockQuizService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start_session(&self) -> Result<StartResponse, ServiceError> {
        self.enter().await;
        if let Some(e) = lock(&self.start_failures).pop_front() {
            return Err(e);
        }
        Ok(StartResponse {
            status: "success".into(),
            quiz_id: Uuid::new_v4().to_string(),
            message: "Quiz started successfully".into(),
        })
    }

    async fn fetch_questions(&self, quiz_id: &str) -> Result<QuestionsResponse, ServiceError> {
        self.enter().await;
        Ok(QuestionsResponse {
            status: "success".into(),
            quiz_id: quiz_id.to_string(),
            questions: self.questions.clone(),
            total_questions: self.questions.len() as u32,
        })
    }

    async fn submit_results(
        &self,
        submission: &Submission,
    ) -> Result<SubmitResponse, ServiceError> {
        self.enter().await;
        if let Some(e) = lock(&self.submit_failures).pop_front() {
            return Err(e);
        }
        lock(&self.submissions).push(submission.clone());
        Ok(SubmitResponse {
            status: "success".into(),
            message: "Quiz submitted successfully".into(),
        })
    }
}
