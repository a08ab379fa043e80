//! HTTP quiz service implementation.
//!
//! Talks JSON to the quiz backend. Session affinity is kept with a cookie
//! store shared by every call, and the quiz id is additionally sent
//! explicitly when fetching questions.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use confquiz_core::error::ServiceError;
use confquiz_core::traits::{QuestionsResponse, QuizService, StartResponse, Submission, SubmitResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// The backend routes, each with the message shown when a failure carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Start,
    Questions,
    Submit,
    Health,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Start => "/start_quiz",
            Endpoint::Questions => "/get_all_questions",
            Endpoint::Submit => "/submit_quiz",
            Endpoint::Health => "/health",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Endpoint::Start => "Failed to start quiz",
            Endpoint::Questions => "Failed to load questions",
            Endpoint::Submit => "Failed to submit quiz",
            Endpoint::Health => "Quiz service is unavailable",
        }
    }
}

/// Response to a health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
struct QuestionsRequest<'a> {
    quiz_id: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pick the message for a failed call. A JSON body yields its `message`
/// field, or the endpoint default when that is missing or blank. Any other
/// body is shown as raw text, or the default when empty.
fn error_message(body: &str, default: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.trim().is_empty() => message,
        Ok(_) => default.to_string(),
        Err(_) if body.trim().is_empty() => default.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Quiz service reached over HTTP.
pub struct HttpQuizService {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpQuizService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| ServiceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the backend's health route.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let request = self.client.get(self.url(Endpoint::Health));
        self.send(Endpoint::Health, request).await
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(self.timeout_secs)
            } else {
                ServiceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(self.timeout_secs)
            } else {
                ServiceError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            let message = error_message(&body, endpoint.default_message());
            tracing::warn!(status = status.as_u16(), path = endpoint.path(), "{message}");
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(path = endpoint.path(), bytes = body.len(), "response received");
        serde_json::from_str(&body).map_err(|e| {
            ServiceError::MalformedResponse(format!("{}: {e}", endpoint.path()))
        })
    }
}

#[async_trait]
impl QuizService for HttpQuizService {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn start_session(&self) -> Result<StartResponse, ServiceError> {
        let request = self
            .client
            .post(self.url(Endpoint::Start))
            .header("content-type", "application/json");
        self.send(Endpoint::Start, request).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_questions(&self, quiz_id: &str) -> Result<QuestionsResponse, ServiceError> {
        let request = self
            .client
            .post(self.url(Endpoint::Questions))
            .json(&QuestionsRequest { quiz_id });
        let response: QuestionsResponse = self.send(Endpoint::Questions, request).await?;
        response.validate()?;
        tracing::debug!(questions = response.questions.len(), "questions loaded");
        Ok(response)
    }

    #[instrument(skip(self, submission), fields(quiz_id = %submission.quiz_id))]
    async fn submit_results(
        &self,
        submission: &Submission,
    ) -> Result<SubmitResponse, ServiceError> {
        let request = self.client.post(self.url(Endpoint::Submit)).json(submission);
        self.send(Endpoint::Submit, request).await
    }
}
