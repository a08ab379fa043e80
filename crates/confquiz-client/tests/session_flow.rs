//! End-to-end session tests: the controller driving the HTTP client against
//! a mocked backend, and the in-memory mock service.

use std::sync::Arc;

use confquiz_client::{HttpQuizService, MockQuizService};
use confquiz_core::model::{Confidence, Distractor, Question};
use confquiz_core::{ControllerError, ControllerState, ServiceError, SessionController};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: None,
            question: format!("What is {i} + {i}?"),
            question_de: format!("Was ist {i} + {i}?"),
            correct_answer: (i * 2).to_string(),
            distractors: vec![
                Distractor::authored((i * 2 + 1).to_string()),
                Distractor::generated((i * 2 + 2).to_string()),
                Distractor::generated((i * 2 + 10).to_string()),
            ],
            is_generated: Some(true),
        })
        .collect()
}

async fn mount_session(server: &MockServer, questions: &[Question]) {
    Mock::given(method("POST"))
        .and(path("/start_quiz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "quiz_id": "quiz-e2e",
            "message": "Quiz started successfully"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/get_all_questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "quiz_id": "quiz-e2e",
            "questions": questions,
            "total_questions": questions.len()
        })))
        .mount(server)
        .await;
}

fn confidence(n: u8) -> Confidence {
    Confidence::try_from(n).unwrap()
}

fn answer_all_correctly(controller: &SessionController, confidence_value: u8) {
    for (i, q) in controller.questions().iter().enumerate() {
        controller.select_option(i, &q.correct_answer).unwrap();
        controller.set_confidence(i, confidence(confidence_value)).unwrap();
    }
}

#[tokio::test]
async fn perfect_session_over_http() {
    let server = MockServer::start().await;
    mount_session(&server, &make_questions(3)).await;
    Mock::given(method("POST"))
        .and(path("/submit_quiz"))
        .and(body_partial_json(serde_json::json!({
            "quiz_id": "quiz-e2e",
            "score": 3,
            "avg_confidence": 5.0,
            "total_questions": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Quiz submitted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = Arc::new(HttpQuizService::new(&server.uri(), 5).unwrap());
    let controller = SessionController::new(service);

    controller.start().await.unwrap();
    assert_eq!(controller.questions().len(), 3);
    answer_all_correctly(&controller, 5);
    controller.submit().await.unwrap();

    assert_eq!(controller.state(), ControllerState::Completed);
    let outcome = controller.outcome().unwrap();
    assert_eq!(outcome.summary.score, 3);
    assert_eq!(outcome.summary.avg_confidence, Some(5.0));
    assert_eq!(outcome.message, "Quiz submitted successfully");
}

#[tokio::test]
async fn partial_session_is_blocked() {
    let server = MockServer::start().await;
    mount_session(&server, &make_questions(2)).await;
    Mock::given(method("POST"))
        .and(path("/submit_quiz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = Arc::new(HttpQuizService::new(&server.uri(), 5).unwrap());
    let controller = SessionController::new(service);
    controller.start().await.unwrap();

    let correct = controller.questions()[0].correct_answer.clone();
    controller.select_option(0, &correct).unwrap();
    controller.set_confidence(0, confidence(3)).unwrap();

    assert!(!controller.can_submit());
    assert!(matches!(
        controller.submit().await,
        Err(ControllerError::Incomplete { answered: 1, total: 2 })
    ));
    assert_eq!(controller.state(), ControllerState::Active);
}

#[tokio::test]
async fn submit_failure_then_retry_over_http() {
    let server = MockServer::start().await;
    mount_session(&server, &make_questions(2)).await;
    Mock::given(method("POST"))
        .and(path("/submit_quiz"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "status": "error",
            "message": "Failed to submit quiz: database is locked"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit_quiz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Quiz submitted successfully"
        })))
        .mount(&server)
        .await;

    let service = Arc::new(HttpQuizService::new(&server.uri(), 5).unwrap());
    let controller = SessionController::new(service);
    controller.start().await.unwrap();
    answer_all_correctly(&controller, 4);
    let before: Vec<_> = (0..2).map(|i| controller.answer(i)).collect();

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Service(ServiceError::Api { status: 500, .. })
    ));
    assert_eq!(controller.state(), ControllerState::Active);
    assert_eq!(
        controller.last_error().as_deref(),
        Some("Failed to submit quiz: database is locked")
    );
    let after: Vec<_> = (0..2).map(|i| controller.answer(i)).collect();
    assert_eq!(before, after);

    controller.submit().await.unwrap();
    assert_eq!(controller.state(), ControllerState::Completed);
}

#[tokio::test]
async fn start_failure_over_http_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_quiz"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let service = Arc::new(HttpQuizService::new(&server.uri(), 5).unwrap());
    let controller = SessionController::new(service);

    assert!(controller.start().await.is_err());
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(controller.last_error().as_deref(), Some("upstream unavailable"));
}

#[tokio::test]
async fn mock_service_full_cycle_with_restart() {
    let service = Arc::new(MockQuizService::new(make_questions(2)));
    let controller = SessionController::new(service.clone()).with_shuffle_seed(99);

    controller.start().await.unwrap();
    let first_id = controller.quiz_id().unwrap();

    let questions = controller.questions();
    controller
        .select_option(1, &questions[1].distractors[2].text)
        .unwrap();
    controller.set_confidence(1, confidence(1)).unwrap();
    controller
        .select_option(0, &questions[0].correct_answer)
        .unwrap();
    controller.set_confidence(0, confidence(3)).unwrap();

    service.fail_next_submit(ServiceError::Timeout(120));
    assert!(controller.submit().await.is_err());
    controller.submit().await.unwrap();

    let submitted = service.submissions();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].quiz_id, first_id);
    assert_eq!(submitted[0].score, 1);
    assert_eq!(submitted[0].avg_confidence, 2.0);
    assert_eq!(submitted[0].answers[1].is_generated, Some(true));

    controller.restart().unwrap();
    assert_eq!(controller.state(), ControllerState::Idle);
    controller.start().await.unwrap();
    assert_ne!(controller.quiz_id().unwrap(), first_id);
    assert_eq!(controller.progress().answered, 0);
}
