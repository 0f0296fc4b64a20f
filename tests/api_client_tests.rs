//! Mock HTTP tests for ApiClient.
//!
//! These tests cover:
//! - Client creation and base URL handling
//! - Request paths and JSON bodies for every endpoint
//! - 404 handling for optional lookups
//! - Error statuses surfacing as ApiError::Api

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use digit_pad::api::{ApiClient, ApiError, QuizMode, DEFAULT_TIMEOUT};
use digit_pad::config::{ApiConfig, Environment};
use digit_pad::tensor::{NormalizedImage, IMAGE_LEN};

fn image_with_ink(value: f32) -> NormalizedImage {
    NormalizedImage::try_from(vec![value; IMAGE_LEN]).unwrap()
}

// === Client Creation Tests ===

#[test]
fn test_new_trims_trailing_slash() {
    let client = ApiClient::new("http://localhost:8000/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
}

#[test]
fn test_empty_base_url_returns_error() {
    assert!(matches!(ApiClient::new(""), Err(ApiError::MissingBaseUrl)));
    assert!(matches!(ApiClient::new("/"), Err(ApiError::MissingBaseUrl)));
}

#[test]
fn test_from_config_uses_selected_environment() {
    let mut config = ApiConfig::default();
    config.local_url = "http://127.0.0.1:9000".to_string();
    config.deployed_url = "https://example.test".to_string();

    config.environment = Environment::Local;
    let client = ApiClient::from_config(&config).unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9000");

    config.environment = Environment::Deployed;
    let client = ApiClient::from_config(&config).unwrap();
    assert_eq!(client.base_url(), "https://example.test");
}

#[test]
fn test_default_timeout() {
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
}

// === Samples ===

#[tokio::test]
async fn test_save_sample_posts_digit_and_image() {
    let server = MockServer::start().await;
    let image = image_with_ink(0.5);

    Mock::given(method("POST"))
        .and(path("/api/samples"))
        .and(body_json(json!({
            "digit": 7,
            "imageData": vec![0.5f32; IMAGE_LEN],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "message": "Sample saved"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let saved = client.save_sample(7, &image).await.unwrap();
    assert_eq!(saved.id, 42);
    assert_eq!(saved.message, "Sample saved");
}

#[tokio::test]
async fn test_save_sample_rejects_invalid_digit_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let result = client.save_sample(10, &NormalizedImage::blank()).await;
    assert!(matches!(result, Err(ApiError::InvalidDigit(10))));
}

#[tokio::test]
async fn test_save_sample_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/samples"))
        .respond_with(ResponseTemplate::new(422).set_body_string("imageData must have 784 values"))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let err = client
        .save_sample(3, &NormalizedImage::blank())
        .await
        .unwrap_err();
    match err {
        ApiError::Api {
            action,
            status,
            message,
        } => {
            assert_eq!(action, "save sample");
            assert_eq!(status, 422);
            assert!(message.contains("784"));
        }
        other => panic!("expected ApiError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn test_data_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "total": 12,
            "perDigit": [3, 3, 3, 3, 0, 0, 0, 0, 0, 0],
            "missingDigits": [4, 5, 6, 7, 8, 9]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let status = client.data_status().await.unwrap();
    assert!(!status.valid);
    assert_eq!(status.total, 12);
    assert_eq!(status.per_digit.len(), 10);
    assert_eq!(status.missing_digits, vec![4, 5, 6, 7, 8, 9]);
}

#[tokio::test]
async fn test_reset_all_data_uses_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/data/reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "All data reset"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let message = client.reset_all_data().await.unwrap();
    assert_eq!(message.message, "All data reset");
}

#[tokio::test]
async fn test_sample_by_digit_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/digit/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "digit": 4,
            "imageData": vec![0.25f32; IMAGE_LEN],
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let sample = client.sample_by_digit(4).await.unwrap().unwrap();
    assert_eq!(sample.id, 9);
    assert_eq!(sample.digit, 4);
    assert_eq!(sample.image_data.len(), IMAGE_LEN);
}

#[tokio::test]
async fn test_sample_by_digit_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/samples/digit/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "No samples for digit 5"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    assert!(client.sample_by_digit(5).await.unwrap().is_none());
}

// === Training ===

#[tokio::test]
async fn test_start_cnn_training_sends_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/train/cnn"))
        .and(body_json(json!({ "epochs": 20, "batchSize": 16 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "started",
            "taskId": "task-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let started = client.start_cnn_training().await.unwrap();
    assert_eq!(started.status, "started");
    assert_eq!(started.task_id, "task-1");
}

#[tokio::test]
async fn test_training_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/train/cnn/status/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "progress": 100,
            "epoch": 20,
            "totalEpochs": 20,
            "accuracy": 0.97,
            "loss": 0.08
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let status = client.training_status("task-1").await.unwrap().unwrap();
    assert_eq!(status.progress, 100);
    assert_eq!(status.total_epochs, 20);
    assert!(status.is_finished());
}

#[tokio::test]
async fn test_training_status_unknown_task_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/train/cnn/status/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    assert!(client.training_status("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_models_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cnn": { "trained": true, "trainedAt": "2026-01-05T10:00:00", "metadata": { "accuracy": 0.97 } },
            "vae": { "trained": false }
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let models = client.models_status().await.unwrap();
    assert!(models.cnn.trained);
    assert_eq!(models.cnn.trained_at.as_deref(), Some("2026-01-05T10:00:00"));
    assert!(models.cnn.metadata.is_some());
    assert!(!models.vae.trained);
    assert!(models.vae.trained_at.is_none());
}

// === Game ===

#[tokio::test]
async fn test_generate_question_sends_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/question"))
        .and(body_json(json!({ "mode": "subtract" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questionId": "q-1",
            "num1": 8,
            "num2": 3,
            "num1Image": vec![0.0f32; IMAGE_LEN],
            "num2Image": vec![0.0f32; IMAGE_LEN],
            "operator": "-",
            "answer": 5,
            "is2Digit": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let question = client.generate_question(QuizMode::Subtract).await.unwrap();
    assert_eq!(question.question_id, "q-1");
    assert_eq!(question.operator, "-");
    assert_eq!(question.answer, 5);
    assert!(!question.is_two_digit);
    assert_eq!(question.num1_image.len(), IMAGE_LEN);
}

#[tokio::test]
async fn test_submit_answer_single_digit_sends_null_tens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/answer"))
        .and(body_json(json!({
            "questionId": "q-1",
            "onesImageData": vec![0.5f32; IMAGE_LEN],
            "tensImageData": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recognizedAnswer": 5,
            "correct": true,
            "confidence": 0.91,
            "correctAnswer": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let result = client
        .submit_answer("q-1", &image_with_ink(0.5), None)
        .await
        .unwrap();
    assert!(result.correct);
    assert_eq!(result.recognized_answer, 5);
}

#[tokio::test]
async fn test_submit_answer_two_digits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/answer"))
        .and(body_json(json!({
            "questionId": "q-2",
            "onesImageData": vec![0.5f32; IMAGE_LEN],
            "tensImageData": vec![0.25f32; IMAGE_LEN],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recognizedAnswer": 12,
            "correct": false,
            "confidence": 0.4,
            "correctAnswer": 13
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let tens = image_with_ink(0.25);
    let result = client
        .submit_answer("q-2", &image_with_ink(0.5), Some(&tens))
        .await
        .unwrap();
    assert!(!result.correct);
    assert_eq!(result.correct_answer, 13);
}

#[tokio::test]
async fn test_game_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/game/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                {
                    "question": "8 - 3",
                    "correctAnswer": 5,
                    "userAnswer": 5,
                    "correct": true,
                    "confidence": 0.91,
                    "createdAt": "2026-01-05T10:00:00"
                },
                {
                    "question": "7 + 6",
                    "correctAnswer": 13,
                    "userAnswer": null,
                    "correct": false
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let history = client.game_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].user_answer, Some(5));
    assert!(history[1].user_answer.is_none());
    assert!(history[1].created_at.is_none());
}

#[tokio::test]
async fn test_server_error_on_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/game/history"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database locked"))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let err = client.game_history().await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 500, .. }));
    assert!(err.to_string().contains("database locked"));
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    // Nothing listens on port 9 on a test machine.
    let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = client.data_status().await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError(_)));
}
