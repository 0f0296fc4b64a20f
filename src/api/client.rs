//! ApiClient - handles communication with the handmade-MNIST backend.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::types::{
    AnswerRequest, AnswerResult, DataStatus, HistoryEntry, HistoryResponse, Message,
    ModelsStatus, Question, QuestionRequest, QuizMode, Sample, SampleSaved, SaveSampleRequest,
    TrainRequest, TrainingStarted, TrainingStatus,
};
use crate::config::ApiConfig;
use crate::tensor::NormalizedImage;

/// Default timeout for HTTP requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of CNN training epochs.
pub const DEFAULT_EPOCHS: u32 = 20;

/// Default CNN training batch size.
pub const DEFAULT_BATCH_SIZE: u32 = 16;

/// Client for the handmade-MNIST API.
///
/// One request per call: no retries, no authentication.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `base_url` with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::MissingBaseUrl);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create a client for the environment selected in `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_timeout(
            config.base_url(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Store a labeled training sample.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidDigit` without sending anything if `digit`
    /// is not 0-9.
    pub async fn save_sample(
        &self,
        digit: u8,
        image: &NormalizedImage,
    ) -> Result<SampleSaved, ApiError> {
        validate_digit(digit)?;
        let body = SaveSampleRequest {
            digit,
            image_data: image,
        };
        let response = self
            .http_client
            .post(self.url("/api/samples"))
            .json(&body)
            .send()
            .await?;
        let saved: SampleSaved = parse(response, "save sample").await?;
        log::info!("Saved sample {} for digit {}", saved.id, digit);
        Ok(saved)
    }

    /// How many samples exist per digit and whether training may start.
    pub async fn data_status(&self) -> Result<DataStatus, ApiError> {
        let response = self
            .http_client
            .get(self.url("/api/samples/status"))
            .send()
            .await?;
        parse(response, "get data status").await
    }

    /// Delete all samples, models, and game history on the server.
    pub async fn reset_all_data(&self) -> Result<Message, ApiError> {
        let response = self
            .http_client
            .delete(self.url("/api/data/reset"))
            .send()
            .await?;
        let message: Message = parse(response, "reset data").await?;
        log::warn!("Server data reset: {}", message.message);
        Ok(message)
    }

    /// A random stored sample for `digit`, or `None` if there is none.
    pub async fn sample_by_digit(&self, digit: u8) -> Result<Option<Sample>, ApiError> {
        validate_digit(digit)?;
        let response = self
            .http_client
            .get(self.url(&format!("/api/samples/digit/{}", digit)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("No samples stored for digit {}", digit);
            return Ok(None);
        }
        parse(response, "get sample").await.map(Some)
    }

    /// Start CNN training with the default epochs and batch size.
    pub async fn start_cnn_training(&self) -> Result<TrainingStarted, ApiError> {
        self.start_cnn_training_with(DEFAULT_EPOCHS, DEFAULT_BATCH_SIZE)
            .await
    }

    /// Start CNN training with explicit hyperparameters.
    pub async fn start_cnn_training_with(
        &self,
        epochs: u32,
        batch_size: u32,
    ) -> Result<TrainingStarted, ApiError> {
        let response = self
            .http_client
            .post(self.url("/api/train/cnn"))
            .json(&TrainRequest { epochs, batch_size })
            .send()
            .await?;
        let started: TrainingStarted = parse(response, "start training").await?;
        log::info!(
            "CNN training {} ({} epochs, batch size {})",
            started.task_id,
            epochs,
            batch_size
        );
        Ok(started)
    }

    /// Status of training job `task_id`, or `None` if the server does not
    /// know it.
    pub async fn training_status(&self, task_id: &str) -> Result<Option<TrainingStatus>, ApiError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/train/cnn/status/{}", task_id)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse(response, "get training status").await.map(Some)
    }

    /// Whether the CNN and VAE models have been trained.
    pub async fn models_status(&self) -> Result<ModelsStatus, ApiError> {
        let response = self
            .http_client
            .get(self.url("/api/models/status"))
            .send()
            .await?;
        parse(response, "get models status").await
    }

    /// Ask the server for a new arithmetic question.
    pub async fn generate_question(&self, mode: QuizMode) -> Result<Question, ApiError> {
        let response = self
            .http_client
            .post(self.url("/api/game/question"))
            .json(&QuestionRequest { mode })
            .send()
            .await?;
        parse(response, "generate question").await
    }

    /// Submit a handwritten answer. `tens` is needed only for two-digit
    /// answers.
    pub async fn submit_answer(
        &self,
        question_id: &str,
        ones: &NormalizedImage,
        tens: Option<&NormalizedImage>,
    ) -> Result<AnswerResult, ApiError> {
        let body = AnswerRequest {
            question_id,
            ones_image_data: ones,
            tens_image_data: tens,
        };
        let response = self
            .http_client
            .post(self.url("/api/game/answer"))
            .json(&body)
            .send()
            .await?;
        let result: AnswerResult = parse(response, "submit answer").await?;
        log::info!(
            "Answer for {} read as {} (confidence {:.2}, correct: {})",
            question_id,
            result.recognized_answer,
            result.confidence,
            result.correct
        );
        Ok(result)
    }

    /// Recently played questions, newest first.
    pub async fn game_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let response = self
            .http_client
            .get(self.url("/api/game/history"))
            .send()
            .await?;
        let body: HistoryResponse = parse(response, "get game history").await?;
        Ok(body.history)
    }
}

fn validate_digit(digit: u8) -> Result<(), ApiError> {
    if digit > 9 {
        return Err(ApiError::InvalidDigit(digit));
    }
    Ok(())
}

/// Turn a non-success status into `ApiError::Api`, otherwise decode JSON.
async fn parse<T: DeserializeOwned>(
    response: reqwest::Response,
    action: &str,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        log::warn!("Failed to {}: {} {}", action, status, message);
        return Err(ApiError::Api {
            action: action.to_string(),
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

/// Errors from the API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API base URL not configured")]
    MissingBaseUrl,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to {action}: status {status}: {message}")]
    Api {
        action: String,
        status: u16,
        message: String,
    },

    #[error("Digit must be 0-9, got {0}")]
    InvalidDigit(u8),
}
