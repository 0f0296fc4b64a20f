//! Request and response bodies for the handmade-MNIST API.
//!
//! Field names follow the service's camelCase JSON. Images coming back from
//! the service are kept as raw `Vec<f32>`; validate them with the renderer or
//! `NormalizedImage::try_from` before trusting them.

use serde::{Deserialize, Serialize};

use crate::tensor::NormalizedImage;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveSampleRequest<'a> {
    pub digit: u8,
    pub image_data: &'a NormalizedImage,
}

/// Acknowledgement for a stored sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SampleSaved {
    pub id: i64,
    pub message: String,
}

/// How many samples have been collected per digit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatus {
    /// True once every digit has enough samples to train on.
    pub valid: bool,
    pub total: u32,
    /// Sample count for digits 0 through 9.
    pub per_digit: Vec<u32>,
    pub missing_digits: Vec<u8>,
}

/// Plain `{ "message": ... }` reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub message: String,
}

/// A stored sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: i64,
    pub digit: u8,
    pub image_data: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrainRequest {
    pub epochs: u32,
    pub batch_size: u32,
}

/// Reply to a training request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStarted {
    pub status: String,
    pub task_id: String,
}

/// Progress of a training job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStatus {
    pub status: String,
    /// Percent complete, 0-100.
    pub progress: u32,
    pub epoch: u32,
    pub total_epochs: u32,
    pub accuracy: f64,
    pub loss: f64,
}

impl TrainingStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "failed")
    }
}

/// Whether one model has been trained.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub trained: bool,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelsStatus {
    pub cnn: ModelStatus,
    pub vae: ModelStatus,
}

/// Which operations a quiz question may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Add,
    Subtract,
    #[default]
    Mixed,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionRequest {
    pub mode: QuizMode,
}

/// An arithmetic question whose operands are shown as handwritten digits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub num1: i32,
    pub num2: i32,
    pub num1_image: Vec<f32>,
    pub num2_image: Vec<f32>,
    pub operator: String,
    pub answer: i32,
    /// The answer needs a tens digit as well as a ones digit.
    #[serde(rename = "is2Digit")]
    pub is_two_digit: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerRequest<'a> {
    pub question_id: &'a str,
    pub ones_image_data: &'a NormalizedImage,
    pub tens_image_data: Option<&'a NormalizedImage>,
}

/// How the service read and scored a handwritten answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub recognized_answer: i32,
    pub correct: bool,
    pub confidence: f64,
    pub correct_answer: i32,
}

/// One played question.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub question: String,
    pub correct_answer: i32,
    #[serde(default)]
    pub user_answer: Option<i32>,
    pub correct: bool,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}
