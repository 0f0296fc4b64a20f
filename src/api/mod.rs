//! Thin client for the handmade-MNIST API.
//!
//! The server stores labeled samples, trains the recognition models, and runs
//! the arithmetic quiz. Every image sent or received is a 784-value
//! ink-density array, the same format [`crate::tensor::NormalizedImage`]
//! holds.

mod client;
mod types;

pub use client::{
    ApiClient, ApiError, DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_TIMEOUT,
};
pub use types::{
    AnswerResult, DataStatus, HistoryEntry, Message, ModelStatus, ModelsStatus, Question,
    QuizMode, Sample, SampleSaved, TrainingStarted, TrainingStatus,
};
