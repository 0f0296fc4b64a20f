//! CLI enum types for API environment and quiz mode options.

use clap::ValueEnum;

use crate::api::QuizMode;
use crate::config::Environment;

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ApiEnv {
    #[default]
    Local,
    Deployed,
}

impl From<ApiEnv> for Environment {
    fn from(e: ApiEnv) -> Self {
        match e {
            ApiEnv::Local => Environment::Local,
            ApiEnv::Deployed => Environment::Deployed,
        }
    }
}

/// Quiz question operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    Add,
    Subtract,
    #[default]
    Mixed,
}

impl From<Mode> for QuizMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Add => QuizMode::Add,
            Mode::Subtract => QuizMode::Subtract,
            Mode::Mixed => QuizMode::Mixed,
        }
    }
}
