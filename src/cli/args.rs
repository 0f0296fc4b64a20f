//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{ApiEnv, Mode};

/// Draw digits headlessly, preview tensors, and talk to the handmade-MNIST API
#[derive(Parser, Debug)]
#[command(name = "digit-pad")]
#[command(version, about = "Freehand digit capture and normalization", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// API environment (overrides config file and DIGIT_PAD_ENV)
    #[arg(long, global = true)]
    pub env: Option<ApiEnv>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay recorded input events and snapshot the drawing as a 28x28 tensor
    Draw {
        /// JSON file with an array of input events
        #[arg(long, short)]
        strokes: PathBuf,

        /// Write the tensor JSON here instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Also render the tensor to this PNG file
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Surface size in pixels (default from config, 280)
        #[arg(long)]
        size: Option<u32>,
    },
    /// Render a tensor JSON file to PNG
    Preview {
        /// JSON file with 784 values
        tensor: PathBuf,

        /// Output PNG path
        #[arg(long, short)]
        out: PathBuf,

        /// Output size in pixels (default from config, 56)
        #[arg(long)]
        display_size: Option<u32>,
    },
    /// Remote API operations
    Api {
        #[command(subcommand)]
        action: ApiAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ApiAction {
    /// Show how many samples have been collected per digit
    Status,
    /// Store a labeled sample
    Save {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=9))]
        digit: u8,
        /// Tensor JSON file
        tensor: PathBuf,
    },
    /// Fetch a random stored sample for a digit
    Sample {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=9))]
        digit: u8,
        /// Render the sample to this PNG file
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Delete all samples, models and game history on the server
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Start CNN training
    Train {
        #[arg(long, default_value_t = crate::api::DEFAULT_EPOCHS)]
        epochs: u32,
        #[arg(long, default_value_t = crate::api::DEFAULT_BATCH_SIZE)]
        batch_size: u32,
    },
    /// Show the status of a training job
    TrainStatus { task_id: String },
    /// Show which models are trained
    Models,
    /// Generate a quiz question
    Question {
        #[arg(long, default_value = "mixed")]
        mode: Mode,
        /// Render the operand images into this directory
        #[arg(long)]
        preview_dir: Option<PathBuf>,
    },
    /// Submit a handwritten answer
    Answer {
        question_id: String,
        /// Tensor JSON for the ones digit
        ones: PathBuf,
        /// Tensor JSON for the tens digit
        #[arg(long)]
        tens: Option<PathBuf>,
    },
    /// Show recent quiz results
    History,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
