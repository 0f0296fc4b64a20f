//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{ApiAction, Args, Command, ConfigAction};
pub use commands::{handle_config_action, load_config, run_api, run_draw, run_preview};
pub use enums::{ApiEnv, Mode};
