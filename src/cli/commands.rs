//! Subcommand handlers for draw, preview, api and config actions.
//!
//! Handlers return `Err(String)` with a user-facing message; `main` prints it
//! and exits with status 1.

use std::path::{Path, PathBuf};

use super::args::{ApiAction, ConfigAction};
use super::enums::ApiEnv;
use crate::api::{ApiClient, ApiError};
use crate::canvas::{MemoryHost, SurfaceHost};
use crate::config::{self, Config};
use crate::renderer::render_image;
use crate::surface::{DrawingSurface, InputEvent};
use crate::tensor::NormalizedImage;

const DRAW_SURFACE_ID: &str = "pad";
const PREVIEW_ID: &str = "preview";

/// Load the config file, then apply `DIGIT_PAD_ENV` and the `--env` flag.
/// CLI args > environment > config file > built-in defaults.
pub fn load_config(path: Option<&Path>, env: Option<ApiEnv>) -> Result<Config, String> {
    let mut cfg = Config::load(path).map_err(|e| e.to_string())?;
    cfg.apply_env().map_err(|e| e.to_string())?;
    if let Some(env) = env {
        cfg.api.environment = env.into();
    }
    Ok(cfg)
}

/// Replay input events on a headless surface and snapshot the result.
pub fn run_draw(
    cfg: &Config,
    strokes: &Path,
    out: Option<&Path>,
    preview: Option<&Path>,
    size: Option<u32>,
) -> Result<(), String> {
    let content = std::fs::read_to_string(strokes)
        .map_err(|e| format!("Failed to read '{}': {}", strokes.display(), e))?;
    let events: Vec<InputEvent> = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse input events in '{}': {}", strokes.display(), e))?;

    let mut options = cfg.surface.options();
    if let Some(size) = size {
        options = options.with_size(size);
    }

    let mut host = MemoryHost::new();
    host.add_canvas(DRAW_SURFACE_ID, 1, 1)
        .map_err(|e| e.to_string())?;
    let mut surface = DrawingSurface::create(&mut host, DRAW_SURFACE_ID, options, None)
        .map_err(|e| e.to_string())?;

    for event in events {
        surface.handle(event);
    }
    let image = surface.snapshot();
    log::info!("Snapshot ink total: {:.2}", image.ink());

    let json = serde_json::to_string(&image).map_err(|e| e.to_string())?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            println!("Tensor written to {}", path.display());
        }
        None => println!("{}", json),
    }

    if let Some(path) = preview {
        save_preview(Some(image.as_slice()), cfg.preview.display_size, path)?;
        println!("Preview written to {}", path.display());
    }

    Ok(())
}

/// Render a tensor file to PNG.
pub fn run_preview(
    cfg: &Config,
    tensor: &Path,
    out: &Path,
    display_size: Option<u32>,
) -> Result<(), String> {
    let content = std::fs::read_to_string(tensor)
        .map_err(|e| format!("Failed to read '{}': {}", tensor.display(), e))?;
    // Kept raw so the renderer does the validation and reports what is wrong.
    let values: Vec<f32> = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse '{}': {}", tensor.display(), e))?;

    let size = display_size.unwrap_or(cfg.preview.display_size);
    save_preview(Some(values.as_slice()), size, out)?;
    println!("Preview written to {}", out.display());
    Ok(())
}

fn save_preview(image: Option<&[f32]>, display_size: u32, path: &Path) -> Result<(), String> {
    let mut host = MemoryHost::new();
    host.add_canvas(PREVIEW_ID, 1, 1).map_err(|e| e.to_string())?;
    if !render_image(&mut host, PREVIEW_ID, image, display_size) {
        return Err("Image could not be rendered (see log for details)".to_string());
    }
    host.canvas_mut(PREVIEW_ID)
        .map_err(|e| e.to_string())?
        .save_png(path)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

fn read_tensor(path: &Path) -> Result<NormalizedImage, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Invalid tensor in '{}': {}", path.display(), e))
}

/// Run one API action against the configured backend.
pub fn run_api(cfg: &Config, action: ApiAction) -> Result<(), String> {
    let client = ApiClient::from_config(&cfg.api).map_err(|e| e.to_string())?;
    log::debug!("Using API at {}", client.base_url());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    rt.block_on(async { dispatch(&client, cfg, action).await })
        .map_err(|e| match e {
            ActionError::Api(ApiError::HttpError(ref inner)) if inner.is_connect() => format!(
                "Could not reach the API at {}.\n\n\
                Start the backend locally, or use --env deployed.",
                client.base_url()
            ),
            ActionError::Api(other) => other.to_string(),
            ActionError::Input(msg) => msg,
        })
}

/// Failure of a single API action: either the request or the local input.
enum ActionError {
    Api(ApiError),
    Input(String),
}

impl From<ApiError> for ActionError {
    fn from(e: ApiError) -> Self {
        ActionError::Api(e)
    }
}

impl From<String> for ActionError {
    fn from(msg: String) -> Self {
        ActionError::Input(msg)
    }
}

async fn dispatch(client: &ApiClient, cfg: &Config, action: ApiAction) -> Result<(), ActionError> {
    match action {
        ApiAction::Status => {
            let status = client.data_status().await?;
            println!("Samples: {} total", status.total);
            for (digit, count) in status.per_digit.iter().enumerate() {
                println!("  {}: {}", digit, count);
            }
            if status.valid {
                println!("Ready to train.");
            } else {
                println!("Missing digits: {:?}", status.missing_digits);
            }
        }
        ApiAction::Save { digit, tensor } => {
            let image = read_tensor(&tensor)?;
            let saved = client.save_sample(digit, &image).await?;
            println!("{} (id {})", saved.message, saved.id);
        }
        ApiAction::Sample { digit, preview } => match client.sample_by_digit(digit).await? {
            Some(sample) => {
                println!("Sample {} for digit {}", sample.id, sample.digit);
                if let Some(path) = preview {
                    print_preview_result(
                        save_preview(Some(sample.image_data.as_slice()), cfg.preview.display_size, &path),
                        &path,
                    );
                }
            }
            None => println!("No samples stored for digit {}.", digit),
        },
        ApiAction::Reset { yes } => {
            if !yes {
                println!("This deletes all samples, models and game history.");
                println!("Re-run with --yes to confirm.");
                return Ok(());
            }
            let message = client.reset_all_data().await?;
            println!("{}", message.message);
        }
        ApiAction::Train { epochs, batch_size } => {
            let started = client.start_cnn_training_with(epochs, batch_size).await?;
            println!("Training {}: {}", started.status, started.task_id);
            println!("Check progress with: digit-pad api train-status {}", started.task_id);
        }
        ApiAction::TrainStatus { task_id } => match client.training_status(&task_id).await? {
            Some(s) => println!(
                "{}: {}% (epoch {}/{}), accuracy {:.3}, loss {:.4}",
                s.status, s.progress, s.epoch, s.total_epochs, s.accuracy, s.loss
            ),
            None => println!("Unknown training task '{}'.", task_id),
        },
        ApiAction::Models => {
            let models = client.models_status().await?;
            for (name, status) in [("cnn", &models.cnn), ("vae", &models.vae)] {
                match (status.trained, &status.trained_at) {
                    (true, Some(at)) => println!("{}: trained at {}", name, at),
                    (true, None) => println!("{}: trained", name),
                    (false, _) => println!("{}: not trained", name),
                }
            }
        }
        ApiAction::Question { mode, preview_dir } => {
            let q = client.generate_question(mode.into()).await?;
            println!("[{}] {} {} {} = ?", q.question_id, q.num1, q.operator, q.num2);
            if q.is_two_digit {
                println!("The answer has two digits.");
            }
            if let Some(dir) = preview_dir {
                // One broken operand image must not stop the other from rendering.
                for (name, values) in [("num1", &q.num1_image), ("num2", &q.num2_image)] {
                    let path: PathBuf = dir.join(format!("{}-{}.png", q.question_id, name));
                    print_preview_result(
                        save_preview(Some(values.as_slice()), cfg.preview.display_size, &path),
                        &path,
                    );
                }
            }
        }
        ApiAction::Answer {
            question_id,
            ones,
            tens,
        } => {
            let ones = read_tensor(&ones)?;
            let tens = tens.as_deref().map(read_tensor).transpose()?;
            let result = client
                .submit_answer(&question_id, &ones, tens.as_ref())
                .await?;
            println!(
                "Read as {} (confidence {:.0}%): {}",
                result.recognized_answer,
                result.confidence * 100.0,
                if result.correct {
                    "correct!".to_string()
                } else {
                    format!("wrong, the answer is {}", result.correct_answer)
                }
            );
        }
        ApiAction::History => {
            let history = client.game_history().await?;
            if history.is_empty() {
                println!("No games played yet.");
            }
            for entry in history {
                let answer = entry
                    .user_answer
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {} -> {} ({})",
                    entry.created_at.as_deref().unwrap_or(""),
                    entry.question,
                    answer,
                    if entry.correct { "ok" } else { "miss" }
                );
            }
        }
    }
    Ok(())
}

fn print_preview_result(result: Result<(), String>, path: &Path) {
    match result {
        Ok(()) => println!("Preview written to {}", path.display()),
        Err(e) => eprintln!("Warning: preview {} skipped: {}", path.display(), e),
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    path: Option<&Path>,
    env: Option<ApiEnv>,
    action: ConfigAction,
) -> Result<(), String> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(config::default_path);
    match action {
        ConfigAction::Show => {
            let cfg = load_config(path, env)?;
            println!("Current configuration:");
            println!("  API environment: {:?}", cfg.api.environment);
            println!("  API URL: {}", cfg.api.base_url());
            println!("  Surface size: {}px", cfg.surface.size);
            println!("  Stroke-end debounce: {}ms", cfg.surface.debounce_ms);
            println!("  Preview size: {}px", cfg.preview.display_size);
            println!();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            Config::default()
                .write_new(&config_path)
                .map_err(|e| format!("{}\nUse 'digit-pad config show' to view current settings.", e))?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}
