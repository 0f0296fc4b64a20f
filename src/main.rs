use clap::Parser;

use digit_pad::cli::{
    handle_config_action, load_config, run_api, run_draw, run_preview, Args, Command,
};

/// Load .env and set up logging.
///
/// Existing environment variables win over .env entries. The log level
/// defaults to `warn` and follows `RUST_LOG` when set.
fn init() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn run(args: Args) -> Result<(), String> {
    // `config init` must work before any config file exists.
    if let Command::Config { action } = args.command {
        return handle_config_action(args.config.as_deref(), args.env, action);
    }

    let cfg = load_config(args.config.as_deref(), args.env)?;

    match args.command {
        Command::Draw {
            strokes,
            out,
            preview,
            size,
        } => run_draw(&cfg, &strokes, out.as_deref(), preview.as_deref(), size),
        Command::Preview {
            tensor,
            out,
            display_size,
        } => run_preview(&cfg, &tensor, &out, display_size),
        Command::Api { action } => run_api(&cfg, action),
        Command::Config { .. } => Ok(()),
    }
}

fn main() {
    init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
