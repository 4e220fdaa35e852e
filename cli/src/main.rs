//! riser CLI - Entry Point
//!
//! Deploys and operates apps on the riser platform.

use std::env;
use std::process::ExitCode;

use colored::Colorize;
use riser::commands::{run, CliArgs};
use riser::logs::{init_logging, LogLevel, LogOptions};
use riser::storage::layout::StorageLayout;
use riser::utils::version_info;

use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse(env::args().skip(1));

    // Print version and exit
    if args.has_flag("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("{}", e),
        }
        return ExitCode::SUCCESS;
    }

    let layout = match StorageLayout::from_env() {
        Ok(layout) => layout,
        Err(e) => return fail(&e.to_string()),
    };
    let settings = match layout.load_settings().await {
        Ok(settings) => settings,
        Err(e) => return fail(&format!("Unable to read settings file: {}", e)),
    };

    // Initialize logging
    let log_level = match args.flag("log-level").map(str::parse::<LogLevel>) {
        Some(Ok(level)) => level,
        Some(Err(e)) => return fail(&e.to_string()),
        None => settings.log_level.clone(),
    };
    let log_options = LogOptions {
        log_level,
        json_format: args.has_flag("log-json"),
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    debug!("Using configuration directory {}", layout.base_dir.display());
    match run(args, layout, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&render_error(&e)),
    }
}

/// The error with its causes, skipping causes already part of a message
fn render_error(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

fn fail(message: &str) -> ExitCode {
    eprintln!("{}", message.bright_red());
    ExitCode::FAILURE
}
