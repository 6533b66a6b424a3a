//! Planer CLI Application
//!
//! Command-line interface for generating learning plans.

mod args;
mod cli;
mod logging;
mod renderer;

use std::process::ExitCode;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, InputNotFound};
use log::{error, info, LevelFilter};
use planer_core::Settings;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let result = tokio::select! {
        result = run(args) => result,
        _ = tokio::signal::ctrl_c() => {
            error!("Interrupted; files written so far are kept");
            eprintln!("Interrupted");
            return ExitCode::from(130);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(not_found) = e.downcast_ref::<InputNotFound>() {
                error!("{not_found}");
                eprintln!("{not_found}");
            } else {
                error!("{e:#}");
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let Args {
        no_color,
        verbose,
        command,
    } = args;
    let cli = Cli::new(TerminalRenderer::new(!no_color));

    match command {
        Commands::Generate(generate) => {
            let settings = Settings::from_env().context("Failed to load settings")?;
            let level = if verbose {
                LevelFilter::Debug
            } else {
                settings.log_level
            };
            let log_dir = settings.log_to_file.then_some(settings.log_dir.as_path());
            if let Some(path) = logging::init(level, log_dir)? {
                info!("Logging to {}", path.display());
            }
            info!("Planer started with {settings:?}");

            cli.generate(generate, &settings).await
        }
        Commands::Templates { prompt_dir } => {
            logging::init(verbose_level(verbose), None)?;
            let dir = prompt_dir.unwrap_or_else(Settings::prompt_dir_from_env);
            cli.list_templates(&dir)
        }
        Commands::Version => cli.version(),
    }
}

fn verbose_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}
