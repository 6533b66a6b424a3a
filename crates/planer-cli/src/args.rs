use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Generate personalized learning plans with large language models
///
/// Planer reads a description of your technical background and a learning
/// goal, asks a language model to draft, critique, compare and synthesize a
/// twelve-week plan, and expands every two-week period into a daily study
/// schedule. Model settings come from the environment or a `.env` file.
#[derive(Parser)]
#[command(version, about, name = "planer")]
pub struct Args {
    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the planer CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a learning plan
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// List the instruction templates that would be used
    Templates {
        /// Template directory. Defaults to PROMPT_DIR or ./prompts
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },
    /// Show the current version
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    /// File describing your technical background
    #[arg(short, long, default_value = "background.txt")]
    pub background_file: PathBuf,

    /// File describing your learning goal
    #[arg(short, long, default_value = "goal.txt")]
    pub goal_file: PathBuf,

    /// Output directory. Defaults to OUTPUT_DIR or ./plans
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
