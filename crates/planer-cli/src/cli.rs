//! Command handlers.
//!
//! Each handler turns parsed arguments into a core call and renders the
//! result as Markdown through the [`TerminalRenderer`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use planer_core::{pipeline::REQUIRED_TEMPLATES, run_workflow, Settings, TemplateStore};
use thiserror::Error;

use crate::{args::GenerateArgs, renderer::TerminalRenderer};

/// Fallback shown when the build carries no package version.
const DEVELOPMENT_VERSION: &str = "0.1.0 (development)";

/// An input file named on the command line does not exist.
#[derive(Error, Debug)]
#[error("File not found: {}", .0.display())]
pub struct InputNotFound(pub PathBuf);

pub struct Cli {
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(renderer: TerminalRenderer) -> Self {
        Self { renderer }
    }

    /// Read the inputs, run the workflow and print a summary.
    pub async fn generate(&self, args: GenerateArgs, settings: &Settings) -> Result<()> {
        info!("Starting learning plan generation...");

        let background = read_input(&args.background_file)?;
        info!("Read background from {}", args.background_file.display());
        let goal = read_input(&args.goal_file)?;
        info!("Read learning goal from {}", args.goal_file.display());

        let report = run_workflow(settings, &background, &goal, args.output_dir)
            .await
            .context("Failed to generate learning plan")?;

        info!("Learning plan generation completed");
        info!(
            "Overall plan saved to {}",
            report.output_directory().join("overall_plan.md").display()
        );
        self.renderer.render(&report.to_string())
    }

    /// List the templates available in `dir`.
    pub fn list_templates(&self, dir: &Path) -> Result<()> {
        let store = TemplateStore::load(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?;
        self.renderer.render(&TemplateListing(&store).to_string())
    }

    pub fn version(&self) -> Result<()> {
        println!("planer version: {}", version_string());
        Ok(())
    }
}

/// Read an input file and trim surrounding whitespace.
fn read_input(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(InputNotFound(path.to_path_buf()).into())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Markdown listing of a template directory, flagging required templates
/// that are absent.
struct TemplateListing<'a>(&'a TemplateStore);

impl fmt::Display for TemplateListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.0;
        writeln!(f, "# Templates in `{}`", store.dir().display())?;
        writeln!(f)?;
        for name in store.names() {
            writeln!(f, "- {name}")?;
        }

        let missing: Vec<_> = REQUIRED_TEMPLATES
            .iter()
            .filter(|name| !store.contains(name))
            .collect();
        if !missing.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Missing")?;
            writeln!(f)?;
            for name in missing {
                writeln!(f, "- {name}")?;
            }
        }
        Ok(())
    }
}

fn version_string() -> &'static str {
    match env!("CARGO_PKG_VERSION") {
        "" => DEVELOPMENT_VERSION,
        version => version,
    }
}
