//! Entry points that run one complete planning workflow.

use std::fmt;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::info;

use crate::{
    config::Settings,
    error::Result,
    models::RunState,
    pipeline::{OutputLayout, Pipeline, PipelineBuilder},
};

/// Build a pipeline from `settings` and run it to completion.
///
/// `output_dir` overrides the configured output directory.
///
/// # Errors
///
/// Returns the first initialization or stage failure. Nothing is retried.
pub async fn run_workflow(
    settings: &Settings,
    background: &str,
    goal: &str,
    output_dir: Option<PathBuf>,
) -> Result<RunReport> {
    info!(
        "Running plan workflow with {} / {}",
        settings.platform, settings.model_name
    );
    let pipeline = PipelineBuilder::new()
        .with_settings(settings.clone())
        .build()?;
    let output_dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());
    execute(&pipeline, background, goal, output_dir).await
}

/// Run an already built pipeline on fresh inputs.
pub async fn execute(
    pipeline: &Pipeline,
    background: &str,
    goal: &str,
    output_dir: impl Into<PathBuf>,
) -> Result<RunReport> {
    let started_at = Timestamp::now();
    let mut state = RunState::new(background, goal, output_dir);
    pipeline.run(&mut state).await?;

    Ok(RunReport {
        model: pipeline.generator().model_name().to_string(),
        started_at,
        finished_at: Timestamp::now(),
        state,
    })
}

/// Outcome of a successful run: the final state plus what it produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub model: String,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub state: RunState,
}

impl RunReport {
    pub fn output_directory(&self) -> &Path {
        self.state.output_directory()
    }

    /// Every file written during the run, in write order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.state.artifacts
    }

    /// Structured `.json` artifacts among [`RunReport::artifacts`].
    pub fn structured_artifacts(&self) -> impl Iterator<Item = &PathBuf> {
        self.state
            .artifacts
            .iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.finished_at.duration_since(self.started_at);
        let out = self.output_directory();
        let layout = OutputLayout::new(out);

        writeln!(f, "# Learning plan generated")?;
        writeln!(f)?;
        writeln!(f, "**Model**: {}", self.model)?;
        writeln!(f, "**Output directory**: `{}`", out.display())?;
        writeln!(f, "**Elapsed**: {:.1}s", elapsed.as_secs_f64())?;
        writeln!(f)?;

        writeln!(f, "## Overall plan")?;
        writeln!(f)?;
        writeln!(f, "- `{}`", layout.overall_plan().display())?;
        writeln!(f)?;

        writeln!(f, "## Daily plans")?;
        writeln!(f)?;
        writeln!(
            f,
            "{} periods in `{}`",
            self.state.daily_plans.len(),
            layout.daily_dir().display()
        )?;
        for plan in &self.state.daily_plans {
            writeln!(
                f,
                "- {}: `{}`",
                plan.period.label(),
                layout.daily_plan(&plan.period).display()
            )?;
        }

        let structured: Vec<_> = self.structured_artifacts().collect();
        if !structured.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Structured artifacts")?;
            writeln!(f)?;
            for path in structured {
                writeln!(f, "- `{}`", path.display())?;
            }
        }

        Ok(())
    }
}
