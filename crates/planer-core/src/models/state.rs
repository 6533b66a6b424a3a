//! The run-state record threaded through every pipeline stage.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{DailyPlans, Stage};

/// Requirements appended to every composite request.
const REQUEST_REQUIREMENTS: &str = "\
- Strictly follow the SMART principle (Specific/Measurable/Achievable/Relevant/Time-bound)
- Set milestone goals for every two weeks
- Every stage includes quantifiable skill-mastery indicators and project deliverables";

/// Mutable state for one pipeline run.
///
/// The inputs are fixed at construction. Every other field belongs to exactly
/// one stage and stays at its empty default until that stage has run.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    user_background: String,
    user_goal: String,
    composite_request: String,
    output_directory: PathBuf,

    /// Draft produced by `generate_initial_plan`
    pub initial_plan: String,

    /// Exactly three critique passes once `critique_plan` has run
    pub revised_plans: Vec<String>,

    /// Comparison of the three revisions
    pub comparison_report: String,

    /// Synthesized plan; usually, not always, a JSON plan record
    pub final_plan: String,

    /// One entry per bi-weekly period, in generation order
    pub daily_plans: DailyPlans,

    /// Stages that ran to completion, in order
    pub completed: Vec<Stage>,

    /// Files written so far, in first-write order
    pub artifacts: Vec<PathBuf>,
}

impl RunState {
    /// Build the initial state from raw background and goal text.
    pub fn new(
        user_background: impl Into<String>,
        user_goal: impl Into<String>,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        let user_background = user_background.into();
        let user_goal = user_goal.into();
        let composite_request =
            format!("{user_background}\n{user_goal}\n{REQUEST_REQUIREMENTS}");

        Self {
            user_background,
            user_goal,
            composite_request,
            output_directory: output_directory.into(),
            initial_plan: String::new(),
            revised_plans: Vec::new(),
            comparison_report: String::new(),
            final_plan: String::new(),
            daily_plans: DailyPlans::default(),
            completed: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn user_background(&self) -> &str {
        &self.user_background
    }

    pub fn user_goal(&self) -> &str {
        &self.user_goal
    }

    /// Background, goal and the fixed planning requirements, as one request.
    pub fn composite_request(&self) -> &str {
        &self.composite_request
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Whether `stage` has already completed in this run.
    pub fn has_completed(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    pub(crate) fn mark_completed(&mut self, stage: Stage) {
        if !self.has_completed(stage) {
            self.completed.push(stage);
        }
    }

    pub(crate) fn record_artifact(&mut self, path: PathBuf) {
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path);
        }
    }
}
