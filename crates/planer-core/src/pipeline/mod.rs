//! The six-stage plan pipeline.
//!
//! A [`Pipeline`] owns the template store and the generator. It drives one
//! [`RunState`] through the fixed stage sequence:
//!
//! ```text
//! init_clients ─▶ generate_initial_plan ─▶ critique_plan (x3) ─▶ compare_plans
//!      ─▶ generate_final_plan ─▶ generate_daily_plans (x6) ─▶ save_plans
//! ```
//!
//! Stages run strictly one after another and every generation call is awaited
//! before the next is issued. The first failing stage aborts the run; the state
//! keeps whatever the completed stages produced, so callers can inspect it.
//!
//! ## Submodules
//!
//! - [`builder`]: constructs a [`Pipeline`] from settings or injected parts
//! - [`stages`]: the individual stage operations
//! - [`artifacts`]: output layout and file writes
//!
//! ```rust,no_run
//! use planer_core::{PipelineBuilder, RunState, Settings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let pipeline = PipelineBuilder::new().with_settings(settings).build()?;
//!
//! let mut state = RunState::new("Backend developer", "Become an ML engineer", "plans");
//! pipeline.run(&mut state).await?;
//! println!("{}", state.final_plan);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod builder;
pub mod stages;


use log::{error, info};

pub use artifacts::{ArtifactOutcome, OutputLayout};
pub use builder::PipelineBuilder;

use crate::{
    error::Result,
    generation::Generator,
    models::{RunState, Stage},
    templates::TemplateStore,
};

/// Template names every pipeline needs.
pub const REQUIRED_TEMPLATES: [&str; 5] = [
    "initial_plan",
    "critical_think",
    "compare_plans",
    "final_plan",
    "daily_plan",
];

/// Number of independent critique passes.
pub const REVISION_COUNT: usize = 3;

/// Orchestrates the stages of one planning run.
pub struct Pipeline {
    pub(crate) templates: TemplateStore,
    pub(crate) generator: Box<dyn Generator>,
}

impl Pipeline {
    pub(crate) fn new(templates: TemplateStore, generator: Box<dyn Generator>) -> Self {
        Self {
            templates,
            generator,
        }
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    /// Run every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first stage error. Stages after the failing one do not run.
    pub async fn run(&self, state: &mut RunState) -> Result<()> {
        info!("=== Starting workflow execution ===");
        for stage in Stage::ALL {
            self.run_stage(stage, state).await?;
        }
        info!("=== Workflow execution completed successfully ===");
        Ok(())
    }

    /// Run a single stage and record it as completed on success.
    pub async fn run_stage(&self, stage: Stage, state: &mut RunState) -> Result<()> {
        info!("=== Entering {stage} node ===");

        let result = match stage {
            Stage::InitClients => self.init_clients(),
            Stage::GenerateInitialPlan => self.generate_initial_plan(state).await,
            Stage::CritiquePlan => self.critique_plan(state).await,
            Stage::ComparePlans => self.compare_plans(state).await,
            Stage::GenerateFinalPlan => self.generate_final_plan(state).await.map(|_| ()),
            Stage::GenerateDailyPlans => self.generate_daily_plans(state).await.map(|_| ()),
            Stage::SavePlans => self.save_plans(state),
        };

        match result {
            Ok(()) => {
                state.mark_completed(stage);
                info!("=== Exiting {stage} node ===");
                Ok(())
            }
            Err(e) => {
                error!("Error in {stage} node: {e}");
                Err(e)
            }
        }
    }
}
