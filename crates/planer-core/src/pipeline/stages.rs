//! Stage operations.
//!
//! Each stage reads the fields earlier stages produced, issues its generation
//! calls in order, and writes only the fields it owns. Stages are public so a
//! caller can drive them one at a time; [`Pipeline::run`] is the usual entry.

use std::collections::HashMap;

use log::{debug, info};

use super::{
    artifacts::{ensure_dir, write_derived, write_text, ArtifactOutcome, OutputLayout},
    Pipeline, REQUIRED_TEMPLATES, REVISION_COUNT,
};
use crate::{
    error::{PipelineError, Result, TemplateError},
    generation::preview,
    models::{DailyScheduleRecord, Period, PlanRecord, RunState, Stage},
    render::{render_daily, render_plan},
};

/// Characters of generated text echoed at debug level.
const LOG_PREVIEW_CHARS: usize = 200;

impl Pipeline {
    /// Confirm the pipeline can serve a run: every required template is
    /// loaded.
    ///
    /// The generator and template store are constructed by
    /// [`PipelineBuilder`](super::PipelineBuilder); this stage only checks the
    /// result.
    pub fn init_clients(&self) -> Result<()> {
        debug!("Using model {}", self.generator.model_name());
        for name in REQUIRED_TEMPLATES {
            if !self.templates.contains(name) {
                return Err(TemplateError::NotFound {
                    name: name.to_string(),
                }
                .into());
            }
        }
        debug!("Templates available: {}", self.templates.names().join(", "));
        Ok(())
    }

    /// Draft the initial plan from background and goal.
    pub async fn generate_initial_plan(&self, state: &mut RunState) -> Result<()> {
        debug!("Getting initial_plan prompt...");
        let vars = HashMap::from([
            ("user_background", state.user_background()),
            ("user_goal", state.user_goal()),
        ]);
        let instruction = self.templates.render("initial_plan", &vars)?;

        debug!("Calling model to generate initial plan...");
        let reply = self.generator.generate(&instruction).await?;
        debug!("Initial plan: {}", preview(&reply, LOG_PREVIEW_CHARS));

        state.initial_plan = reply;
        info!("Initial plan generated successfully");
        Ok(())
    }

    /// Critique the initial plan three times, independently.
    ///
    /// Every pass sees the same inputs. The revisions replace any earlier ones.
    pub async fn critique_plan(&self, state: &mut RunState) -> Result<()> {
        require_input(
            state,
            Stage::CritiquePlan,
            "initial_plan",
            Stage::GenerateInitialPlan,
            !state.initial_plan.is_empty(),
        )?;

        let vars = HashMap::from([
            ("original_question", state.composite_request()),
            ("model_answer", state.initial_plan.as_str()),
        ]);
        let instruction = self.templates.render("critical_think", &vars)?;

        let mut revisions = Vec::with_capacity(REVISION_COUNT);
        for pass in 1..=REVISION_COUNT {
            info!("Generating revised plan {pass}/{REVISION_COUNT}...");
            let reply = self.generator.generate(&instruction).await?;
            debug!("Revised plan {pass}: {}", preview(&reply, LOG_PREVIEW_CHARS));
            revisions.push(reply);
        }

        state.revised_plans = revisions;
        info!("Generated {} revised plans", state.revised_plans.len());
        Ok(())
    }

    /// Compare the three revisions.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::RevisionCount` unless exactly three revisions
    /// exist.
    pub async fn compare_plans(&self, state: &mut RunState) -> Result<()> {
        let [a, b, c] = revisions(state, Stage::ComparePlans)?;

        debug!("Getting compare_plans prompt...");
        let vars = HashMap::from([
            ("original_question", state.composite_request()),
            ("answerA", a),
            ("answerB", b),
            ("answerC", c),
        ]);
        let instruction = self.templates.render("compare_plans", &vars)?;

        debug!("Calling model to compare plans...");
        let reply = self.generator.generate(&instruction).await?;
        debug!("Comparison: {}", preview(&reply, LOG_PREVIEW_CHARS));

        state.comparison_report = reply;
        info!("Plans compared successfully");
        Ok(())
    }

    /// Synthesize the final plan and persist it.
    ///
    /// `overall_plan.md` is written as soon as the reply arrives. The
    /// structured and rendered siblings follow only when the reply parses as a
    /// plan record; the returned outcome says which happened.
    pub async fn generate_final_plan(&self, state: &mut RunState) -> Result<ArtifactOutcome> {
        let [a, b, c] = revisions(state, Stage::GenerateFinalPlan)?;
        require_input(
            state,
            Stage::GenerateFinalPlan,
            "comparison_report",
            Stage::ComparePlans,
            !state.comparison_report.is_empty(),
        )?;

        debug!("Getting final_plan prompt...");
        let vars = HashMap::from([
            ("original_question", state.composite_request()),
            ("planA", a),
            ("planB", b),
            ("planC", c),
            ("comparison_result", state.comparison_report.as_str()),
        ]);
        let instruction = self.templates.render("final_plan", &vars)?;

        debug!("Calling model to generate final plan...");
        let reply = self.generator.generate(&instruction).await?;
        state.final_plan = reply;
        info!("Final plan generated successfully");

        let layout = OutputLayout::new(state.output_directory());
        ensure_dir(layout.root())?;
        write_text(&layout.overall_plan(), &state.final_plan)?;
        state.record_artifact(layout.overall_plan());

        let outcome = write_derived(
            "final plan",
            &state.final_plan,
            &layout.overall_plan_json(),
            &layout.overall_plan_markdown(),
            PlanRecord::parse,
            render_plan,
        );
        record_outcome(state, &outcome);
        Ok(outcome)
    }

    /// Expand the final plan into a daily schedule for each bi-weekly period.
    ///
    /// Each period's reply is stored in the state, then written, before the
    /// next period is requested. Earlier daily plans are discarded first.
    pub async fn generate_daily_plans(
        &self,
        state: &mut RunState,
    ) -> Result<Vec<ArtifactOutcome>> {
        require_input(
            state,
            Stage::GenerateDailyPlans,
            "final_plan",
            Stage::GenerateFinalPlan,
            !state.final_plan.is_empty(),
        )?;

        let layout = OutputLayout::new(state.output_directory());
        ensure_dir(&layout.daily_dir())?;

        state.daily_plans.clear();
        let periods: Vec<Period> = Period::schedule().collect();
        info!("Will generate daily plans for {} bi-weekly periods", periods.len());

        let mut outcomes = Vec::with_capacity(periods.len());
        for (i, period) in periods.iter().enumerate() {
            let label = period.label();
            info!(
                "Generating daily plan for {label} ({}/{})...",
                i + 1,
                periods.len()
            );

            let vars = HashMap::from([
                ("user_background", state.user_background()),
                ("biweekly_plan", state.final_plan.as_str()),
                ("week_range", label.as_str()),
            ]);
            let instruction = self.templates.render("daily_plan", &vars)?;
            let reply = self.generator.generate(&instruction).await?;
            debug!("Daily plan for {label}: {}", preview(&reply, LOG_PREVIEW_CHARS));

            state.daily_plans.insert(*period, reply.clone());

            let raw_path = layout.daily_plan(period);
            write_text(&raw_path, &reply)?;
            state.record_artifact(raw_path);

            let outcome = write_derived(
                &format!("daily plan for {label}"),
                &reply,
                &layout.daily_plan_json(period),
                &layout.daily_plan_markdown(period),
                DailyScheduleRecord::parse,
                render_daily,
            );
            record_outcome(state, &outcome);
            outcomes.push(outcome);
        }

        info!("Generated {} daily plans", state.daily_plans.len());
        Ok(outcomes)
    }

    /// Re-write the final plan and every daily plan.
    ///
    /// Idempotent: running it twice leaves the same files with the same
    /// content.
    pub fn save_plans(&self, state: &mut RunState) -> Result<()> {
        let layout = OutputLayout::new(state.output_directory());
        debug!("Output directory: {}", layout.root().display());
        layout.ensure_dirs()?;

        write_text(&layout.overall_plan(), &state.final_plan)?;
        state.record_artifact(layout.overall_plan());

        info!("Saving {} daily plans...", state.daily_plans.len());
        let mut written = Vec::with_capacity(state.daily_plans.len());
        for plan in &state.daily_plans {
            let path = layout.daily_plan(&plan.period);
            write_text(&path, &plan.text)?;
            written.push(path);
        }
        for path in written {
            state.record_artifact(path);
        }
        Ok(())
    }
}

/// Borrow the three revisions, or fail with a count violation.
fn revisions(state: &RunState, stage: Stage) -> Result<[&str; REVISION_COUNT]> {
    match state.revised_plans.as_slice() {
        [a, b, c] => Ok([a.as_str(), b.as_str(), c.as_str()]),
        other => Err(PipelineError::RevisionCount {
            stage: stage.as_str(),
            expected: REVISION_COUNT,
            found: other.len(),
        }
        .into()),
    }
}

/// A field is available once it is non-empty or its owning stage has run.
fn require_input(
    state: &RunState,
    stage: Stage,
    field: &'static str,
    owner: Stage,
    present: bool,
) -> Result<()> {
    if present || state.has_completed(owner) {
        Ok(())
    } else {
        Err(PipelineError::MissingInput {
            stage: stage.as_str(),
            field,
        }
        .into())
    }
}

fn record_outcome(state: &mut RunState, outcome: &ArtifactOutcome) {
    if let ArtifactOutcome::Written { json, markdown } = outcome {
        state.record_artifact(json.clone());
        state.record_artifact(markdown.clone());
    }
}
