//! Display implementation for the overall plan.

use std::fmt;

use super::present;
use crate::models::{Milestone, PlanRecord};

/// Title used when the record has none.
const DEFAULT_TITLE: &str = "Learning Plan";

/// Markdown view of a [`PlanRecord`].
pub struct PlanDocument<'a>(pub &'a PlanRecord);

impl fmt::Display for PlanDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;

        writeln!(f, "# {}", present(&plan.title).unwrap_or(DEFAULT_TITLE))?;
        writeln!(f)?;

        if let Some(overview) = present(&plan.overview) {
            writeln!(f, "## Overview")?;
            writeln!(f, "{overview}")?;
            writeln!(f)?;
        }

        if let Some(duration) = present(&plan.duration) {
            writeln!(f, "**Duration**: {duration}")?;
            writeln!(f)?;
        }

        if let Some(goal) = present(&plan.final_goal) {
            writeln!(f, "## Final Goal")?;
            writeln!(f, "{goal}")?;
            writeln!(f)?;
        }

        if !plan.success_criteria.is_empty() {
            writeln!(f, "## Success Criteria")?;
            bullets(f, &plan.success_criteria)?;
            writeln!(f)?;
        }

        if let Some(risks) = present(&plan.risk_notes) {
            writeln!(f, "## Risk Notes")?;
            writeln!(f, "{risks}")?;
            writeln!(f)?;
        }

        if !plan.milestones.is_empty() {
            writeln!(f, "## Bi-weekly Milestones")?;
            for milestone in &plan.milestones {
                fmt_milestone(f, milestone)?;
            }
        }

        Ok(())
    }
}

fn fmt_milestone(f: &mut fmt::Formatter<'_>, milestone: &Milestone) -> fmt::Result {
    writeln!(
        f,
        "### {}",
        present(&milestone.week_range).unwrap_or("Unknown")
    )?;

    if let Some(goal) = present(&milestone.goal) {
        writeln!(f, "**Goal**: {goal}")?;
        writeln!(f)?;
    }

    for (heading, items) in [
        ("Skills", &milestone.skills),
        ("Projects", &milestone.projects),
        ("Resources", &milestone.resources),
    ] {
        if !items.is_empty() {
            writeln!(f, "**{heading}**:")?;
            bullets(f, items)?;
            writeln!(f)?;
        }
    }

    Ok(())
}

fn bullets(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for item in items {
        writeln!(f, "- {item}")?;
    }
    Ok(())
}
