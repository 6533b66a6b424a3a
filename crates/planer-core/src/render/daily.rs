//! Display implementation for a period's daily schedule.

use std::fmt;

use super::present;
use crate::models::{DailyScheduleRecord, DaySchedule, Task};

/// Markdown view of a [`DailyScheduleRecord`].
pub struct DailyDocument<'a>(pub &'a DailyScheduleRecord);

impl fmt::Display for DailyDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;

        writeln!(
            f,
            "# {} Daily Study Plan",
            present(&record.week_range).unwrap_or("Unknown")
        )?;
        writeln!(f)?;
        writeln!(f, "**Total hours**: {} hours", record.total_hours.unwrap_or(0.0))?;
        writeln!(f)?;

        for day in &record.daily_schedule {
            fmt_day(f, day)?;
        }

        if let Some(summary) = present(&record.week_summary) {
            writeln!(f, "## Week Summary")?;
            writeln!(f, "{summary}")?;
        }

        Ok(())
    }
}

fn fmt_day(f: &mut fmt::Formatter<'_>, day: &DaySchedule) -> fmt::Result {
    let name = present(&day.day).unwrap_or("Unknown");
    match present(&day.date) {
        Some(date) => writeln!(f, "## {name} {date}")?,
        None => writeln!(f, "## {name}")?,
    }
    writeln!(f, "**Day total**: {} hours", day.total_hours.unwrap_or(0.0))?;
    writeln!(f)?;

    if let Some(rest) = present(&day.rest_time) {
        writeln!(f, "**Rest**: {rest}")?;
        writeln!(f)?;
    }

    if let Some(tips) = present(&day.learning_tips) {
        writeln!(f, "**Tips**: {tips}")?;
        writeln!(f)?;
    }

    if !day.tasks.is_empty() {
        writeln!(f, "### Tasks")?;
        for task in &day.tasks {
            fmt_task(f, task)?;
        }
    }

    Ok(())
}

fn fmt_task(f: &mut fmt::Formatter<'_>, task: &Task) -> fmt::Result {
    writeln!(
        f,
        "#### {} ({} hours)",
        present(&task.title).unwrap_or("Untitled task"),
        task.duration_hours.unwrap_or(0.0)
    )?;
    if let Some(description) = present(&task.description) {
        writeln!(f, "**Description**: {description}")?;
    }
    if !task.skills.is_empty() {
        writeln!(f, "**Skills**: {}", task.skills.join(", "))?;
    }
    if let Some(outcome) = present(&task.expected_outcome) {
        writeln!(f, "**Expected outcome**: {outcome}")?;
    }
    writeln!(f)
}
