//! Data models for a plan-generation run.
//!
//! - [`RunState`]: the single mutable record a pipeline run threads through
//!   its stages
//! - [`Stage`]: the fixed, ordered list of pipeline steps
//! - [`Period`] / [`DailyPlans`]: the bi-weekly cadence and the ordered map of
//!   daily plans keyed by it
//! - [`PlanRecord`] / [`DailyScheduleRecord`]: optional structured views of
//!   model output, rendered to Markdown by [`crate::render`]

pub mod period;
pub mod records;
pub mod stage;
pub mod state;

#[cfg(test)]
mod tests;

pub use period::{DailyPlan, DailyPlans, Period, PERIOD_COUNT};
pub use records::{
    parse_record, DailyScheduleRecord, DaySchedule, Milestone, Parsed, PlanRecord, Task,
};
pub use stage::Stage;
pub use state::RunState;
