//! Markdown rendering of structured plan records.
//!
//! Rendering follows the display-wrapper pattern: [`PlanDocument`] and
//! [`DailyDocument`] borrow a record and implement [`std::fmt::Display`];
//! [`render_plan`] and [`render_daily`] are the string-returning shorthands.
//!
//! Both renderers are pure. Absent fields produce no section at all, the order
//! of sections is fixed, and list items keep their input order.
//!
//! ```rust
//! use planer_core::models::PlanRecord;
//! use planer_core::render::render_plan;
//!
//! let record = PlanRecord {
//!     title: Some("ML Infra in 12 Weeks".to_string()),
//!     success_criteria: vec!["Ship a feature store".to_string()],
//!     ..Default::default()
//! };
//! let doc = render_plan(&record);
//! assert!(doc.starts_with("# ML Infra in 12 Weeks"));
//! assert!(doc.contains("- Ship a feature store"));
//! ```

pub mod daily;
pub mod plan;

pub use daily::DailyDocument;
pub use plan::PlanDocument;

use crate::models::{DailyScheduleRecord, PlanRecord};

/// Render a plan record as a Markdown document.
pub fn render_plan(record: &PlanRecord) -> String {
    PlanDocument(record).to_string()
}

/// Render a daily-schedule record as a Markdown document.
pub fn render_daily(record: &DailyScheduleRecord) -> String {
    DailyDocument(record).to_string()
}

/// Non-empty trimmed text, or `None`.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
