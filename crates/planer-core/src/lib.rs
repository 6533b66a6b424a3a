//! Core library for the planer learning-plan generator.
//!
//! Planer turns a learner's background and goal into a bi-weekly learning
//! plan and a daily study schedule for every two-week period, by chaining
//! calls to a hosted language model.
//!
//! # Architecture
//!
//! - [`templates`]: named instruction templates with placeholder substitution
//! - [`generation`]: the [`Generator`] seam, the HTTP backends and the
//!   interaction journal
//! - [`pipeline`]: the fixed six-stage run over a [`RunState`]
//! - [`render`]: Markdown documents for structured plan records
//! - [`driver`]: one-call entry points returning a [`RunReport`]
//! - [`config`]: [`Settings`] resolved from the environment
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use planer_core::{run_workflow, Settings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let report = run_workflow(
//!     &settings,
//!     "Three years of backend Python",
//!     "Move into ML infrastructure",
//!     None,
//! )
//! .await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod generation;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod templates;

// Re-export commonly used types
pub use config::{Platform, Settings};
pub use driver::{execute, run_workflow, RunReport};
pub use error::{PlanerError, Result};
pub use generation::{FileJournal, Generator, HttpGenerator, InteractionJournal, JournaledGenerator};
pub use models::{DailyScheduleRecord, Period, PlanRecord, RunState, Stage};
pub use pipeline::{ArtifactOutcome, OutputLayout, Pipeline, PipelineBuilder};
pub use templates::TemplateStore;
