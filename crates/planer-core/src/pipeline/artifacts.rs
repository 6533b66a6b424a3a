//! Output layout and artifact writes.
//!
//! Raw model text is always written and a failure to write it is fatal. The
//! structured `.json` and rendered `_markdown.md` siblings are derived
//! artifacts: every attempt yields an [`ArtifactOutcome`] that is logged and
//! never escalated.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::error::{FsResultExt, Result};
use crate::models::{Parsed, Period};

/// File name of the raw final plan.
pub const OVERALL_PLAN_FILE: &str = "overall_plan.md";

/// File name of the structured final plan.
pub const OVERALL_PLAN_JSON_FILE: &str = "overall_plan.json";

/// File name of the rendered final plan.
pub const OVERALL_PLAN_MARKDOWN_FILE: &str = "overall_plan_markdown.md";

/// Sub-directory holding the per-period daily plans.
pub const DAILY_DIR: &str = "daily";

/// Paths of every artifact under one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn overall_plan(&self) -> PathBuf {
        self.root.join(OVERALL_PLAN_FILE)
    }

    pub fn overall_plan_json(&self) -> PathBuf {
        self.root.join(OVERALL_PLAN_JSON_FILE)
    }

    pub fn overall_plan_markdown(&self) -> PathBuf {
        self.root.join(OVERALL_PLAN_MARKDOWN_FILE)
    }

    pub fn daily_dir(&self) -> PathBuf {
        self.root.join(DAILY_DIR)
    }

    /// `daily/week{start}-{end}.md`
    pub fn daily_plan(&self, period: &Period) -> PathBuf {
        self.daily_dir().join(format!("{}.md", period.file_stem()))
    }

    /// `daily/week{start}-{end}.json`
    pub fn daily_plan_json(&self, period: &Period) -> PathBuf {
        self.daily_dir().join(format!("{}.json", period.file_stem()))
    }

    /// `daily/week{start}-{end}_markdown.md`
    pub fn daily_plan_markdown(&self, period: &Period) -> PathBuf {
        self.daily_dir()
            .join(format!("{}_markdown.md", period.file_stem()))
    }

    /// Create the output directory and its `daily/` sub-directory.
    pub fn ensure_dirs(&self) -> Result<()> {
        ensure_dir(&self.root)?;
        ensure_dir(&self.daily_dir())
    }
}

/// Result of one attempt at writing derived artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Both the structured and the rendered file were written
    Written { json: PathBuf, markdown: PathBuf },
    /// Nothing was written, for the given reason
    Skipped { reason: String },
}

impl ArtifactOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ArtifactOutcome::Written { .. })
    }
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).fs_context(dir)
}

/// Write `text` verbatim to `path`, replacing any previous content.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).fs_context(path)?;
    info!("Saved {}", path.display());
    Ok(())
}

/// Parse `raw`, then write the parsed JSON to `json_path` and the rendered
/// document to `markdown_path`.
///
/// `what` names the artifact in log messages.
pub(crate) fn write_derived<T, P, R>(
    what: &str,
    raw: &str,
    json_path: &Path,
    markdown_path: &Path,
    parse: P,
    render: R,
) -> ArtifactOutcome
where
    P: FnOnce(&str) -> std::result::Result<Parsed<T>, serde_json::Error>,
    R: FnOnce(&T) -> String,
{
    let parsed = match parse(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Failed to parse {what} as JSON: {e}");
            return ArtifactOutcome::Skipped {
                reason: format!("not a structured record: {e}"),
            };
        }
    };

    match write_parsed(&parsed.value, json_path, &render(&parsed.record), markdown_path) {
        Ok(()) => ArtifactOutcome::Written {
            json: json_path.to_path_buf(),
            markdown: markdown_path.to_path_buf(),
        },
        Err(e) => {
            warn!("Failed to save structured artifacts for {what}: {e}");
            ArtifactOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    }
}

fn write_parsed(value: &Value, json_path: &Path, markdown: &str, markdown_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(json_path, &json)?;
    write_text(markdown_path, markdown)
}
