//! Append-only journal of model interactions.
//!
//! The journal is an audit side channel, separate from the operational log.
//! Recording is infallible from the caller's point of view: a sink that fails
//! to write logs a warning and drops the entry.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, Zoned};
use log::warn;
use uuid::Uuid;

use super::Generator;
use crate::error::GenerationError;

/// How a journaled call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome<'a> {
    Reply(&'a str),
    Failed(&'a str),
}

/// One generation call as seen by the journal.
#[derive(Debug, Clone)]
pub struct Interaction<'a> {
    /// Correlation identifier, unique per call
    pub id: Uuid,
    pub timestamp: Timestamp,
    pub model: &'a str,
    pub instruction: &'a str,
    pub outcome: InteractionOutcome<'a>,
}

/// Sink for interaction records.
pub trait InteractionJournal: Send + Sync {
    /// Record one interaction. Must not panic and has no way to fail the
    /// caller.
    fn record(&self, interaction: &Interaction<'_>);
}

impl<J: InteractionJournal + ?Sized> InteractionJournal for Arc<J> {
    fn record(&self, interaction: &Interaction<'_>) {
        (**self).record(interaction)
    }
}

impl<J: InteractionJournal + ?Sized> InteractionJournal for Box<J> {
    fn record(&self, interaction: &Interaction<'_>) {
        (**self).record(interaction)
    }
}

/// Journal that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullJournal;

impl InteractionJournal for NullJournal {
    fn record(&self, _interaction: &Interaction<'_>) {}
}

/// Journal appending human-readable blocks to a file.
#[derive(Debug, Clone)]
pub struct FileJournal {
    path: PathBuf,
}

impl FileJournal {
    /// Journal writing to exactly `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Journal writing to `model_interactions-{YYYYmmdd_HHMMSS}.log` in
    /// `log_dir`. The directory is created on first write.
    pub fn in_dir(log_dir: impl AsRef<Path>) -> Self {
        let stamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
        Self::new(
            log_dir
                .as_ref()
                .join(format!("model_interactions-{stamp}.log")),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, interaction: &Interaction<'_>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let ts = interaction.timestamp.strftime("%Y-%m-%d %H:%M:%S");
        let id = interaction.id;
        let mut block = String::new();
        block.push_str(&format!("{ts} - === Interaction {id} Start ===\n"));
        block.push_str(&format!("{ts} - Model: {}\n", interaction.model));
        block.push_str(&format!("{ts} - Prompt:\n{}\n", interaction.instruction));
        match interaction.outcome {
            InteractionOutcome::Reply(reply) => {
                block.push_str(&format!("{ts} - Response:\n{reply}\n"))
            }
            InteractionOutcome::Failed(reason) => {
                block.push_str(&format!("{ts} - Error: {reason}\n"))
            }
        }
        block.push_str(&format!("{ts} - === Interaction {id} End ===\n\n"));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(block.as_bytes())
    }
}

impl InteractionJournal for FileJournal {
    fn record(&self, interaction: &Interaction<'_>) {
        if let Err(e) = self.append(interaction) {
            warn!(
                "Failed to journal interaction {} to {}: {e}",
                interaction.id,
                self.path.display()
            );
        }
    }
}

/// Generator decorator that journals every call made through it.
pub struct JournaledGenerator<G, J> {
    inner: G,
    journal: J,
}

impl<G, J> JournaledGenerator<G, J> {
    pub fn new(inner: G, journal: J) -> Self {
        Self { inner, journal }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G, J> Generator for JournaledGenerator<G, J>
where
    G: Generator,
    J: InteractionJournal,
{
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let result = self.inner.generate(instruction).await;

        let failure;
        let outcome = match &result {
            Ok(reply) => InteractionOutcome::Reply(reply),
            Err(e) => {
                failure = e.to_string();
                InteractionOutcome::Failed(&failure)
            }
        };
        self.journal.record(&Interaction {
            id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
            model: self.inner.model_name(),
            instruction,
            outcome,
        });

        result
    }
}
