#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use planer_core::error::GenerationError;
use planer_core::generation::{Interaction, InteractionOutcome};
use planer_core::{Generator, InteractionJournal, Pipeline, PipelineBuilder, TemplateStore};
use tempfile::TempDir;

/// Generator that replays a fixed script of replies, in call order.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub instructions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(|reply| Ok(reply.into())).collect(),
            )),
            instructions: Arc::default(),
        }
    }

    /// Queue a transport-style failure as the next reply.
    pub fn then_fail(self, reason: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(GenerationError::Backend(reason)),
            None => Err(GenerationError::Backend("script exhausted".to_string())),
        }
    }
}

/// Journal keeping `(instruction, reply)` pairs in memory.
#[derive(Clone, Default)]
pub struct RecordingJournal {
    pub entries: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl InteractionJournal for RecordingJournal {
    fn record(&self, interaction: &Interaction<'_>) {
        let reply = match interaction.outcome {
            InteractionOutcome::Reply(reply) => Some(reply.to_string()),
            InteractionOutcome::Failed(_) => None,
        };
        self.entries
            .lock()
            .unwrap()
            .push((interaction.instruction.to_string(), reply));
    }
}

/// The template directory shipped at the workspace root.
pub fn prompt_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../prompts")
}

/// Build a pipeline over the shipped templates.
pub fn create_test_pipeline(generator: ScriptedGenerator, journal: RecordingJournal) -> Pipeline {
    let templates = TemplateStore::load(prompt_dir()).expect("Failed to load templates");
    PipelineBuilder::new()
        .with_generator(generator)
        .with_journal(journal)
        .with_templates(templates)
        .build()
        .expect("Failed to create pipeline")
}

/// Helper function to create a temporary output directory
pub fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let output_dir = temp_dir.path().join("plans");
    (temp_dir, output_dir)
}
