//! Builder for creating and configuring Pipeline instances.

use std::path::{Path, PathBuf};

use log::debug;

use super::Pipeline;
use crate::{
    config::Settings,
    error::{ConfigError, Result},
    generation::{
        FileJournal, Generator, HttpGenerator, InteractionJournal, JournaledGenerator, NullJournal,
    },
    templates::TemplateStore,
};

/// Builder for creating and configuring Pipeline instances.
///
/// Building performs client initialization: the generator is constructed
/// (or taken as injected), wrapped in the interaction journal, and the
/// templates are loaded. Any failure here happens before a single generation
/// call is made.
#[derive(Default)]
pub struct PipelineBuilder {
    settings: Option<Settings>,
    generator: Option<Box<dyn Generator>>,
    journal: Option<Box<dyn InteractionJournal>>,
    templates: Option<TemplateStore>,
    template_dir: Option<PathBuf>,
}

impl PipelineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings used for any part not injected explicitly.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Use `generator` instead of building an HTTP client from settings.
    pub fn with_generator<G: Generator + 'static>(mut self, generator: G) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Record interactions to `journal`.
    ///
    /// If not specified, interactions go to a timestamped file in the
    /// configured log directory, or nowhere when no settings were given.
    pub fn with_journal<J: InteractionJournal + 'static>(mut self, journal: J) -> Self {
        self.journal = Some(Box::new(journal));
        self
    }

    /// Use an already loaded template store.
    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Load templates from `dir` instead of the configured prompt directory.
    pub fn with_template_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.template_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured pipeline instance.
    ///
    /// # Errors
    ///
    /// Returns `PlanerError::Config` if no generator was injected and the
    /// settings are missing or describe an unusable client.
    /// Returns `PlanerError::Template` if the template directory cannot be
    /// loaded.
    pub fn build(self) -> Result<Pipeline> {
        let generator = match self.generator {
            Some(generator) => generator,
            None => {
                let settings = self.settings.as_ref().ok_or_else(|| ConfigError::Missing {
                    key: "settings".to_string(),
                })?;
                Box::new(HttpGenerator::from_settings(settings)?) as Box<dyn Generator>
            }
        };

        let journal: Box<dyn InteractionJournal> = match (self.journal, &self.settings) {
            (Some(journal), _) => journal,
            (None, Some(settings)) => {
                let journal = FileJournal::in_dir(&settings.log_dir);
                debug!("Journaling interactions to {}", journal.path().display());
                Box::new(journal)
            }
            (None, None) => Box::new(NullJournal),
        };

        let templates = match self.templates {
            Some(templates) => templates,
            None => {
                let dir = self
                    .template_dir
                    .or_else(|| self.settings.as_ref().map(|s| s.prompt_dir.clone()))
                    .unwrap_or_else(|| PathBuf::from("prompts"));
                TemplateStore::load(dir)?
            }
        };

        debug!(
            "Pipeline ready: model {}, templates from {}",
            generator.model_name(),
            templates.dir().display()
        );

        Ok(Pipeline::new(
            templates,
            Box::new(JournaledGenerator::new(generator, journal)),
        ))
    }
}
