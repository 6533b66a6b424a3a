//! Error types for the planer library.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or resolving instruction templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The configured template directory does not exist
    #[error("Template directory '{path}' not found")]
    DirectoryNotFound { path: PathBuf },
    /// No template with the requested name was loaded
    #[error("Template '{name}' not found")]
    NotFound { name: String },
    /// The template references a variable the caller did not supply
    #[error("Template '{template}' references missing variable '{variable}'")]
    MissingVariable { template: String, variable: String },
    /// The template text has an unbalanced or empty placeholder
    #[error("Template '{template}' is malformed at byte {offset}: {reason}")]
    Malformed {
        template: String,
        offset: usize,
        reason: String,
    },
    /// Reading a template file failed
    #[error("Failed to read template file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised by a generation backend.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The HTTP request could not be sent or its body could not be read
    #[error("Transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status
    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The backend answered, but not in the envelope we expect
    #[error("Unexpected response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },
    /// The model reply was expected to be JSON and was not
    #[error("Unparseable structured output: {reason}")]
    UnparseableOutput { raw: String, reason: String },
    /// Catch-all for generators that are not HTTP backed
    #[error("Generation failed: {0}")]
    Backend(String),
}

impl GenerationError {
    /// Raw model text carried by an [`GenerationError::UnparseableOutput`].
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            GenerationError::UnparseableOutput { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Errors raised while resolving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting has no value
    #[error("Missing required setting '{key}'")]
    Missing { key: String },
    /// A setting has a value that cannot be interpreted
    #[error("Invalid value '{value}' for setting '{key}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
    /// The platform identifier is not one we can talk to
    #[error("Unsupported platform: {0}. Supported platforms: deepseek, google")]
    UnsupportedPlatform(String),
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Contract violations detected by the pipeline itself.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage needs exactly three revisions and found a different count
    #[error("Stage '{stage}' requires exactly {expected} revised plans, found {found}")]
    RevisionCount {
        stage: &'static str,
        expected: usize,
        found: usize,
    },
    /// A stage read a field that its owning stage has not produced yet
    #[error("Stage '{stage}' requires '{field}', which has not been generated")]
    MissingInput {
        stage: &'static str,
        field: &'static str,
    },
}

/// Comprehensive error type for all planer operations.
#[derive(Error, Debug)]
pub enum PlanerError {
    /// Template loading or resolution errors
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Generation backend errors
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Pipeline contract violations
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Extension trait attaching a path to I/O failures.
pub trait FsResultExt<T> {
    /// Map an I/O error into [`PlanerError::FileSystem`] for `path`.
    fn fs_context(self, path: &Path) -> Result<T>;
}

impl<T> FsResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &Path) -> Result<T> {
        self.map_err(|source| PlanerError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result type alias for planer operations
pub type Result<T> = std::result::Result<T, PlanerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_context_keeps_path() {
        let err = std::fs::read_to_string("/definitely/not/here.txt")
            .fs_context(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        match err {
            PlanerError::FileSystem { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.txt"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparseable_output_carries_raw_text() {
        let err = GenerationError::UnparseableOutput {
            raw: "not json".to_string(),
            reason: "expected value".to_string(),
        };
        assert_eq!(err.raw_output(), Some("not json"));
        assert!(err.to_string().contains("Unparseable structured output"));

        let other = GenerationError::Backend("boom".to_string());
        assert!(other.raw_output().is_none());
    }

    #[test]
    fn test_template_errors_convert_transparently() {
        let err: PlanerError = TemplateError::NotFound {
            name: "daily_plan".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Template 'daily_plan' not found");
    }
}
