//! Generation client: send instruction text to a model, get text back.
//!
//! [`Generator`] is the seam the pipeline depends on. [`HttpGenerator`] talks
//! to a hosted model; [`JournaledGenerator`] wraps any generator and records
//! every call to an [`InteractionJournal`] without touching the call's result.

pub mod http;
pub mod journal;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use crate::error::GenerationError;

pub use http::HttpGenerator;
pub use journal::{
    FileJournal, Interaction, InteractionJournal, InteractionOutcome, JournaledGenerator,
    NullJournal,
};

/// Directive appended to instructions whose reply must be strict JSON.
pub const JSON_DIRECTIVE: &str =
    "Output strictly valid JSON only. Do not include any other text, explanation, or Markdown.";

/// A backend that turns an instruction into generated text.
///
/// One call is one attempt: implementations must not retry, and must return
/// transport or authentication failures unchanged.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Identifier of the model answering, for logs and the journal.
    fn model_name(&self) -> &str;

    /// Send `instruction` and return the raw reply text.
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError>;
}

#[async_trait]
impl<G: Generator + ?Sized> Generator for Box<G> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        (**self).generate(instruction).await
    }
}

/// Ask for a strict-JSON reply and parse it.
///
/// # Errors
///
/// Transport failures propagate unchanged. A reply that is not JSON yields
/// `GenerationError::UnparseableOutput` carrying the raw text.
pub async fn generate_json<G>(generator: &G, instruction: &str) -> Result<Value, GenerationError>
where
    G: Generator + ?Sized,
{
    let json_instruction = format!("{instruction}\n\n{JSON_DIRECTIVE}");

    info!("Generating JSON response with model {}", generator.model_name());
    let raw = generator.generate(&json_instruction).await?;

    match serde_json::from_str::<Value>(extract_json_payload(&raw)) {
        Ok(value) => {
            info!(
                "Successfully parsed JSON response from model {}",
                generator.model_name()
            );
            debug!("Parsed JSON data: {value}");
            Ok(value)
        }
        Err(e) => {
            warn!(
                "Error parsing JSON response from model {}: {e}",
                generator.model_name()
            );
            debug!("Raw response that failed to parse: {raw}");
            Err(GenerationError::UnparseableOutput {
                raw,
                reason: e.to_string(),
            })
        }
    }
}

/// Strip whitespace and a surrounding Markdown code fence from model output.
///
/// Models asked for JSON frequently answer with a ```` ```json ```` block.
/// Text without a fence is returned trimmed and otherwise untouched.
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// First `limit` characters of `text`, for log previews.
pub(crate) fn preview(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
