//! AI tag generation for uploaded files.
//!
//! The tag generator is an external collaborator: given a file name, a
//! coarse type and the file content, it returns tags or fails. Callers go
//! through [`generate_file_tags`], which validates the request and turns
//! every failure into a [`TagResponse`] carrying an error message.

mod gemini;
mod prompt;
mod validation;

use std::collections::HashSet;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::Result;

pub use gemini::{parse_generate_response, GeminiTagGenerator};
pub use prompt::{build_prompt, content_excerpt};
pub use validation::{validate_request, TagValidationError};

/// Message returned for requests rejected before dispatch.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input.";

/// Message returned when the generator fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate tags.";

/// Request sent to the tag generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    /// File content as `data:<mime>;base64,<payload>`.
    pub file_data_uri: String,
    /// Name of the file.
    pub file_name: String,
    /// Coarse type of the file (top-level MIME category, e.g. `text`).
    pub file_type: String,
}

impl TagRequest {
    /// Create a new tag request.
    pub fn new(
        file_data_uri: impl Into<String>,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            file_data_uri: file_data_uri.into(),
            file_name: file_name.into(),
            file_type: file_type.into(),
        }
    }
}

/// Outcome of a tag generation call.
///
/// Exactly one of "tags" or "error" is meaningful: a failed call always
/// carries empty tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagResponse {
    /// Generated tags.
    pub tags: Vec<String>,
    /// Error message when generation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TagResponse {
    /// Successful response.
    pub fn success(tags: Vec<String>) -> Self {
        Self { tags, error: None }
    }

    /// Failed response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            tags: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Check if this response is a failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into a `Result` of tags or error message.
    pub fn into_result(self) -> std::result::Result<Vec<String>, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.tags),
        }
    }
}

/// A service that produces descriptive tags for a file.
///
/// Implementations are stateless per call and may be slow or unreliable;
/// every call is treated as fallible.
pub trait TagGenerator: Send + Sync {
    /// Generate tags for the file described by `request`.
    fn generate_tags<'a>(&'a self, request: &'a TagRequest) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// Trim tags, drop empty ones and remove duplicates, keeping first occurrences.
pub fn normalize_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}

/// Validate `request` and ask `generator` for tags.
///
/// Invalid requests are answered with [`INVALID_INPUT_MESSAGE`] without
/// calling the generator. Generator failures are logged and answered with
/// [`GENERATION_FAILED_MESSAGE`]. No retry is attempted.
pub async fn generate_file_tags(generator: &dyn TagGenerator, request: &TagRequest) -> TagResponse {
    if let Err(e) = validate_request(request) {
        warn!("Invalid input for tag generation: {}", e);
        return TagResponse::failure(INVALID_INPUT_MESSAGE);
    }

    debug!(
        "Generating tags for {} ({})",
        request.file_name, request.file_type
    );
    match generator.generate_tags(request).await {
        Ok(tags) => TagResponse::success(normalize_tags(tags)),
        Err(e) => {
            error!("Error generating tags for {}: {}", request.file_name, e);
            TagResponse::failure(GENERATION_FAILED_MESSAGE)
        }
    }
}

/// Same as [`generate_file_tags`], for a request that has not been decoded
/// yet. Missing or wrongly typed fields are rejected as invalid input.
pub async fn generate_file_tags_json(
    generator: &dyn TagGenerator,
    raw: &serde_json::Value,
) -> TagResponse {
    match TagRequest::deserialize(raw) {
        Ok(request) => generate_file_tags(generator, &request).await,
        Err(e) => {
            warn!("Malformed tag generation request: {}", e);
            TagResponse::failure(INVALID_INPUT_MESSAGE)
        }
    }
}
