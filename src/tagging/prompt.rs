//! Prompt construction for the tagging model.

use super::TagRequest;
use crate::data_uri::DataUri;
use crate::tree::FileType;

const INSTRUCTIONS: &str = "You generate descriptive tags for files. \
Produce a short list of lowercase tags that make the file easy to search for and organize.";

const RESPONSE_FORMAT: &str =
    "Reply with JSON only, in the form {\"tags\": [\"tag\", \"another tag\"]}.";

/// Decode the request content and return its first `max_chars` characters.
///
/// Returns `None` for media categories (image, video, audio), whose binary
/// content is never shown to the model, and when the content cannot be
/// decoded or is empty.
pub fn content_excerpt(request: &TagRequest, max_chars: usize) -> Option<String> {
    if FileType::from_upload_category(&request.file_type).is_media() {
        return None;
    }

    let bytes = DataUri::parse(&request.file_data_uri).ok()?.decode().ok()?;
    let excerpt: String = String::from_utf8_lossy(&bytes).chars().take(max_chars).collect();
    if excerpt.trim().is_empty() {
        None
    } else {
        Some(excerpt)
    }
}

/// Build the prompt sent to the model for `request`.
pub fn build_prompt(request: &TagRequest, max_content_chars: usize) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\n");

    if let Some(excerpt) = content_excerpt(request, max_content_chars) {
        prompt.push_str(
            "The file is not a media file, so its content is included to make the tags more accurate.\n",
        );
        prompt.push_str(&format!(
            "File content (first {max_content_chars} characters):\n{excerpt}\n\n"
        ));
    }

    prompt.push_str(&format!("File name: {}\n", request.file_name));
    prompt.push_str(&format!("File type: {}\n\n", request.file_type));
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}
