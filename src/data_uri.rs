//! Base64 data URI encoding and decoding.
//!
//! Uploaded content travels to the tag generator as
//! `data:<mime>;base64,<payload>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{CloudPilotError, Result};

const BASE64_MARKER: &str = ";base64,";

/// A parsed data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// Declared MIME type.
    pub mime_type: &'a str,
    /// Base64 payload (not yet decoded).
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// Parse a `data:<mime>;base64,<payload>` string.
    ///
    /// The MIME type must be present and the payload must be valid base64.
    pub fn parse(uri: &'a str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| CloudPilotError::Validation("data URI must start with data:".into()))?;
        let (mime_type, payload) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
            CloudPilotError::Validation("data URI must use base64 encoding".to_string())
        })?;

        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(CloudPilotError::Validation(
                "data URI must declare a MIME type".to_string(),
            ));
        }
        if STANDARD.decode(payload).is_err() {
            return Err(CloudPilotError::Validation(
                "data URI payload is not valid base64".to_string(),
            ));
        }

        Ok(Self { mime_type, payload })
    }

    /// Decode the payload.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| CloudPilotError::Validation(format!("invalid base64 payload: {e}")))
    }
}

/// Encode content as a base64 data URI.
pub fn encode(mime_type: &str, content: &[u8]) -> String {
    format!("data:{mime_type}{BASE64_MARKER}{}", STANDARD.encode(content))
}
