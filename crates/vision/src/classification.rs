//! Decoding of the classifier's free-text reply.

use serde::Deserialize;

use crate::error::VisionError;

/// Structured classification extracted from the model reply.
///
/// Every field is optional: the storage layer applies defaults for
/// missing values, and `description` is only present when the request
/// asked for one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Classification {
    /// Object label, e.g. "Red apple".
    pub title: Option<String>,
    /// Object category, e.g. "Fruits".
    pub category: Option<String>,
    /// Confidence score, 0-100.
    pub confidence: Option<f64>,
    /// Detailed description, when requested.
    pub description: Option<String>,
}

/// Decode a reply into a [`Classification`].
///
/// Models tend to wrap the JSON payload in markdown code fences; both
/// ```` ```json ````-tagged and plain triple-backtick fences are stripped
/// before decoding. Anything undecodable after stripping is an error, not
/// a guess.
pub fn parse_classification(content: &str) -> Result<Classification, VisionError> {
    let payload = strip_code_fences(content);
    serde_json::from_str(payload).map_err(|e| VisionError::Parse(e.to_string()))
}

/// Return the fenced block's interior, or the trimmed input when no
/// fence is present.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();

    let inner = if let Some((_, rest)) = trimmed.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = trimmed.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        trimmed
    };

    inner.trim()
}
