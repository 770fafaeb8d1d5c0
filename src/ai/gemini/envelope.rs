//! Decoding of the `generateContent` reply.
//!
//! The service wraps structured output twice: the value is serialized to a
//! JSON string, and that string sits in the `text` of the first part of the
//! first candidate. Decoding therefore happens in two stages that fail
//! independently: the outer body must have exactly one candidate with exactly
//! one part, and the inner text must parse as JSON and pass the caller's
//! validator.

use super::types::GenerateContentResponse;
use crate::error::{EnvelopeError, ValidationError};
use crate::schema::OutputSchema;
use crate::{Error, Result};
use serde_json::Value;

/// Decode a raw response body into the caller's type.
pub fn decode<T>(body: &str, schema: &OutputSchema<T>) -> Result<T> {
    let text = single_text(body)?;

    let value: Value = serde_json::from_str(&text).map_err(|e| {
        tracing::error!("Gemini response text is not JSON: {}", e);
        ValidationError::Json(e)
    })?;

    schema.validate(value).map_err(|e| {
        tracing::error!("Gemini response failed schema validation: {}", e);
        Error::Validation(e)
    })
}

/// Stage one: unwrap the envelope down to the single part's text.
fn single_text(body: &str) -> std::result::Result<String, EnvelopeError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse Gemini response envelope: {}", e);
        EnvelopeError::Malformed(e)
    })?;

    let [candidate] = <[_; 1]>::try_from(response.candidates)
        .map_err(|candidates| EnvelopeError::CandidateCount(candidates.len()))?;
    let [part] = <[_; 1]>::try_from(candidate.content.parts)
        .map_err(|parts| EnvelopeError::PartCount(parts.len()))?;

    Ok(part.text)
}
