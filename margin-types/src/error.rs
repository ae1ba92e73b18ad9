//! Error types shared between the model backends and their consumers.

use thiserror::Error;

/// Failures raised by a model backend.
///
/// The detail strings are user-facing: they end up embedded in the text a
/// failed generation delivers through the chunk sink.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The server answered with a non-success status code.
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body stream broke mid-transfer.
    #[error("stream read error: {0}")]
    Stream(String),
}

impl ModelError {
    /// The text a failed generation delivers through the chunk sink.
    ///
    /// This template is a contract: sink consumers can tell generated
    /// content from an embedded failure only by matching it. Callers that
    /// want the typed value use the stream API instead.
    #[must_use]
    pub fn response_text(&self) -> String {
        format!("Error: Failed to generate response from Ollama. Details: {self}")
    }
}
