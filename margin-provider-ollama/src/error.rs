//! Internal helpers mapping HTTP/reqwest failures to [`ModelError`].

use margin_types::ModelError;

/// Map a non-success HTTP status from the Ollama API to a [`ModelError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode) -> ModelError {
    ModelError::HttpStatus(status.as_u16())
}

/// Map a [`reqwest::Error`] raised while sending the request.
pub(crate) fn map_send_error(err: reqwest::Error) -> ModelError {
    ModelError::Request(err.to_string())
}
