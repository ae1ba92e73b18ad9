//! Streaming event types for incremental generation output.

use std::pin::Pin;

use futures::Stream;

use crate::error::ModelError;

/// An event decoded from the generation stream.
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    /// One non-empty text fragment, in arrival order.
    Token(String),
    /// The transport failed mid-stream. No further events follow.
    Error(ModelError),
}

/// Handle to a live generation stream.
///
/// Consume with `StreamExt::next()`. There is no explicit cancel call:
/// dropping the handle drops the underlying HTTP transfer, which is the
/// only way to abort a generation before it finishes.
pub struct GenerateHandle {
    /// The stream of events.
    pub receiver: Pin<Box<dyn Stream<Item = GenerateEvent> + Send>>,
}

impl GenerateHandle {
    /// Wrap an event stream.
    pub fn new(stream: impl Stream<Item = GenerateEvent> + Send + 'static) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }
}
