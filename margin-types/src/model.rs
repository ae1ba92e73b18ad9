//! The model seam: anything that can stream generated text and list models.

use std::future::Future;

use futures::StreamExt;

use crate::error::ModelError;
use crate::stream::{GenerateEvent, GenerateHandle};

/// A text-generation backend.
///
/// Uses RPITIT and is not object-safe; compose with generics at the seam.
/// The sink-style [`Model::generate_response`] is the surface document
/// consumers drive; [`Model::generate`] exposes the typed stream.
pub trait Model: Send + Sync {
    /// Start a streaming generation for `prompt`.
    ///
    /// `prompt` may be empty or arbitrary text. The returned handle yields
    /// tokens strictly in network arrival order.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<GenerateHandle, ModelError>> + Send;

    /// List the models the server has available, preserving server order.
    ///
    /// Failures collapse to an empty list. An empty list means "nothing to
    /// show", never a distinguishable error.
    fn models(&self) -> impl Future<Output = Vec<String>> + Send;

    /// Stream a generation into `on_chunk`, reporting failures as text.
    ///
    /// `on_chunk` is called once per token, in order. Any failure, whether
    /// the request could not start or the stream broke mid-transfer, is
    /// delivered as exactly one final chunk built by
    /// [`ModelError::response_text`], and the future still resolves
    /// normally. Callers never see an error on their own stack.
    fn generate_response(
        &self,
        prompt: &str,
        mut on_chunk: impl FnMut(&str),
    ) -> impl Future<Output = ()>
    where
        Self: Sized,
    {
        async move {
            match self.generate(prompt).await {
                Ok(mut handle) => {
                    while let Some(event) = handle.receiver.next().await {
                        match event {
                            GenerateEvent::Token(text) => on_chunk(&text),
                            GenerateEvent::Error(err) => {
                                on_chunk(&err.response_text());
                                return;
                            }
                        }
                    }
                }
                Err(err) => on_chunk(&err.response_text()),
            }
        }
    }
}
