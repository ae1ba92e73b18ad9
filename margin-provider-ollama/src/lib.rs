#![deny(missing_docs)]
//! Ollama model backend for the margin blocks.
//!
//! Implements the [`margin_types::Model`] trait for Ollama's `/api/generate`
//! endpoint. Ollama streams newline-delimited JSON rather than SSE; the
//! parser here reassembles lines split across network reads and skips lines
//! that fail to parse without aborting the stream.

mod client;
mod error;
mod streaming;
mod types;

pub use client::Ollama;

// Re-export the seam types for convenience
pub use margin_types::{GenerateEvent, GenerateHandle, Model, ModelError};
