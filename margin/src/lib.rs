#![doc = include_str!("../README.md")]

// === Core blocks (always available) ===

/// Shared types and traits: settings, the model seam, the editor seam.
pub mod types {
    pub use margin_types::*;
}

/// Trigger detection and the streaming inline command processor.
pub mod inline {
    pub use margin_inline::*;
}

// === Optional provider blocks ===

/// Ollama local backend (`/api/generate` NDJSON streaming, `/api/tags`).
#[cfg(feature = "ollama")]
pub mod ollama {
    pub use margin_provider_ollama::*;
}
