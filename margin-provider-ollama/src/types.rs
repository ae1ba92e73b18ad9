//! Ollama `/api/generate` and `/api/tags` wire types.
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-completion>

use serde::{Deserialize, Serialize};

/// `/api/generate` request body.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "llama2").
    pub model: String,
    /// The raw prompt text.
    pub prompt: String,
    /// Whether to stream the response. Always `true` for this client.
    pub stream: bool,
}

/// One line of the `/api/generate` NDJSON stream.
///
/// Only `response` feeds the consumer. The final line carries `done: true`
/// with an empty `response` and timing fields this client does not read.
#[derive(Debug, Deserialize)]
pub struct GenerateChunk {
    /// Generated text fragment.
    #[serde(default)]
    pub response: Option<String>,
    /// Whether this is the final line of the stream.
    #[serde(default)]
    pub done: bool,
}

/// `/api/tags` response body.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    /// Models the server has pulled, in server order.
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// One entry of the `/api/tags` model list.
#[derive(Debug, Deserialize)]
pub struct ModelTag {
    /// Model name (e.g. "llama2:latest").
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_serializes_all_fields() {
        let body = GenerateRequest {
            model: "llama2".into(),
            prompt: "hello".into(),
            stream: true,
        };
        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(json["model"], "llama2");
        assert_eq!(json["prompt"], "hello");
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn chunk_parses_with_response() {
        let chunk: GenerateChunk =
            serde_json::from_str(r#"{"model":"llama2","response":"Hi","done":false}"#)
                .expect("parses");
        assert_eq!(chunk.response.as_deref(), Some("Hi"));
        assert!(!chunk.done);
    }

    #[test]
    fn chunk_parses_final_line_without_response() {
        let chunk: GenerateChunk =
            serde_json::from_str(r#"{"model":"llama2","done":true,"total_duration":5000}"#)
                .expect("parses");
        assert!(chunk.response.is_none());
        assert!(chunk.done);
    }

    #[test]
    fn tags_response_preserves_server_order() {
        let tags: TagsResponse = serde_json::from_str(
            r#"{"models":[{"name":"llama2:latest","size":3825819519},{"name":"mistral:latest"}]}"#,
        )
        .expect("parses");
        let names: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["llama2:latest", "mistral:latest"]);
    }

    #[test]
    fn tags_response_defaults_to_empty_models() {
        let tags: TagsResponse = serde_json::from_str("{}").expect("parses");
        assert!(tags.models.is_empty());
    }
}
