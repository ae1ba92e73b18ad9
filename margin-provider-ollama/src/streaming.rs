//! NDJSON streaming support for the Ollama generate API.
//!
//! Ollama emits one JSON object per line:
//! ```text
//! {"model":"llama2","response":"Hi","done":false}
//! {"model":"llama2","response":" there","done":false}
//! {"model":"llama2","response":"","done":true,"total_duration":5589157167}
//! ```
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-completion>

use futures::{Stream, StreamExt};
use margin_types::{GenerateEvent, GenerateHandle, ModelError};
use reqwest::Response;

use crate::types::GenerateChunk;

/// Wrap an HTTP response body into a [`GenerateHandle`].
pub(crate) fn stream_generation(response: Response) -> GenerateHandle {
    GenerateHandle::new(parse_ndjson_stream(response.bytes_stream()))
}

/// Parse a raw byte stream into [`GenerateEvent`]s.
///
/// Partial lines are buffered across byte chunks, so a JSON object split
/// over two network reads is reassembled rather than dropped. The final
/// unterminated line, if any, is flushed to the parser when the transport
/// ends.
fn parse_ndjson_stream<E>(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, E>> + Send + 'static,
) -> impl Stream<Item = GenerateEvent> + Send + 'static
where
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut line_buf = String::new();

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield GenerateEvent::Error(ModelError::Stream(e.to_string()));
                    return;
                }
            };

            // Ollama sends UTF-8; anything else is a broken transport.
            let chunk_str = match std::str::from_utf8(&chunk) {
                Ok(s) => s,
                Err(e) => {
                    yield GenerateEvent::Error(ModelError::Stream(format!(
                        "UTF-8 decode error: {e}"
                    )));
                    return;
                }
            };

            line_buf.push_str(chunk_str);

            while let Some(newline_pos) = line_buf.find('\n') {
                let line = line_buf[..newline_pos].trim_end_matches('\r').to_string();
                line_buf.drain(..=newline_pos);

                if let Some(token) = parse_line(&line) {
                    yield GenerateEvent::Token(token);
                }
            }
        }

        // Flush whatever the server left unterminated.
        let remaining = std::mem::take(&mut line_buf);
        if let Some(token) = parse_line(remaining.trim_end_matches('\r')) {
            yield GenerateEvent::Token(token);
        }
    }
}

/// Decode one NDJSON line into a token, if it carries one.
///
/// Blank lines yield nothing. A line that fails to parse is logged and
/// skipped; it must never abort the stream. Only a present, non-empty
/// `response` field produces a token.
fn parse_line(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let chunk: GenerateChunk = match serde_json::from_str(line) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed stream line");
            return None;
        }
    };

    if chunk.done {
        tracing::debug!("generation stream reported done");
    }

    chunk.response.filter(|text| !text.is_empty())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(s: &str) -> bytes::Bytes {
        bytes::Bytes::copy_from_slice(s.as_bytes())
    }

    async fn collect(chunks: Vec<Result<bytes::Bytes, String>>) -> Vec<GenerateEvent> {
        parse_ndjson_stream(futures::stream::iter(chunks))
            .collect::<Vec<_>>()
            .await
    }

    fn tokens(events: &[GenerateEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                GenerateEvent::Token(t) => Some(t.clone()),
                GenerateEvent::Error(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn parses_tokens_in_arrival_order() {
        let events = collect(vec![Ok(bytes_of(
            "{\"response\":\"Hi\",\"done\":false}\n{\"response\":\" there\",\"done\":false}\n",
        ))])
        .await;
        assert_eq!(tokens(&events), vec!["Hi", " there"]);
    }

    #[tokio::test]
    async fn reassembles_line_split_across_reads() {
        let events = collect(vec![
            Ok(bytes_of("{\"response\":\"Hel")),
            Ok(bytes_of("lo\",\"done\":false}\n")),
        ])
        .await;
        assert_eq!(tokens(&events), vec!["Hello"]);
    }

    #[tokio::test]
    async fn malformed_line_is_skipped_not_fatal() {
        let events = collect(vec![Ok(bytes_of(
            "{\"response\":\"a\",\"done\":false}\nnot json at all\n{\"response\":\"b\",\"done\":false}\n",
        ))])
        .await;
        assert_eq!(tokens(&events), vec!["a", "b"]);
        assert!(!events.iter().any(|e| matches!(e, GenerateEvent::Error(_))));
    }

    #[tokio::test]
    async fn blank_lines_are_ignored() {
        let events = collect(vec![Ok(bytes_of(
            "\n\n{\"response\":\"x\",\"done\":false}\n\n",
        ))])
        .await;
        assert_eq!(tokens(&events), vec!["x"]);
    }

    #[tokio::test]
    async fn done_line_with_empty_response_yields_no_token() {
        let events = collect(vec![Ok(bytes_of(
            "{\"response\":\"x\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
        ))])
        .await;
        assert_eq!(tokens(&events), vec!["x"]);
    }

    #[tokio::test]
    async fn final_unterminated_line_is_flushed() {
        let events = collect(vec![Ok(bytes_of("{\"response\":\"tail\",\"done\":true}"))]).await;
        assert_eq!(tokens(&events), vec!["tail"]);
    }

    #[tokio::test]
    async fn crlf_lines_parse() {
        let events = collect(vec![Ok(bytes_of("{\"response\":\"x\",\"done\":false}\r\n"))]).await;
        assert_eq!(tokens(&events), vec!["x"]);
    }

    #[tokio::test]
    async fn transport_error_ends_the_stream_with_one_error() {
        let events = collect(vec![
            Ok(bytes_of("{\"response\":\"x\",\"done\":false}\n")),
            Err("connection reset".to_string()),
            Ok(bytes_of("{\"response\":\"never\",\"done\":false}\n")),
        ])
        .await;
        assert_eq!(tokens(&events), vec!["x"]);
        let errors: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GenerateEvent::Error(_)))
            .collect();
        assert_eq!(errors.len(), 1);
        match errors[0] {
            GenerateEvent::Error(ModelError::Stream(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected stream error, got: {other:?}"),
        }
    }

    #[test]
    fn parse_line_extracts_response_field() {
        assert_eq!(
            parse_line(r#"{"model":"llama2","response":"Hi","done":false}"#),
            Some("Hi".to_string())
        );
        assert_eq!(parse_line(r#"{"done":true}"#), None);
        assert_eq!(parse_line("garbage"), None);
        assert_eq!(parse_line("   "), None);
    }
}
