use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use reqwest::Client;

use crate::config::Settings;
use crate::error::GenerationError;
use crate::models::{ChatCompletionChunk, ChatCompletionRequest, GenerationParams, PromptMessage};

/// Hard ceiling on completion length per turn. A caller-supplied
/// `max_tokens` is honored up to this cap; absent one, the cap applies.
pub const MAX_COMPLETION_TOKENS: u32 = 150;

/// Terminator payload sent by the service after the last chunk.
const STREAM_DONE: &str = "[DONE]";

/// Streaming client for the hosted chat-completion service.
pub struct GenerationService {
    client: Client,
    base_url: String,
    api_token: String,
    model: String,
}

impl GenerationService {
    pub fn new(settings: &Settings) -> Self {
        Self::with_base_url(
            &settings.api_base,
            &settings.api_token,
            &settings.generation_model,
        )
    }

    /// The base URL is injectable so tests can point at a local mock server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
            model: model.into(),
        }
    }

    /// One content delta per SSE `data:` event, until the `[DONE]`
    /// terminator or the connection drops. No retry, backoff, or timeout;
    /// a mid-stream failure ends the stream with one `Err` item.
    pub fn stream_completion(
        &self,
        messages: Vec<PromptMessage>,
        params: GenerationParams,
    ) -> impl Stream<Item = Result<String, GenerationError>> + '_ {
        try_stream! {
            let url = format!("{}/models/{}/v1/chat/completions", self.base_url, self.model);
            let request = ChatCompletionRequest {
                model: self.model.clone(),
                messages,
                max_tokens: effective_max_tokens(&params),
                temperature: params.temperature,
                top_p: params.top_p,
                stream: true,
            };

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_token)
                .json(&request)
                .send()
                .await
                .map_err(GenerationError::Http)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.map_err(GenerationError::Http)?;
                Err(GenerationError::Service {
                    status: status.as_u16(),
                    body,
                })?;
                return;
            }

            let mut body = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();
            let mut done = false;

            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(GenerationError::Http)?;
                buffer.extend_from_slice(&chunk);

                // events are separated by a blank line
                while let Some((boundary, delimiter)) = find_event_boundary(&buffer) {
                    let raw: Vec<u8> = buffer.drain(..boundary + delimiter).collect();
                    let event = String::from_utf8_lossy(&raw).into_owned();

                    for line in event.split(|c| c == '\n' || c == '\r') {
                        let Some(payload) = line.strip_prefix("data:") else {
                            continue;
                        };
                        let payload = payload.trim();

                        if payload == STREAM_DONE {
                            done = true;
                            break;
                        }

                        let parsed: ChatCompletionChunk = serde_json::from_str(payload)
                            .map_err(|e| {
                                GenerationError::Stream(format!("bad chunk {payload:?}: {e}"))
                            })?;

                        let content = parsed
                            .choices
                            .first()
                            .and_then(|choice| choice.delta.content.clone());
                        if let Some(content) = content {
                            if !content.is_empty() {
                                yield content;
                            }
                        }
                    }

                    if done {
                        break;
                    }
                }

                if done {
                    break;
                }
            }

            // the body ended without the terminator: a dropped connection or
            // a partial final event, never a complete turn
            if !done {
                Err(GenerationError::Stream(
                    "stream ended before [DONE]".to_string(),
                ))?;
            }
        }
    }
}

/// Resolve the caller's `max_tokens` against the fixed ceiling. The cap is
/// deliberate: callers may lower it, never raise it.
fn effective_max_tokens(params: &GenerationParams) -> u32 {
    params
        .max_tokens
        .map_or(MAX_COMPLETION_TOKENS, |requested| {
            requested.min(MAX_COMPLETION_TOKENS)
        })
}

/// Position and width of the next blank-line event separator. SSE permits
/// LF, CRLF, and bare CR line endings.
fn find_event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    for i in 0..buffer.len() {
        if buffer[i..].starts_with(b"\r\n\r\n") {
            return Some((i, 4));
        }
        if buffer[i..].starts_with(b"\n\n") || buffer[i..].starts_with(b"\r\r") {
            return Some((i, 2));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_tokens_defaults_to_cap() {
        let params = GenerationParams::default();
        assert_eq!(effective_max_tokens(&params), MAX_COMPLETION_TOKENS);
    }

    #[test]
    fn max_tokens_clamps_to_cap() {
        let params = GenerationParams {
            max_tokens: Some(4096),
            ..GenerationParams::default()
        };
        assert_eq!(effective_max_tokens(&params), MAX_COMPLETION_TOKENS);
    }

    #[test]
    fn max_tokens_below_cap_passes_through() {
        let params = GenerationParams {
            max_tokens: Some(50),
            ..GenerationParams::default()
        };
        assert_eq!(effective_max_tokens(&params), 50);
    }

    #[test]
    fn event_boundary_finds_blank_line() {
        assert_eq!(find_event_boundary(b"data: x\n\ndata: y"), Some((7, 2)));
        assert_eq!(find_event_boundary(b"data: x"), None);
    }

    #[test]
    fn event_boundary_accepts_crlf_and_cr_endings() {
        assert_eq!(find_event_boundary(b"data: x\r\n\r\ndata: y"), Some((7, 4)));
        assert_eq!(find_event_boundary(b"data: x\r\rdata: y"), Some((7, 2)));
        assert_eq!(find_event_boundary(b"data: x\r\n"), None);
    }
}
