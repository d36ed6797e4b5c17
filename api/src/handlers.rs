use std::convert::Infallible;

use async_stream::stream;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::{pin_mut, Stream, StreamExt};
use serde::Serialize;

use crate::chat_payload::ChatRequest;

/// Shown to the end user when a turn fails; internal errors stay in the log.
const TURN_FAILURE_MESSAGE: &str =
    "The advisor could not complete this response. Please try again.";

const TITLE: &str = "Corporate Security Policy Advisor";

const DISCLAIMER: &str = "Disclaimer: This chatbot is based on 'The CISO Handbook' and is for informational purposes only. For official policy information, please refer to your company's authorized resources.";

const EXAMPLE_PROMPTS: &[&str] = &[
    "What are the key components of a strong password policy?",
    "How should we handle a potential data breach?",
    "What are best practices for employee security training?",
    "Can you explain the concept of defense in depth?",
    "What should be included in an incident response plan?",
    "How can we secure our remote work environment?",
    "What are the main compliance standards we should be aware of?",
];

/// One SSE event per cumulative response snapshot. A failed turn emits a
/// single `error` event with a generic advisory message, then ends.
pub async fn chat(
    Json(payload): Json<ChatRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let state = crate::app_state();
    let params = payload.generation_params();

    let events = stream! {
        let turn = state.chat.respond(payload.message, payload.history, params);
        pin_mut!(turn);

        while let Some(snapshot) = turn.next().await {
            match snapshot {
                Ok(text) => yield Ok(Event::default().data(text)),
                Err(err) => {
                    log::error!("Chat turn failed: {}", err);
                    yield Ok(Event::default().event("error").data(TURN_FAILURE_MESSAGE));
                    break;
                }
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[derive(Serialize)]
pub struct Suggestions {
    pub title: &'static str,
    pub disclaimer: &'static str,
    pub examples: &'static [&'static str],
}

/// Static UI hints; not a functional contract.
pub async fn suggestions() -> Json<Suggestions> {
    Json(Suggestions {
        title: TITLE,
        disclaimer: DISCLAIMER,
        examples: EXAMPLE_PROMPTS,
    })
}
