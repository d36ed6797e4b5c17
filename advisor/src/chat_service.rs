use std::sync::Arc;

use async_stream::stream;
use futures_util::{pin_mut, Stream, StreamExt};

use crate::error::ChatError;
use crate::generation_service::GenerationService;
use crate::models::{ConversationTurn, GenerationParams, PromptMessage};
use crate::retriever::{Retriever, DEFAULT_TOP_K};

/// Fixed advisor persona prepended to every conversation.
pub const SYSTEM_PROMPT: &str = "You are a knowledgeable Corporate Security Policy Advisor based on 'The CISO Handbook'. Provide concise, accurate information about corporate security policies. Be professional and focus on security best practices. Prioritize the company's security and compliance. If unsure, advise consulting official policy documents or the security department.";

/// Prefix for the retrieved-context system message.
pub const CONTEXT_PREFIX: &str = "Relevant CISO Handbook information: ";

/// Per-turn orchestrator: retrieval, prompt assembly, streamed generation.
pub struct ChatService {
    retriever: Arc<Retriever>,
    generation: Arc<GenerationService>,
}

impl ChatService {
    pub fn new(retriever: Arc<Retriever>, generation: Arc<GenerationService>) -> Self {
        Self {
            retriever,
            generation,
        }
    }

    /// Stream cumulative response snapshots for one user turn. Each item is
    /// the full response so far (a monotonically growing prefix), not a
    /// delta. A failure ends the stream with one `Err` item; snapshots
    /// already yielded are not retracted.
    pub fn respond(
        &self,
        message: String,
        history: Vec<ConversationTurn>,
        params: GenerationParams,
    ) -> impl Stream<Item = Result<String, ChatError>> + '_ {
        stream! {
            let context = match self.retriever.retrieve(&message, DEFAULT_TOP_K).await {
                Ok(pages) => pages.join("\n"),
                Err(err) => {
                    yield Err(ChatError::Retrieval(err));
                    return;
                }
            };

            let messages = assemble_messages(&message, &history, &context);
            log::info!(
                "Dispatching {} prompt messages to the generation service",
                messages.len()
            );

            let deltas = self.generation.stream_completion(messages, params);
            pin_mut!(deltas);

            let mut response = String::new();
            while let Some(delta) = deltas.next().await {
                match delta {
                    Ok(token) => {
                        response.push_str(&token);
                        yield Ok(response.clone());
                    }
                    Err(err) => {
                        yield Err(ChatError::Generation(err));
                        return;
                    }
                }
            }
        }
    }
}

/// Assemble the per-turn prompt: the advisor persona, prior turns in order
/// (skipping empty sides), the retrieved-context system message, then the
/// new user message.
pub fn assemble_messages(
    message: &str,
    history: &[ConversationTurn],
    context: &str,
) -> Vec<PromptMessage> {
    let mut messages = vec![PromptMessage::system(SYSTEM_PROMPT)];

    for turn in history {
        if !turn.user.is_empty() {
            messages.push(PromptMessage::user(&turn.user));
        }
        if !turn.assistant.is_empty() {
            messages.push(PromptMessage::assistant(&turn.assistant));
        }
    }

    messages.push(PromptMessage::system(format!("{CONTEXT_PREFIX}{context}")));
    messages.push(PromptMessage::user(message));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn empty_history_yields_system_context_user() {
        let messages = assemble_messages("hello", &[], "page text");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::System);
        assert_eq!(
            messages[1].content,
            format!("{CONTEXT_PREFIX}page text")
        );
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].content, "hello");
    }

    #[test]
    fn history_turns_appear_in_order_before_context() {
        let history = vec![
            ConversationTurn {
                user: "first question".into(),
                assistant: "first answer".into(),
            },
            ConversationTurn {
                user: "second question".into(),
                assistant: "second answer".into(),
            },
        ];

        let messages = assemble_messages("third question", &history, "ctx");
        let context_message = format!("{CONTEXT_PREFIX}ctx");

        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                SYSTEM_PROMPT,
                "first question",
                "first answer",
                "second question",
                "second answer",
                context_message.as_str(),
                "third question",
            ]
        );
    }

    #[test]
    fn empty_history_sides_are_skipped() {
        let history = vec![ConversationTurn {
            user: "only a question".into(),
            assistant: String::new(),
        }];

        let messages = assemble_messages("next", &history, "ctx");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "only a question");
        assert_eq!(messages[2].role, Role::System);
    }
}
