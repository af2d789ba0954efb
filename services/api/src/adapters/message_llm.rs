//! services/api/src/adapters/message_llm.rs
//!
//! This module contains the adapter for the message-drafting LLM.
//! It implements the `MessageSuggestionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use family_loop_core::{
    messages::{suggest_message, MessageRequest},
    ports::{MessageSuggestionService, PortError, PortResult},
};
use tracing::warn;

const SYSTEM_PROMPT: &str = "You help people stay in touch with family and friends. \
Write one short text message (at most two sentences) the user could send to reconnect \
with the contact described. Match the requested tone. Reply with the message only, \
without quotes or commentary.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `MessageSuggestionService` using an OpenAI-compatible LLM.
///
/// Any provider failure falls back to the built-in templates, so a suggestion
/// is always returned.
#[derive(Clone)]
pub struct OpenAiMessageAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiMessageAdapter {
    /// Creates a new `OpenAiMessageAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    async fn draft(&self, request: &MessageRequest) -> PortResult<String> {
        let staleness = match request.days_since_contact {
            Some(days) => format!("{} days since we last talked", days),
            None => "we have not talked recently".to_string(),
        };
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "NAME: {}\nRELATIONSHIP: {}\nTONE: {}\nLAST CONTACT: {}",
                    request.name,
                    request.relationship,
                    request.tone.as_str(),
                    staleness
                ))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                PortError::Unexpected("Message LLM response contained no text content.".to_string())
            })
    }
}

//=========================================================================================
// `MessageSuggestionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MessageSuggestionService for OpenAiMessageAdapter {
    async fn suggest(&self, request: &MessageRequest) -> PortResult<String> {
        match self.draft(request).await {
            Ok(message) => Ok(message),
            Err(e) => {
                warn!("Message LLM failed, using template instead: {:?}", e);
                Ok(suggest_message(request))
            }
        }
    }
}
