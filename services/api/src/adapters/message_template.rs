//! services/api/src/adapters/message_template.rs

use async_trait::async_trait;
use family_loop_core::messages::{suggest_message, MessageRequest};
use family_loop_core::ports::{MessageSuggestionService, PortResult};

/// Drafts suggestions from the built-in templates. Needs no network access.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateMessageAdapter;

#[async_trait]
impl MessageSuggestionService for TemplateMessageAdapter {
    async fn suggest(&self, request: &MessageRequest) -> PortResult<String> {
        Ok(suggest_message(request))
    }
}
