use anyhow::Result;
use async_trait::async_trait;
use strum::EnumVariantNames;

use super::ConversationSpec;
use super::Credentials;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderName {
    ChatBotKit,
}

impl ProviderName {
    pub fn parse(text: &str) -> Option<ProviderName> {
        match text {
            "chatbotkit" => return Some(ProviderName::ChatBotKit),
            _ => return None,
        }
    }
}

pub struct ProviderReply {
    pub id: String,
    pub text: String,
}

pub type ProviderBox = Box<dyn Provider + Send + Sync>;

/// The four operations consumed from the external conversation provider.
/// Conversation and token creation run with the long-lived secret and are
/// only ever called by the token issuance service. Send and receive run
/// with the short-lived token the chat view holds.
#[async_trait]
pub trait Provider {
    /// Allocates a new conversation resource on the provider. Every call
    /// allocates; callers must use the result.
    async fn create_conversation(&self, spec: &ConversationSpec) -> Result<String>;

    /// Mints a token scoped to one conversation, valid for
    /// `duration_in_seconds` from now.
    async fn create_token(&self, conversation_id: &str, duration_in_seconds: u64)
        -> Result<String>;

    /// Submits one user message, returning the provider-issued message id.
    async fn send_message(&self, credentials: &Credentials, text: &str) -> Result<String>;

    /// Obtains the next bot reply for the conversation. Takes no payload.
    async fn receive_message(&self, credentials: &Credentials) -> Result<ProviderReply>;
}
