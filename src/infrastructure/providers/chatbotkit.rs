#[cfg(test)]
#[path = "chatbotkit_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ConversationSpec;
use crate::domain::models::Credentials;
use crate::domain::models::Provider;
use crate::domain::models::ProviderReply;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ConversationCreateResponse {
    id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenCreateRequest {
    #[serde(rename = "durationInSeconds")]
    duration_in_seconds: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenCreateResponse {
    token: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SendRequest {
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ReceiveResponse {
    id: String,
    text: String,
}

/// ChatBotKit REST client. Conversation and token creation authenticate
/// with the long-lived secret; send and receive authenticate with the
/// short-lived conversation token, so the same client works for both the
/// issuance service and the chat view.
pub struct ChatBotKit {
    url: String,
    secret: String,
}

impl Default for ChatBotKit {
    fn default() -> ChatBotKit {
        return ChatBotKit {
            url: Config::get(ConfigKey::ApiUrl),
            secret: Config::get(ConfigKey::Secret),
        };
    }
}

#[cfg(test)]
impl ChatBotKit {
    pub(crate) fn with_secret(url: String, secret: &str) -> ChatBotKit {
        return ChatBotKit {
            url,
            secret: secret.to_string(),
        };
    }
}

#[async_trait]
impl Provider for ChatBotKit {
    #[allow(clippy::implicit_return)]
    async fn create_conversation(&self, spec: &ConversationSpec) -> Result<String> {
        let res = reqwest::Client::new()
            .post(format!("{url}/v1/conversation/create", url = self.url))
            .header("Authorization", format!("Bearer {}", self.secret))
            .json(spec)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "conversation create failed"
            );
            bail!("Cannot create conversation");
        }

        let body = res.json::<ConversationCreateResponse>().await?;
        return Ok(body.id);
    }

    #[allow(clippy::implicit_return)]
    async fn create_token(
        &self,
        conversation_id: &str,
        duration_in_seconds: u64,
    ) -> Result<String> {
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1/conversation/{conversation_id}/token/create",
                url = self.url
            ))
            .header("Authorization", format!("Bearer {}", self.secret))
            .json(&TokenCreateRequest {
                duration_in_seconds,
            })
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "token create failed");
            bail!("Cannot create conversation token");
        }

        let body = res.json::<TokenCreateResponse>().await?;
        return Ok(body.token);
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&self, credentials: &Credentials, text: &str) -> Result<String> {
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1/conversation/{conversation_id}/send",
                url = self.url,
                conversation_id = credentials.conversation_id
            ))
            .header("Authorization", format!("Bearer {}", credentials.token))
            .json(&SendRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "message send failed");
            bail!("Cannot send message");
        }

        let body = res.json::<SendResponse>().await?;
        return Ok(body.id);
    }

    #[allow(clippy::implicit_return)]
    async fn receive_message(&self, credentials: &Credentials) -> Result<ProviderReply> {
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1/conversation/{conversation_id}/receive",
                url = self.url,
                conversation_id = credentials.conversation_id
            ))
            .header("Authorization", format!("Bearer {}", credentials.token))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "message receive failed");
            bail!("Cannot receive message");
        }

        let body = res.json::<ReceiveResponse>().await?;
        return Ok(ProviderReply {
            id: body.id,
            text: body.text,
        });
    }
}
