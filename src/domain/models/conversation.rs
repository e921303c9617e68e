use serde_derive::Deserialize;
use serde_derive::Serialize;

/// The short-lived credential pair a chat session runs on. Held in memory
/// only; expiry is not tracked, a turn against an expired token fails like
/// any other non-success response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub conversation_id: String,
    pub token: String,
}

/// Fixed configuration payload sent when allocating a conversation on the
/// provider.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSpec {
    pub backstory: String,
    pub model: String,
}

/// The two optional metadata fields carried on the first outgoing message
/// of a session. Unset fields serialize as empty strings.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ConversationProfile {
    pub company: String,
    pub campaign: String,
}

impl ConversationProfile {
    /// Builds the metadata header line prepended to the first submission,
    /// e.g. `{"company": "Acme", "campaign": "Q1"}`.
    pub fn header(&self) -> String {
        return format!(
            "{{\"company\": \"{}\", \"campaign\": \"{}\"}}",
            self.company, self.campaign
        );
    }
}
