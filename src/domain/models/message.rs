#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Author;

/// Sentinel id for the optimistic user entry shown while a turn is in
/// flight, replaced by the provider-issued id once the send confirms.
pub const PENDING_USER_ID: &str = "pending-user";

/// Sentinel id for the typing placeholder shown while waiting on the bot
/// reply.
pub const PENDING_BOT_ID: &str = "pending-bot";

/// Fixed id of the seeded greeting entry.
pub const GREETING_ID: &str = "greeting";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub text: String,
}

impl Message {
    pub fn new(author: Author, id: &str, text: &str) -> Message {
        return Message {
            id: id.to_string(),
            author,
            text: text.to_string().replace('\t', "  "),
        };
    }

    /// True for the optimistic entries appended at submission time. These
    /// are the only transcript entries ever mutated, and only by wholesale
    /// replacement when a turn completes.
    pub fn is_pending(&self) -> bool {
        return self.id == PENDING_USER_ID || self.id == PENDING_BOT_ID;
    }
}
