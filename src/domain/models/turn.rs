use super::Message;

/// One user submission handed from the view to the turn engine. Carries
/// the text as typed; the engine decides whether the metadata header gets
/// prepended on the wire.
pub struct TurnRequest {
    pub text: String,
}

impl TurnRequest {
    pub fn new(text: &str) -> TurnRequest {
        return TurnRequest {
            text: text.to_string(),
        };
    }
}

/// The confirmed pair produced by a successful send/receive exchange:
/// the echoed user message under its provider-issued id, then the bot
/// reply.
pub struct TurnOutcome {
    pub user: Message,
    pub bot: Message,
}
