#[cfg(test)]
#[path = "turns_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ConversationProfile;
use crate::domain::models::Credentials;
use crate::domain::models::Event;
use crate::domain::models::Issuer;
use crate::domain::models::IssuerBox;
use crate::domain::models::Message;
use crate::domain::models::Provider;
use crate::domain::models::ProviderBox;
use crate::domain::models::TurnOutcome;
use crate::domain::models::TurnRequest;

/// Conversation state for the lifetime of one chat process. Credentials
/// are exchanged lazily on the first submission and never refreshed;
/// submissions are counted per attempt, not per success, which decides
/// whether the metadata header rides along.
#[derive(Default)]
struct SessionState {
    credentials: Option<Credentials>,
    submissions: u32,
}

async fn run_turn(
    issuer: &(dyn Issuer + Send + Sync),
    provider: &(dyn Provider + Send + Sync),
    state: &mut SessionState,
    profile: &ConversationProfile,
    request: &TurnRequest,
) -> Result<TurnOutcome> {
    let first_send = state.submissions == 0;
    state.submissions += 1;

    let credentials = match &state.credentials {
        Some(existing) => existing.clone(),
        None => {
            let fresh = issuer.issue().await?;
            tracing::debug!(
                conversation_id = fresh.conversation_id.as_str(),
                "conversation established"
            );
            state.credentials = Some(fresh.clone());
            fresh
        }
    };

    let outgoing = if first_send {
        format!("{}\n{}", profile.header(), request.text)
    } else {
        request.text.to_string()
    };

    let sent_id = provider.send_message(&credentials, &outgoing).await?;
    let reply = provider.receive_message(&credentials).await?;

    // The transcript keeps the text as typed; the header only ever exists
    // on the wire.
    return Ok(TurnOutcome {
        user: Message::new(Author::User, &sent_id, &request.text),
        bot: Message::new(Author::Bot, &reply.id, &reply.text),
    });
}

pub struct TurnsService {}

impl TurnsService {
    pub async fn start(
        issuer: IssuerBox,
        provider: ProviderBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let profile = ConversationProfile {
            company: Config::get(ConfigKey::Company),
            campaign: Config::get(ConfigKey::Campaign),
        };

        let mut state = SessionState::default();

        loop {
            let action = rx.recv().await;
            if action.is_none() {
                // Channel closed, the view is gone.
                return Ok(());
            }

            match action.unwrap() {
                Action::SubmitTurn(request) => {
                    let res = run_turn(
                        issuer.as_ref(),
                        provider.as_ref(),
                        &mut state,
                        &profile,
                        &request,
                    )
                    .await;

                    match res {
                        Ok(outcome) => {
                            tx.send(Event::TurnCompleted(outcome))?;
                        }
                        Err(err) => {
                            tracing::error!(error = ?err, "turn failed");
                            tx.send(Event::TurnFailed())?;
                        }
                    }
                }
            }
        }
    }
}
