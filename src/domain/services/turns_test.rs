use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::run_turn;
use super::SessionState;
use super::TurnsService;
use crate::domain::models::Action;
use crate::domain::models::ConversationProfile;
use crate::domain::models::ConversationSpec;
use crate::domain::models::Credentials;
use crate::domain::models::Event;
use crate::domain::models::Issuer;
use crate::domain::models::IssuerBox;
use crate::domain::models::Provider;
use crate::domain::models::ProviderBox;
use crate::domain::models::ProviderReply;
use crate::domain::models::TurnRequest;

#[derive(Default)]
struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    fn push(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn all(&self) -> Vec<String> {
        return self.calls.lock().unwrap().clone();
    }
}

struct StaticIssuer {
    log: Arc<CallLog>,
    fail: bool,
}

#[async_trait]
impl Issuer for StaticIssuer {
    async fn issue(&self) -> Result<Credentials> {
        self.log.push("issue".to_string());
        if self.fail {
            bail!("Cannot start conversation");
        }

        return Ok(Credentials {
            conversation_id: "conv-1".to_string(),
            token: "tok-1".to_string(),
        });
    }
}

struct ScriptedProvider {
    log: Arc<CallLog>,
    fail_send: bool,
    fail_receive: bool,
}

impl ScriptedProvider {
    fn new(log: Arc<CallLog>) -> ScriptedProvider {
        return ScriptedProvider {
            log,
            fail_send: false,
            fail_receive: false,
        };
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn create_conversation(&self, _spec: &ConversationSpec) -> Result<String> {
        bail!("not issued from the chat view");
    }

    async fn create_token(
        &self,
        _conversation_id: &str,
        _duration_in_seconds: u64,
    ) -> Result<String> {
        bail!("not issued from the chat view");
    }

    async fn send_message(&self, credentials: &Credentials, text: &str) -> Result<String> {
        self.log
            .push(format!("send:{}:{}", credentials.token, text));
        if self.fail_send {
            bail!("Cannot send message");
        }

        return Ok("msg-user-1".to_string());
    }

    async fn receive_message(&self, credentials: &Credentials) -> Result<ProviderReply> {
        self.log.push(format!("receive:{}", credentials.token));
        if self.fail_receive {
            bail!("Cannot receive message");
        }

        return Ok(ProviderReply {
            id: "msg-bot-1".to_string(),
            text: "Thank you for sharing.".to_string(),
        });
    }
}

fn acme_profile() -> ConversationProfile {
    return ConversationProfile {
        company: "Acme".to_string(),
        campaign: "Q1".to_string(),
    };
}

#[tokio::test]
async fn it_prepends_the_metadata_header_on_the_first_submission() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer = StaticIssuer {
        log: log.clone(),
        fail: false,
    };
    let provider = ScriptedProvider::new(log.clone());
    let mut state = SessionState::default();

    let outcome = run_turn(
        &issuer,
        &provider,
        &mut state,
        &acme_profile(),
        &TurnRequest::new("pay is low"),
    )
    .await?;

    assert_eq!(
        log.all(),
        vec![
            "issue".to_string(),
            "send:tok-1:{\"company\": \"Acme\", \"campaign\": \"Q1\"}\npay is low".to_string(),
            "receive:tok-1".to_string(),
        ]
    );

    // The echoed user message carries the text without the header.
    assert_eq!(outcome.user.id, "msg-user-1");
    assert_eq!(outcome.user.text, "pay is low");
    assert_eq!(outcome.bot.id, "msg-bot-1");
    assert_eq!(outcome.bot.text, "Thank you for sharing.");

    return Ok(());
}

#[tokio::test]
async fn it_omits_the_header_and_reuses_credentials_after_the_first_turn() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer = StaticIssuer {
        log: log.clone(),
        fail: false,
    };
    let provider = ScriptedProvider::new(log.clone());
    let mut state = SessionState::default();
    let profile = acme_profile();

    run_turn(
        &issuer,
        &provider,
        &mut state,
        &profile,
        &TurnRequest::new("pay is low"),
    )
    .await?;
    run_turn(
        &issuer,
        &provider,
        &mut state,
        &profile,
        &TurnRequest::new("also the coffee"),
    )
    .await?;

    let calls = log.all();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls.iter().filter(|c| return *c == "issue").count(), 1);
    assert_eq!(calls[3], "send:tok-1:also the coffee".to_string());

    return Ok(());
}

#[tokio::test]
async fn it_serializes_unset_profile_fields_as_empty_strings() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer = StaticIssuer {
        log: log.clone(),
        fail: false,
    };
    let provider = ScriptedProvider::new(log.clone());
    let mut state = SessionState::default();

    run_turn(
        &issuer,
        &provider,
        &mut state,
        &ConversationProfile::default(),
        &TurnRequest::new("hello"),
    )
    .await?;

    assert_eq!(
        log.all()[1],
        "send:tok-1:{\"company\": \"\", \"campaign\": \"\"}\nhello".to_string()
    );

    return Ok(());
}

#[tokio::test]
async fn it_attempts_no_exchange_when_issuance_fails() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer = StaticIssuer {
        log: log.clone(),
        fail: true,
    };
    let provider = ScriptedProvider::new(log.clone());
    let mut state = SessionState::default();

    let res = run_turn(
        &issuer,
        &provider,
        &mut state,
        &acme_profile(),
        &TurnRequest::new("pay is low"),
    )
    .await;

    assert!(res.is_err());
    assert_eq!(log.all(), vec!["issue".to_string()]);
    assert!(state.credentials.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_retries_issuance_on_the_next_submission_without_the_header() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let provider = ScriptedProvider::new(log.clone());
    let mut state = SessionState::default();
    let profile = acme_profile();

    let failing = StaticIssuer {
        log: log.clone(),
        fail: true,
    };
    let res = run_turn(
        &failing,
        &provider,
        &mut state,
        &profile,
        &TurnRequest::new("pay is low"),
    )
    .await;
    assert!(res.is_err());

    let working = StaticIssuer {
        log: log.clone(),
        fail: false,
    };
    run_turn(
        &working,
        &provider,
        &mut state,
        &profile,
        &TurnRequest::new("pay is low"),
    )
    .await?;

    // The header belongs to the first submission only, even though that
    // submission never reached the provider.
    assert_eq!(
        log.all(),
        vec![
            "issue".to_string(),
            "issue".to_string(),
            "send:tok-1:pay is low".to_string(),
            "receive:tok-1".to_string(),
        ]
    );

    return Ok(());
}

#[tokio::test]
async fn it_never_receives_when_the_send_fails() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer = StaticIssuer {
        log: log.clone(),
        fail: false,
    };
    let mut provider = ScriptedProvider::new(log.clone());
    provider.fail_send = true;
    let mut state = SessionState::default();

    let res = run_turn(
        &issuer,
        &provider,
        &mut state,
        &acme_profile(),
        &TurnRequest::new("pay is low"),
    )
    .await;

    assert!(res.is_err());
    let calls = log.all();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].starts_with("send:"));

    return Ok(());
}

#[tokio::test]
async fn it_fails_the_turn_when_the_receive_fails() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer = StaticIssuer {
        log: log.clone(),
        fail: false,
    };
    let mut provider = ScriptedProvider::new(log.clone());
    provider.fail_receive = true;
    let mut state = SessionState::default();

    let res = run_turn(
        &issuer,
        &provider,
        &mut state,
        &acme_profile(),
        &TurnRequest::new("pay is low"),
    )
    .await;

    assert!(res.is_err());
    assert_eq!(log.all().len(), 3);

    return Ok(());
}

#[tokio::test]
async fn it_emits_events_from_the_service_loop() -> Result<()> {
    let log = Arc::new(CallLog::default());
    let issuer: IssuerBox = Box::new(StaticIssuer {
        log: log.clone(),
        fail: false,
    });
    let provider: ProviderBox = Box::new(ScriptedProvider::new(log.clone()));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let worker = tokio::spawn(async move {
        return TurnsService::start(issuer, provider, event_tx, &mut action_rx).await;
    });

    action_tx.send(Action::SubmitTurn(TurnRequest::new("pay is low")))?;
    match event_rx.recv().await.unwrap() {
        Event::TurnCompleted(outcome) => {
            assert_eq!(outcome.user.id, "msg-user-1");
            assert_eq!(outcome.bot.id, "msg-bot-1");
        }
        Event::TurnFailed() => bail!("expected a completed turn"),
    }

    // Closing the action channel winds the service down.
    drop(action_tx);
    worker.await??;

    return Ok(());
}
