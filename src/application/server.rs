#[cfg(test)]
#[path = "server_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ConversationSpec;
use crate::domain::models::Credentials;
use crate::domain::models::ProviderBox;
use crate::infrastructure::providers::ProviderManager;

/// Issued tokens are valid for one hour from creation. Expiry is not
/// tracked anywhere downstream; an expired token simply fails its next
/// exchange.
const TOKEN_DURATION_SECONDS: u64 = 3600;

#[derive(Serialize, Deserialize)]
struct ErrorBody {
    message: String,
}

struct IssuerState {
    provider: ProviderBox,
    spec: ConversationSpec,
}

pub fn build_router(provider: ProviderBox, spec: ConversationSpec) -> Router {
    let state = Arc::new(IssuerState { provider, spec });

    return Router::new()
        .route("/api/create", get(create_credentials))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);
}

async fn issue(state: &IssuerState) -> Result<Credentials> {
    let conversation_id = state.provider.create_conversation(&state.spec).await?;
    let token = state
        .provider
        .create_token(&conversation_id, TOKEN_DURATION_SECONDS)
        .await?;

    return Ok(Credentials {
        conversation_id,
        token,
    });
}

/// Allocates a new conversation on the provider on every call, so callers
/// must hold on to the result rather than polling.
async fn create_credentials(State(state): State<Arc<IssuerState>>) -> Response {
    match issue(&state).await {
        Ok(credentials) => {
            tracing::debug!(
                conversation_id = credentials.conversation_id.as_str(),
                "credentials issued"
            );
            return (StatusCode::OK, Json(credentials)).into_response();
        }
        Err(err) => {
            tracing::error!(error = ?err, "credential issuance failed");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    message: err.to_string(),
                }),
            )
                .into_response();
        }
    }
}

pub async fn start() -> Result<()> {
    let provider = ProviderManager::get(&Config::get(ConfigKey::Provider))?;
    let spec = ConversationSpec {
        backstory: Config::get(ConfigKey::Backstory),
        model: Config::get(ConfigKey::Model),
    };

    let address = Config::get(ConfigKey::ListenAddress);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = address.as_str(), "token issuance service listening");
    println!("Token issuance service listening on http://{address}");

    axum::serve(listener, build_router(provider, spec)).await?;

    return Ok(());
}
