#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Credentials;
use crate::domain::models::Issuer;

/// Client for the token issuance service. One GET, no payload; the
/// response is a fresh conversation id and its short-lived token, so this
/// must only be called when the session actually needs credentials.
pub struct RemoteIssuer {
    url: String,
}

impl Default for RemoteIssuer {
    fn default() -> RemoteIssuer {
        return RemoteIssuer {
            url: Config::get(ConfigKey::IssuerUrl),
        };
    }
}

#[async_trait]
impl Issuer for RemoteIssuer {
    #[allow(clippy::implicit_return)]
    async fn issue(&self) -> Result<Credentials> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/create", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "credential issuance failed");
            bail!("Cannot start conversation");
        }

        let credentials = res.json::<Credentials>().await?;
        return Ok(credentials);
    }
}
