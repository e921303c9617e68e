use anyhow::Result;
use async_trait::async_trait;

use super::Credentials;

pub type IssuerBox = Box<dyn Issuer + Send + Sync>;

/// Exchange point for conversation credentials. The chat view never sees
/// the long-lived provider secret; it asks an issuer for a fresh
/// conversation and short-lived token instead.
#[async_trait]
pub trait Issuer {
    async fn issue(&self) -> Result<Credentials>;
}
