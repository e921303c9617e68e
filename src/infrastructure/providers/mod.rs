pub mod chatbotkit;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::ProviderBox;
use crate::domain::models::ProviderName;

pub struct ProviderManager {}

impl ProviderManager {
    pub fn get(name: &str) -> Result<ProviderBox> {
        if ProviderName::parse(name) == Some(ProviderName::ChatBotKit) {
            return Ok(Box::<chatbotkit::ChatBotKit>::default());
        }

        bail!(format!("No provider implemented for {name}"))
    }
}
