use super::Messenger;
use crate::config::WhatsAppMessengerConfig;
use crate::reminder::ReminderMessage;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// WhatsApp Business Cloud API messenger.
///
/// Each technician's summary goes to the number configured for them in
/// `recipients`. A technician with no number is a delivery error.
#[derive(Clone)]
pub struct WhatsAppMessenger {
    api_base: String,
    access_token: String,
    phone_number_id: String,
    recipients: HashMap<String, String>,
    default_country_code: Option<String>,
    client: reqwest::Client,
}

impl WhatsAppMessenger {
    pub fn new(config: &WhatsAppMessengerConfig) -> Self {
        let recipients = config
            .recipients
            .iter()
            .map(|(tech, number)| (tech.trim().to_lowercase(), number.clone()))
            .collect();
        Self {
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            access_token: config.access_token.clone(),
            phone_number_id: config.phone_number_id.clone(),
            recipients,
            default_country_code: config.default_country_code.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve the API `to` value for a technician key, if one is configured.
    fn recipient_for(&self, technician_key: &str) -> Option<String> {
        let raw = self.recipients.get(technician_key)?;
        let digits: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        let digits = digits.strip_prefix('+').unwrap_or(&digits).to_owned();
        if digits.is_empty() {
            return None;
        }
        match (&self.default_country_code, digits.strip_prefix('0')) {
            (Some(cc), Some(rest)) => Some(format!("{cc}{rest}")),
            _ => Some(digits),
        }
    }
}

#[async_trait]
impl Messenger for WhatsAppMessenger {
    fn id(&self) -> &'static str {
        "whatsapp"
    }

    async fn deliver(&self, message: &ReminderMessage) -> anyhow::Result<()> {
        if self.access_token.trim().is_empty() {
            anyhow::bail!("whatsapp access token is empty");
        }
        if self.phone_number_id.trim().is_empty() {
            anyhow::bail!("whatsapp phone_number_id is empty");
        }
        let Some(to) = self.recipient_for(&message.technician_id.key()) else {
            anyhow::bail!(
                "no whatsapp recipient configured for technician {}",
                message.technician_id
            );
        };

        let url = format!("{}/{}/messages", self.api_base, self.phone_number_id);
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": message.body
            }
        });
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("whatsapp send failed ({status}): {body}");
        }

        debug!(technician = %message.technician_id, to = %to, "whatsapp summary sent");
        Ok(())
    }
}
