use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use zeroize::Zeroizing;

use super::MailTransport;
use crate::{
    entities::email::{Mailbox, OutgoingEmail},
    errors::MailError,
    settings::AppConfig,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> From<&'a Mailbox> for ApiEmailAddress<'a> {
    fn from(mailbox: &'a Mailbox) -> Self {
        ApiEmailAddress {
            email: &mailbox.address,
            name: mailbox.name.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiSendEmailBody<'a> {
    sender: ApiEmailAddress<'a>,
    to: Vec<ApiEmailAddress<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<ApiEmailAddress<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

/// Transactional mail API client (Brevo-compatible JSON payload).
pub struct HttpApiMailer {
    client: Client,
    endpoint: String,
    api_key: Zeroizing<String>,
}

impl HttpApiMailer {
    pub fn new(endpoint: impl Into<String>, api_key: &str, timeout: Duration) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("unisurf-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpApiMailer {
            client,
            endpoint: endpoint.into(),
            api_key: Zeroizing::new(api_key.to_string()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        Self::new(
            config.mail_api_url.clone(),
            &config.mail_api_key,
            Duration::from_secs(config.mail_timeout_secs),
        )
    }
}

fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

#[async_trait]
impl MailTransport for HttpApiMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let body = ApiSendEmailBody {
            sender: (&email.from).into(),
            to: vec![(&email.to).into()],
            reply_to: email.reply_to.as_ref().map(ApiEmailAddress::from),
            subject: &email.subject,
            html_content: &email.html,
            text_content: &email.text,
        };

        let json = serde_json::to_vec(&body)
            .map_err(|e| MailError::Encoding(format!("Failed to serialize mail payload: {e}")))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", self.api_key.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(json)
            .send()
            .await?;

        let status = response.status().as_u16();
        if is_success_status(status) {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected { status, body })
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}
