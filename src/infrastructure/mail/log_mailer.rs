use async_trait::async_trait;

use super::MailTransport;
use crate::{entities::email::OutgoingEmail, errors::MailError};

/// Development transport: logs each message and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to.address,
            reply_to = ?email.reply_to.as_ref().map(|m| m.address.as_str()),
            subject = %email.subject,
            "Mail delivery skipped (log transport)"
        );
        tracing::debug!(text = %email.text, "Mail body");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "log"
    }
}
