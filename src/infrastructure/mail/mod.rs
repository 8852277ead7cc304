use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{entities::email::OutgoingEmail, errors::MailError};

pub mod http_api;
pub mod log_mailer;
pub mod templates;

/// Delivers one rendered message. Failures are returned, never swallowed.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    fn kind(&self) -> &'static str;
}

#[async_trait]
impl<T> MailTransport for Arc<T>
where
    T: MailTransport + ?Sized,
{
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        (**self).send(email).await
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Writes messages to the log instead of delivering them.
    #[default]
    Log,
    /// Posts messages to a transactional mail HTTP API.
    Http,
}
