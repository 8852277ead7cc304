use std::collections::BTreeMap;
use std::fmt;

use derive_more::Display;
use serde::Serialize;

/// Failures of the submission store. Callers log them and carry on.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("Database error: {_0}")]
    DatabaseError(String),
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Mail transport failed: {_0}")]
    Transport(String),

    #[display("Mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[display("Mail payload could not be encoded: {_0}")]
    Encoding(String),
}

impl std::error::Error for MailError {}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum SessionError {
    #[display("Session backend unavailable: {_0}")]
    Backend(String),

    #[display("Session secret is unusable: {_0}")]
    InvalidKey(String),
}

impl std::error::Error for SessionError {}

/// Field name to ordered, human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .0
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}:{}", field, m)))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "validation error: {}", messages)
    }
}
