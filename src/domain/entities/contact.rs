use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::{domain::i18n::Locale, errors::FieldErrors};

// ───── Constants ──────────────────────────────────────────────────────
pub const MAX_NAME_LENGTH: u64 = 120;
pub const MAX_EMAIL_LENGTH: u64 = 200;
pub const MAX_PHONE_LENGTH: u64 = 40;
pub const MIN_MESSAGE_LENGTH: u64 = 10;
pub const MAX_MESSAGE_LENGTH: u64 = 5000;

const MAX_IP_LENGTH: usize = 64;
const MAX_USER_AGENT_LENGTH: usize = 400;
const MAX_TIME_LENGTH: usize = 40;
const MAX_HOST_LENGTH: usize = 200;

pub const CSRF_FIELD: &str = "_token";


// ───── Request Models ────────────────────────────────────────────────

/// Raw contact form input, shared by the browser form and the JSON API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "nullable_text")]
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_NAME_LENGTH)
    )]
    pub name: String,

    #[serde(default, deserialize_with = "nullable_text")]
    #[validate(
        custom(function = "email_address"),
        length(max = MAX_EMAIL_LENGTH)
    )]
    pub email: String,

    #[serde(default, deserialize_with = "nullable_text")]
    #[validate(length(max = MAX_PHONE_LENGTH))]
    pub phone: String,

    #[serde(default, deserialize_with = "nullable_text")]
    #[validate(
        custom(function = "not_blank"),
        length(min = MIN_MESSAGE_LENGTH, max = MAX_MESSAGE_LENGTH)
    )]
    pub message: String,

    #[serde(default, deserialize_with = "checkbox")]
    #[validate(custom(function = "must_be_true"))]
    pub consent: bool,

    #[serde(default, deserialize_with = "checkbox")]
    pub copy: bool,

    /// Decoy mapped onto the form model; real visitors never see it.
    #[serde(default, deserialize_with = "nullable_text")]
    pub emailrep: String,

    /// Unmapped decoy field.
    #[serde(default, deserialize_with = "nullable_text")]
    pub website: String,

    #[serde(default, rename = "_token", skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

impl ContactForm {
    /// Trims every text field the way the browser form would.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            message: self.message.trim().to_string(),
            ..self.clone()
        }
    }

    /// Validates the form and builds the submission entity.
    ///
    /// Returns the localized messages per field when any constraint fails.
    /// This never performs I/O.
    pub fn validate_submission(
        &self,
        locale: Locale,
        created_at: DateTime<Utc>,
    ) -> Result<ContactSubmission, FieldErrors> {
        let form = self.normalized();

        if let Err(errors) = form.validate() {
            return Err(localize(&errors, locale));
        }

        Ok(ContactSubmission {
            name: form.name,
            email: form.email,
            phone: (!form.phone.is_empty()).then_some(form.phone),
            message: form.message,
            consent: form.consent,
            copy: form.copy,
            created_at,
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn email_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !value.validate_email() {
        return Err(ValidationError::new("email"));
    }
    Ok(())
}

fn must_be_true(value: &bool) -> Result<(), ValidationError> {
    if !*value {
        return Err(ValidationError::new("consent"));
    }
    Ok(())
}

/// Turns validator codes into visitor-facing messages.
fn localize(errors: &ValidationErrors, locale: Locale) -> FieldErrors {
    let mut field_errors = FieldErrors::new();

    for (field, errors) in errors.field_errors() {
        let field = field.to_string();
        for error in errors.iter() {
            let message = match error.code.as_ref() {
                "blank" => locale.blank(&field).to_string(),
                "email" => locale.invalid_email().to_string(),
                "consent" => locale.consent_required().to_string(),
                "length" => length_message(error, locale),
                _ => locale.invalid_value().to_string(),
            };
            field_errors.add(field.clone(), message);
        }
    }

    field_errors
}

fn length_message(error: &ValidationError, locale: Locale) -> String {
    let actual = error
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .map(|v| v.chars().count() as u64)
        .unwrap_or(0);
    let min = error.params.get("min").and_then(|v| v.as_u64());
    let max = error.params.get("max").and_then(|v| v.as_u64());

    match (min, max) {
        (Some(min), _) if actual < min => locale.too_short(min),
        (_, Some(max)) => locale.too_long(max),
        (Some(min), None) => locale.too_short(min),
        (None, None) => locale.invalid_value().to_string(),
    }
}

/// JSON `null` reads as an empty field, like an omitted one.
fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts JSON booleans as well as the strings browsers send for checkboxes.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct CheckboxVisitor;

    impl<'de> de::Visitor<'de> for CheckboxVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a boolean or a checkbox value")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "on" | "true" | "yes"
            ))
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<bool, D2::Error> {
            d.deserialize_any(CheckboxVisitor)
        }
    }

    deserializer.deserialize_any(CheckboxVisitor)
}


// ───── Domain Models ─────────────────────────────────────────────────

/// A visitor inquiry that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub consent: bool,
    pub copy: bool,
    pub created_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Message escaped for HTML with line breaks preserved.
    pub fn message_html(&self) -> String {
        crate::utils::html::nl2br(&self.message)
    }
}

/// Request-level details the handler knows about the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub host: Option<String>,
}

/// Provenance stored next to each accepted submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionMetadata {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub time: Option<String>,
    pub host: Option<String>,
}

impl SubmissionMetadata {
    pub fn capture(client: &ClientInfo, at: DateTime<Utc>) -> Self {
        SubmissionMetadata {
            ip: clip(client.ip.as_deref(), MAX_IP_LENGTH),
            user_agent: clip(client.user_agent.as_deref(), MAX_USER_AGENT_LENGTH),
            time: clip(
                Some(&at.to_rfc3339_opts(SecondsFormat::Secs, false)),
                MAX_TIME_LENGTH,
            ),
            host: clip(client.host.as_deref(), MAX_HOST_LENGTH),
        }
    }
}

fn clip(value: Option<&str>, max: usize) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(max).collect())
}

/// The six editable fields kept in the session across a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "emailAddress")]
    pub email_address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub consent: bool,
    #[serde(default)]
    pub copy: bool,
}

impl From<&ContactSubmission> for ContactSnapshot {
    fn from(submission: &ContactSubmission) -> Self {
        ContactSnapshot {
            name: submission.name.clone(),
            email_address: submission.email.clone(),
            phone: submission.phone.clone().unwrap_or_default(),
            message: submission.message.clone(),
            consent: submission.consent,
            copy: submission.copy,
        }
    }
}

impl From<ContactSnapshot> for ContactForm {
    fn from(snapshot: ContactSnapshot) -> Self {
        ContactForm {
            name: snapshot.name,
            email: snapshot.email_address,
            phone: snapshot.phone,
            message: snapshot.message,
            consent: snapshot.consent,
            copy: snapshot.copy,
            ..ContactForm::default()
        }
    }
}
