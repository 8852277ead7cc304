use serde::{Deserialize, Serialize};

/// Session key written by the site-wide theme preference.
pub const THEME_SESSION_KEY: &str = "theme";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mailbox {
    pub fn new(address: impl Into<String>, name: Option<String>) -> Self {
        Mailbox {
            address: address.into(),
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// A fully rendered message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Visual theme of rendered mails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailTheme {
    #[default]
    Light,
    Dark,
}

impl EmailTheme {
    /// Maps a stored preference; `system`, unknown values and absence are light.
    pub fn from_preference(preference: Option<&str>) -> Self {
        match preference {
            Some("dark") => EmailTheme::Dark,
            _ => EmailTheme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmailTheme::Light => "light",
            EmailTheme::Dark => "dark",
        }
    }
}

/// Preference accepted by the theme endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}
