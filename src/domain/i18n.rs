use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Language used for every piece of visitor-facing text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::De => write!(f, "de"),
        }
    }
}

/// Labels shown on the contact form.
pub struct FormLabels {
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub message: &'static str,
    pub consent: &'static str,
    pub copy: &'static str,
    pub submit: &'static str,
}

/// Headings used inside notification mails.
pub struct MailWording {
    pub owner_intro: &'static str,
    pub visitor_greeting: &'static str,
    pub visitor_intro: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub message: &'static str,
    pub consent_given: &'static str,
    pub received_at: &'static str,
}

impl Locale {
    pub fn html_lang(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    pub fn blank(self, field: &str) -> &'static str {
        match (self, field) {
            (Locale::En, "name") => "Please enter your name.",
            (Locale::En, "email") => "Please enter your email address.",
            (Locale::En, "message") => "Please enter a message.",
            (Locale::En, _) => "This value should not be blank.",
            (Locale::De, "name") => "Bitte geben Sie Ihren Namen an.",
            (Locale::De, "email") => "Bitte geben Sie Ihre E-Mail-Adresse an.",
            (Locale::De, "message") => "Bitte geben Sie eine Nachricht ein.",
            (Locale::De, _) => "Dieser Wert darf nicht leer sein.",
        }
    }

    pub fn invalid_email(self) -> &'static str {
        match self {
            Locale::En => "Please enter a valid email address.",
            Locale::De => "Bitte geben Sie eine gültige E-Mail-Adresse an.",
        }
    }

    pub fn too_short(self, min: u64) -> String {
        match self {
            Locale::En => format!("Please enter at least {} characters.", min),
            Locale::De => format!("Bitte geben Sie mindestens {} Zeichen ein.", min),
        }
    }

    pub fn too_long(self, max: u64) -> String {
        match self {
            Locale::En => format!("Please use at most {} characters.", max),
            Locale::De => format!("Bitte verwenden Sie höchstens {} Zeichen.", max),
        }
    }

    pub fn consent_required(self) -> &'static str {
        match self {
            Locale::En => "Please agree to the processing of your data.",
            Locale::De => "Bitte stimmen Sie der Datenverarbeitung zu.",
        }
    }

    pub fn invalid_csrf(self) -> &'static str {
        match self {
            Locale::En => "Your session has expired. Please reload the page and try again.",
            Locale::De => "Ihre Sitzung ist abgelaufen. Bitte laden Sie die Seite neu und versuchen Sie es erneut.",
        }
    }

    pub fn invalid_value(self) -> &'static str {
        match self {
            Locale::En => "This value is not valid.",
            Locale::De => "Dieser Wert ist ungültig.",
        }
    }

    pub fn invalid_payload(self) -> &'static str {
        match self {
            Locale::En => "The request body could not be read.",
            Locale::De => "Die Anfrage konnte nicht gelesen werden.",
        }
    }

    pub fn payload_too_large(self) -> &'static str {
        match self {
            Locale::En => "The request body is too large.",
            Locale::De => "Die Anfrage ist zu groß.",
        }
    }

    pub fn flash_success(self) -> &'static str {
        match self {
            Locale::En => "Thank you for your message! We have received your inquiry and will get back to you as soon as possible.",
            Locale::De => "Vielen Dank für Ihre Nachricht! Wir haben Ihre Anfrage erhalten und werden uns so schnell wie möglich bei Ihnen melden.",
        }
    }

    pub fn flash_error(self, reason: &str) -> &'static str {
        match (self, reason) {
            (Locale::En, "mail") => "Unfortunately your message could not be sent. Please try again later or contact us directly by email.",
            (Locale::En, "rate") => "You have sent too many requests in a short time. Please wait a moment before trying again.",
            (Locale::En, _) => "An error occurred. Please try again.",
            (Locale::De, "mail") => "Leider konnte Ihre Nachricht nicht versendet werden. Bitte versuchen Sie es später erneut oder kontaktieren Sie uns direkt per E-Mail.",
            (Locale::De, "rate") => "Sie haben zu viele Anfragen in kurzer Zeit gesendet. Bitte warten Sie einen Moment, bevor Sie es erneut versuchen.",
            (Locale::De, _) => "Ein Fehler ist aufgetreten. Bitte versuchen Sie es erneut.",
        }
    }

    pub fn owner_subject(self, site: &str) -> String {
        match self {
            Locale::En => format!("{} — New contact inquiry", site),
            Locale::De => format!("{} — Neue Kontaktanfrage", site),
        }
    }

    pub fn visitor_subject(self, site: &str) -> String {
        match self {
            Locale::En => format!("{} — Your contact inquiry", site),
            Locale::De => format!("{} — Ihre Kontaktanfrage", site),
        }
    }

    pub fn page_title(self) -> &'static str {
        match self {
            Locale::En => "Contact",
            Locale::De => "Kontakt",
        }
    }

    pub fn form_labels(self) -> FormLabels {
        match self {
            Locale::En => FormLabels {
                name: "Name",
                email: "Email",
                phone: "Phone (optional)",
                message: "Message",
                consent: "I consent to the processing of my details for the purpose of being contacted.",
                copy: "Send me a copy",
                submit: "Send",
            },
            Locale::De => FormLabels {
                name: "Name",
                email: "E-Mail",
                phone: "Telefon (optional)",
                message: "Nachricht",
                consent: "Ich willige in die Verarbeitung meiner Angaben zum Zweck der Kontaktaufnahme ein.",
                copy: "Kopie an mich senden",
                submit: "Absenden",
            },
        }
    }

    pub fn mail_wording(self) -> MailWording {
        match self {
            Locale::En => MailWording {
                owner_intro: "A new inquiry was submitted through the contact form.",
                visitor_greeting: "Hello",
                visitor_intro: "thank you for your message. This is a copy of what you sent us:",
                name: "Name",
                email: "Email",
                phone: "Phone",
                message: "Message",
                consent_given: "Consent to data processing given",
                received_at: "Received",
            },
            Locale::De => MailWording {
                owner_intro: "Über das Kontaktformular ist eine neue Anfrage eingegangen.",
                visitor_greeting: "Hallo",
                visitor_intro: "vielen Dank für Ihre Nachricht. Hier ist eine Kopie Ihrer Angaben:",
                name: "Name",
                email: "E-Mail",
                phone: "Telefon",
                message: "Nachricht",
                consent_given: "Einwilligung zur Datenverarbeitung erteilt",
                received_at: "Eingegangen",
            },
        }
    }
}
