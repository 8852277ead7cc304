//! Plain-text and HTML bodies for the two contact notification mails.
//!
//! Owner and visitor mails are rendered by separate functions so their
//! wording and layout can drift apart without touching each other.

use crate::{
    domain::i18n::{Locale, MailWording},
    entities::{contact::ContactSubmission, email::EmailTheme},
    utils::html::escape,
};

/// Colours applied to the HTML variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
}

impl Palette {
    pub fn for_theme(theme: EmailTheme) -> Self {
        match theme {
            EmailTheme::Light => Palette {
                background: "#f4f6f8",
                surface: "#ffffff",
                text: "#1f2933",
                muted: "#616e7c",
                accent: "#0b6bcb",
            },
            EmailTheme::Dark => Palette {
                background: "#0f1419",
                surface: "#1b232c",
                text: "#e4e7eb",
                muted: "#9aa5b1",
                accent: "#4da3ff",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub text: String,
    pub html: String,
}

pub fn render_owner(
    submission: &ContactSubmission,
    site_name: &str,
    locale: Locale,
    theme: EmailTheme,
) -> RenderedBody {
    let w = locale.mail_wording();

    let mut lines = vec![w.owner_intro.to_string(), String::new()];
    lines.extend(fields_text(submission, &w));
    lines.push(format!("{}: {}", w.received_at, received_at(submission)));
    lines.push(String::new());
    lines.extend(message_text(submission, &w));
    lines.extend(signature(site_name));

    let palette = Palette::for_theme(theme);
    let content = [
        format!("<p>{}</p>", escape(w.owner_intro)),
        fields_html(submission, &w, &palette),
        format!(
            r#"<p style="color:{muted};font-size:13px">{label}: {at}</p>"#,
            muted = palette.muted,
            label = escape(w.received_at),
            at = escape(&received_at(submission)),
        ),
        message_html(submission, &w, &palette),
    ]
    .concat();

    RenderedBody {
        text: lines.join("\n"),
        html: wrap_html(&locale.owner_subject(site_name), site_name, locale, &palette, &content),
    }
}

pub fn render_visitor(
    submission: &ContactSubmission,
    site_name: &str,
    locale: Locale,
    theme: EmailTheme,
) -> RenderedBody {
    let w = locale.mail_wording();

    let mut lines = vec![
        format!("{} {},", w.visitor_greeting, submission.name),
        String::new(),
        w.visitor_intro.to_string(),
        String::new(),
    ];
    lines.extend(fields_text(submission, &w));
    lines.push(String::new());
    lines.extend(message_text(submission, &w));
    lines.extend(signature(site_name));

    let palette = Palette::for_theme(theme);
    let content = [
        format!(
            "<p>{} {},</p><p>{}</p>",
            escape(w.visitor_greeting),
            escape(&submission.name),
            escape(w.visitor_intro),
        ),
        fields_html(submission, &w, &palette),
        message_html(submission, &w, &palette),
    ]
    .concat();

    RenderedBody {
        text: lines.join("\n"),
        html: wrap_html(&locale.visitor_subject(site_name), site_name, locale, &palette, &content),
    }
}

fn received_at(submission: &ContactSubmission) -> String {
    submission.created_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn fields_text(submission: &ContactSubmission, w: &MailWording) -> Vec<String> {
    let mut lines = vec![
        format!("{}: {}", w.name, submission.name),
        format!("{}: {}", w.email, submission.email),
    ];
    if let Some(phone) = &submission.phone {
        lines.push(format!("{}: {}", w.phone, phone));
    }
    if submission.consent {
        lines.push(format!("{}: ✓", w.consent_given));
    }
    lines
}

fn message_text(submission: &ContactSubmission, w: &MailWording) -> Vec<String> {
    vec![format!("{}:", w.message), submission.message.clone(), String::new()]
}

fn signature(site_name: &str) -> [String; 2] {
    ["-- ".to_string(), site_name.to_string()]
}

fn fields_html(submission: &ContactSubmission, w: &MailWording, palette: &Palette) -> String {
    let mut rows = vec![
        (w.name, escape(&submission.name)),
        (
            w.email,
            format!(
                r#"<a href="mailto:{0}" style="color:{1}">{0}</a>"#,
                escape(&submission.email),
                palette.accent
            ),
        ),
    ];
    if let Some(phone) = &submission.phone {
        rows.push((w.phone, escape(phone)));
    }
    if submission.consent {
        rows.push((w.consent_given, "&#10003;".to_string()));
    }

    let rows: String = rows
        .into_iter()
        .map(|(label, value)| {
            format!(
                r#"<tr><td style="color:{};padding-right:16px">{}</td><td>{}</td></tr>"#,
                palette.muted,
                escape(label),
                value
            )
        })
        .collect();

    format!(r#"<table role="presentation" cellpadding="4" style="border-collapse:collapse">{}</table>"#, rows)
}

fn message_html(submission: &ContactSubmission, w: &MailWording, palette: &Palette) -> String {
    format!(
        r#"<h3 style="color:{accent};margin-top:24px">{label}</h3><div style="border-left:3px solid {accent};padding-left:12px">{body}</div>"#,
        accent = palette.accent,
        label = escape(w.message),
        body = submission.message_html(),
    )
}

fn wrap_html(title: &str, site_name: &str, locale: Locale, palette: &Palette, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="margin:0;padding:24px;background:{bg};color:{text};font-family:Helvetica,Arial,sans-serif">
<div style="max-width:600px;margin:0 auto;background:{surface};padding:24px;border-radius:8px">
<h2 style="color:{accent};margin-top:0">{site}</h2>
{content}
</div>
</body>
</html>"#,
        lang = locale.html_lang(),
        title = escape(title),
        bg = palette.background,
        text = palette.text,
        surface = palette.surface,
        accent = palette.accent,
        site = escape(site_name),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane <b>Doe</b>".into(),
            email: "jane@example.com".into(),
            phone: None,
            message: "Line one\nLine <two>".into(),
            consent: true,
            copy: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn owner_html_escapes_visitor_input() {
        let body = render_owner(&submission(), "UniSurf", Locale::En, EmailTheme::Light);
        assert!(!body.html.contains("<b>Doe</b>"));
        assert!(body.html.contains(&format!("{}<br>", escape("Line one"))));
        assert!(body.text.contains("Jane <b>Doe</b>"));
    }

    #[test]
    fn dark_theme_changes_colours() {
        let light = render_visitor(&submission(), "UniSurf", Locale::En, EmailTheme::Light);
        let dark = render_visitor(&submission(), "UniSurf", Locale::En, EmailTheme::Dark);
        assert!(dark.html.contains(Palette::for_theme(EmailTheme::Dark).background));
        assert!(!light.html.contains(Palette::for_theme(EmailTheme::Dark).background));
        assert_eq!(light.text, dark.text);
    }

    #[test]
    fn phone_line_only_when_present() {
        let mut s = submission();
        let without = render_owner(&s, "UniSurf", Locale::De, EmailTheme::Light);
        assert!(!without.text.contains("Telefon"));
        s.phone = Some("+49 123".into());
        let with = render_owner(&s, "UniSurf", Locale::De, EmailTheme::Light);
        assert!(with.text.contains("Telefon: +49 123"));
    }

    #[test]
    fn text_body_lists_fields_then_message_then_signature() {
        let body = render_visitor(&submission(), "UniSurf", Locale::En, EmailTheme::Light);
        let lines: Vec<&str> = body.text.lines().collect();
        assert!(lines[0].ends_with("Jane <b>Doe</b>,"));
        let name_at = lines.iter().position(|l| l.ends_with(": Jane <b>Doe</b>")).unwrap();
        let message_at = lines.iter().position(|l| *l == "Line one").unwrap();
        assert!(name_at < message_at);
        assert_eq!(&lines[lines.len() - 2..], ["-- ", "UniSurf"]);
    }
}
