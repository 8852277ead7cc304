use serde::Deserialize;

use crate::{
    domain::i18n::Locale,
    entities::contact::{ContactForm, CSRF_FIELD, MAX_EMAIL_LENGTH, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH, MAX_PHONE_LENGTH},
    errors::FieldErrors,
    utils::html::escape,
};

/// Query markers left by the post/redirect/get cycle.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub submit: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success,
    Error(String),
}

impl FlashQuery {
    pub fn flash(&self) -> Option<Flash> {
        if self.submit.as_deref() == Some("1") {
            return Some(Flash::Success);
        }
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| Flash::Error(e.to_string()))
    }
}

pub struct ContactPage<'a> {
    pub site_name: &'a str,
    pub locale: Locale,
    pub form: &'a ContactForm,
    pub errors: &'a FieldErrors,
    pub csrf_token: &'a str,
    pub flash: Option<Flash>,
}

impl ContactPage<'_> {
    pub fn render(&self) -> String {
        let labels = self.locale.form_labels();
        let mut body = String::new();

        match &self.flash {
            Some(Flash::Success) => {
                body.push_str(&format!(
                    r#"<div id="contact-success" class="alert alert-success" role="status">{}</div>"#,
                    escape(self.locale.flash_success())
                ));
            }
            Some(Flash::Error(reason)) => {
                body.push_str(&format!(
                    r#"<div id="contact-error" class="alert alert-error" role="alert">{}</div>"#,
                    escape(self.locale.flash_error(reason))
                ));
            }
            None => {}
        }

        body.push_str(r#"<form method="post" action="/contact" novalidate>"#);
        body.push_str(&format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            CSRF_FIELD,
            escape(self.csrf_token)
        ));
        self.field_errors(&mut body, CSRF_FIELD);

        self.text_input(&mut body, "name", "text", labels.name, &self.form.name, MAX_NAME_LENGTH, true);
        self.text_input(&mut body, "email", "email", labels.email, &self.form.email, MAX_EMAIL_LENGTH, true);
        self.text_input(&mut body, "phone", "tel", labels.phone, &self.form.phone, MAX_PHONE_LENGTH, false);

        body.push_str(&format!(
            r#"<div class="field"><label for="message">{label}</label><textarea id="message" name="message" rows="6" maxlength="{max}" required>{value}</textarea>"#,
            label = escape(labels.message),
            max = MAX_MESSAGE_LENGTH,
            value = escape(&self.form.message),
        ));
        self.field_errors(&mut body, "message");
        body.push_str("</div>");

        // Decoys: hidden from people, tempting for bots.
        body.push_str(
            r#"<div class="hp" aria-hidden="true" style="position:absolute;left:-10000px"><input type="text" name="website" tabindex="-1" autocomplete="off" value=""><input type="text" name="emailrep" tabindex="-1" autocomplete="off" value=""></div>"#,
        );

        self.checkbox(&mut body, "consent", labels.consent, self.form.consent);
        self.checkbox(&mut body, "copy", labels.copy, self.form.copy);

        body.push_str(&format!(r#"<button type="submit">{}</button></form>"#, escape(labels.submit)));

        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title} | {site}</title></head>
<body>
<main>
<section id="contact">
<h1>{title}</h1>
{body}
</section>
</main>
</body>
</html>"#,
            lang = self.locale.html_lang(),
            title = escape(self.locale.page_title()),
            site = escape(self.site_name),
            body = body,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn text_input(&self, out: &mut String, name: &str, kind: &str, label: &str, value: &str, max: u64, required: bool) {
        let invalid = if self.errors.contains(name) { r#" aria-invalid="true""# } else { "" };
        out.push_str(&format!(
            r#"<div class="field"><label for="{name}">{label}</label><input id="{name}" type="{kind}" name="{name}" value="{value}" maxlength="{max}"{required}{invalid}>"#,
            label = escape(label),
            value = escape(value),
            required = if required { " required" } else { "" },
        ));
        self.field_errors(out, name);
        out.push_str("</div>");
    }

    fn checkbox(&self, out: &mut String, name: &str, label: &str, checked: bool) {
        out.push_str(&format!(
            r#"<div class="field field-checkbox"><label><input type="checkbox" name="{name}" value="1"{checked}> {label}</label>"#,
            checked = if checked { " checked" } else { "" },
            label = escape(label),
        ));
        self.field_errors(out, name);
        out.push_str("</div>");
    }

    fn field_errors(&self, out: &mut String, field: &str) {
        let messages = self.errors.get(field);
        if messages.is_empty() {
            return;
        }
        out.push_str(&format!(r#"<ul class="errors" data-field="{}">"#, field));
        for message in messages {
            out.push_str(&format!("<li>{}</li>", escape(message)));
        }
        out.push_str("</ul>");
    }
}
