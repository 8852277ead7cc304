use actix_session::Session;
use chrono::{DateTime, Utc};

use crate::{
    domain::i18n::Locale,
    entities::{
        contact::{ClientInfo, ContactForm, ContactSnapshot, ContactSubmission, SubmissionMetadata, CSRF_FIELD},
        email::{EmailTheme, THEME_SESSION_KEY},
    },
    errors::FieldErrors,
    limiter::rate_limiter::{RateLimitPolicy, SubmissionWindow, RATE_SESSION_KEY},
    mail::MailTransport,
    repositories::contact::ContactRepository,
    session::{self, csrf::SessionCsrf},
    use_cases::{honeypot, notifier::ContactNotifier, snapshot},
};

/// A submitted form together with what the transport layer knows about its sender.
#[derive(Debug, Clone)]
pub struct ContactPost {
    pub form: ContactForm,
    pub client: ClientInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    Success,
    /// Honeypot hit. Rendered exactly like [`RedirectReason::Success`].
    FakeSuccess,
    RateLimited { retry_after_secs: u64 },
    MailFailure,
}

impl RedirectReason {
    /// Whether the sender is told the inquiry was accepted.
    pub fn reports_success(&self) -> bool {
        matches!(self, RedirectReason::Success | RedirectReason::FakeSuccess)
    }

    /// Query marker appended to the redirect target.
    pub fn query_pair(&self) -> (&'static str, &'static str) {
        match self {
            RedirectReason::Success | RedirectReason::FakeSuccess => ("submit", "1"),
            RedirectReason::RateLimited { .. } => ("error", "rate"),
            RedirectReason::MailFailure => ("error", "mail"),
        }
    }

    pub fn anchor(&self) -> &'static str {
        if self.reports_success() {
            "contact-success"
        } else {
            "contact-error"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactOutcome {
    /// Not a submission; render the (possibly prefilled) form.
    NoAction,
    Redirect(RedirectReason),
    /// Validation failed; re-render with the submitted values and errors.
    RenderWithErrors { form: ContactForm, errors: FieldErrors },
}

pub struct ContactHandler<R, M>
where
    R: ContactRepository,
    M: MailTransport,
{
    pub contact_repo: R,
    pub notifier: ContactNotifier<M>,
    pub policy: RateLimitPolicy,
    csrf: SessionCsrf,
    locale: Locale,
}

impl<R, M> ContactHandler<R, M>
where
    R: ContactRepository,
    M: MailTransport,
{
    pub fn new(contact_repo: R, notifier: ContactNotifier<M>, policy: RateLimitPolicy, locale: Locale) -> Self {
        ContactHandler {
            contact_repo,
            notifier,
            policy,
            csrf: SessionCsrf,
            locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Token the next submission from this session must present.
    pub fn issue_csrf_token(&self, session: &Session) -> String {
        self.csrf.issue(session)
    }

    /// Values to prefill the form with; consumes any stored snapshot.
    pub fn restore_form(&self, session: &Session) -> ContactForm {
        snapshot::restore(session).map(ContactForm::from).unwrap_or_default()
    }

    pub async fn handle(&self, session: &Session, post: Option<ContactPost>) -> ContactOutcome {
        self.handle_at(session, post, Utc::now()).await
    }

    /// Runs one contact interaction against a fixed clock.
    pub async fn handle_at(
        &self,
        session: &Session,
        post: Option<ContactPost>,
        now: DateTime<Utc>,
    ) -> ContactOutcome {
        let Some(ContactPost { form, client }) = post else {
            return ContactOutcome::NoAction;
        };
        let now_secs = now.timestamp();

        // A snapshot only prefills the render right after it was taken.
        snapshot::clear(session);

        let stored_window = session::read::<SubmissionWindow>(session, RATE_SESSION_KEY).unwrap_or_default();
        let mut window = stored_window.clone();
        let decision = window.admit(&self.policy, now_secs);
        if window != stored_window {
            session::write(session, RATE_SESSION_KEY, &window);
        }
        if let Some(retry_after_secs) = decision.retry_after_secs() {
            tracing::warn!(
                ip = client.ip.as_deref().unwrap_or("-"),
                retry_after_secs,
                "Contact submission rate limited"
            );
            return ContactOutcome::Redirect(RedirectReason::RateLimited { retry_after_secs });
        }

        if honeypot::is_spam(&form) {
            self.tick(session, &mut window, now_secs);
            tracing::warn!(
                ip = client.ip.as_deref().unwrap_or("-"),
                "Contact submission caught by honeypot"
            );
            return ContactOutcome::Redirect(RedirectReason::FakeSuccess);
        }

        let submission = match self.validate(session, &form, now) {
            Ok(submission) => submission,
            Err(errors) => {
                tracing::info!(fields = %errors.fields().collect::<Vec<_>>().join(","), "Contact form invalid");
                return ContactOutcome::RenderWithErrors {
                    form: echo_form(&form),
                    errors,
                };
            }
        };

        snapshot::save(session, &ContactSnapshot::from(&submission));

        let metadata = SubmissionMetadata::capture(&client, now);
        self.persist_best_effort(&submission, &metadata).await;

        let theme = EmailTheme::from_preference(session::read::<String>(session, THEME_SESSION_KEY).as_deref());
        match self
            .notifier
            .send_owner_and_optional_visitor_copy(&submission, theme)
            .await
        {
            Ok(sent) => {
                snapshot::clear(session);
                self.tick(session, &mut window, now_secs);
                tracing::info!(messages = sent, copy = submission.copy, "Contact submission accepted");
                ContactOutcome::Redirect(RedirectReason::Success)
            }
            Err(_) => {
                tracing::warn!("Contact submission kept in session after mail failure");
                ContactOutcome::Redirect(RedirectReason::MailFailure)
            }
        }
    }

    /// Field rules plus the session-bound CSRF token, reported under `_token`.
    fn validate(
        &self,
        session: &Session,
        form: &ContactForm,
        now: DateTime<Utc>,
    ) -> Result<ContactSubmission, FieldErrors> {
        let csrf_ok = self.csrf.verify(session, form.csrf_token.as_deref());

        match (form.validate_submission(self.locale, now), csrf_ok) {
            (Ok(submission), true) => Ok(submission),
            (Ok(_), false) => {
                let mut errors = FieldErrors::new();
                errors.add(CSRF_FIELD, self.locale.invalid_csrf());
                Err(errors)
            }
            (Err(mut errors), csrf_ok) => {
                if !csrf_ok {
                    errors.add(CSRF_FIELD, self.locale.invalid_csrf());
                }
                Err(errors)
            }
        }
    }

    /// Storage is an audit trail only: failures are logged and never surface.
    async fn persist_best_effort(&self, submission: &ContactSubmission, metadata: &SubmissionMetadata) {
        match self.contact_repo.insert_submission(submission, metadata).await {
            Ok(id) => tracing::debug!(%id, store = self.contact_repo.kind(), "Contact submission stored"),
            Err(e) => tracing::error!(store = self.contact_repo.kind(), "Contact form database error: {}", e),
        }
    }

    fn tick(&self, session: &Session, window: &mut SubmissionWindow, now_secs: i64) {
        window.tick(&self.policy, now_secs);
        session::write(session, RATE_SESSION_KEY, &*window);
    }
}

/// Submitted values as they are shown again, without token or decoys.
fn echo_form(form: &ContactForm) -> ContactForm {
    ContactForm {
        emailrep: String::new(),
        website: String::new(),
        csrf_token: None,
        ..form.normalized()
    }
}
