use crate::{
    domain::i18n::Locale,
    entities::{
        contact::ContactSubmission,
        email::{EmailTheme, Mailbox, OutgoingEmail},
    },
    errors::MailError,
    mail::{templates, MailTransport},
};

/// Renders and sends the owner notification and the optional visitor copy.
pub struct ContactNotifier<M>
where
    M: MailTransport,
{
    pub mailer: M,
    sender: Mailbox,
    owner: Mailbox,
    site_name: String,
    locale: Locale,
}

impl<M> ContactNotifier<M>
where
    M: MailTransport,
{
    pub fn new(mailer: M, sender: Mailbox, owner: Mailbox, site_name: impl Into<String>, locale: Locale) -> Self {
        ContactNotifier {
            mailer,
            sender,
            owner,
            site_name: site_name.into(),
            locale,
        }
    }

    /// Builds the message addressed to the site owner, replying to the visitor.
    pub fn owner_message(&self, submission: &ContactSubmission, theme: EmailTheme) -> OutgoingEmail {
        let body = templates::render_owner(submission, &self.site_name, self.locale, theme);
        OutgoingEmail {
            from: self.sender.clone(),
            to: self.owner.clone(),
            reply_to: Some(Mailbox::new(submission.email.clone(), Some(submission.name.clone()))),
            subject: self.locale.owner_subject(&self.site_name),
            text: body.text,
            html: body.html,
        }
    }

    pub fn visitor_message(&self, submission: &ContactSubmission, theme: EmailTheme) -> OutgoingEmail {
        let body = templates::render_visitor(submission, &self.site_name, self.locale, theme);
        OutgoingEmail {
            from: self.sender.clone(),
            to: Mailbox::new(submission.email.clone(), Some(submission.name.clone())),
            reply_to: None,
            subject: self.locale.visitor_subject(&self.site_name),
            text: body.text,
            html: body.html,
        }
    }

    /// Sends the owner mail, then the visitor copy when requested.
    ///
    /// Returns how many messages went out. The first failure stops the
    /// dispatch and is returned to the caller.
    pub async fn send_owner_and_optional_visitor_copy(
        &self,
        submission: &ContactSubmission,
        theme: EmailTheme,
    ) -> Result<usize, MailError> {
        let mut messages = vec![self.owner_message(submission, theme)];
        if submission.copy {
            messages.push(self.visitor_message(submission, theme));
        }

        let mut sent = 0;
        for message in &messages {
            if let Err(e) = self.mailer.send(message).await {
                tracing::error!(
                    transport = self.mailer.kind(),
                    to = %message.to.address,
                    "Contact mail could not be sent: {}", e
                );
                return Err(e);
            }
            sent += 1;
            tracing::info!(
                transport = self.mailer.kind(),
                to = %message.to.address,
                theme = theme.as_str(),
                "Contact mail sent"
            );
        }

        Ok(sent)
    }
}
