use crate::entities::contact::ContactForm;

/// True when either decoy field carries anything besides whitespace.
pub fn is_spam(form: &ContactForm) -> bool {
    !form.website.trim().is_empty() || !form.emailrep.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_decoys_pass() {
        let form = ContactForm {
            website: "   ".into(),
            emailrep: "\t\n".into(),
            ..ContactForm::default()
        };
        assert!(!is_spam(&form));
    }

    #[test]
    fn either_decoy_trips() {
        let website = ContactForm {
            website: "http://spam.example".into(),
            ..ContactForm::default()
        };
        let emailrep = ContactForm {
            emailrep: "bot@example.com".into(),
            ..ContactForm::default()
        };
        assert!(is_spam(&website));
        assert!(is_spam(&emailrep));
    }
}
