use actix_session::Session;
use rand::{distributions::Alphanumeric, Rng};
use subtle::ConstantTimeEq;

const CSRF_SESSION_KEY: &str = "_csrf/contact";
const CSRF_TOKEN_LENGTH: usize = 43;

/// Session-bound CSRF tokens for the contact form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCsrf;

impl SessionCsrf {
    /// Returns the session's token, creating one on first use.
    pub fn issue(&self, session: &Session) -> String {
        if let Some(token) = super::read::<String>(session, CSRF_SESSION_KEY) {
            return token;
        }
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CSRF_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        super::write(session, CSRF_SESSION_KEY, &token);
        token
    }

    pub fn verify(&self, session: &Session, presented: Option<&str>) -> bool {
        let Some(presented) = presented.map(str::trim).filter(|t| !t.is_empty()) else {
            return false;
        };
        match super::read::<String>(session, CSRF_SESSION_KEY) {
            Some(expected) => expected.as_bytes().ct_eq(presented.as_bytes()).into(),
            None => false,
        }
    }
}
