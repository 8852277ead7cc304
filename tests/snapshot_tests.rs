use actix_session::{Session, SessionExt};
use actix_web::test::TestRequest;
use chrono::Utc;
use serde_json::{json, Value};
use unisurf_site::{
    entities::contact::{ContactForm, ContactSnapshot, ContactSubmission},
    session,
    use_cases::snapshot::{self, SNAPSHOT_SESSION_KEY},
};

// Test helper: `Session` exposes its entries but no key-presence check.
trait SessionContainsKey {
    fn contains_key(&self, key: &str) -> bool;
}

impl SessionContainsKey for Session {
    fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }
}

fn new_session() -> Session {
    TestRequest::default().to_http_request().get_session()
}

fn submission(copy: bool) -> ContactSubmission {
    ContactSubmission {
        name: "Erika Mustermann".into(),
        email: "erika@example.com".into(),
        phone: None,
        message: "Bitte um Rückruf wegen eines Surfkurses.".into(),
        consent: true,
        copy,
        created_at: Utc::now(),
    }
}

#[test]
fn restore_returns_what_was_saved_exactly_once() {
    let session = new_session();
    let snap = ContactSnapshot::from(&submission(true));

    snapshot::save(&session, &snap);

    assert_eq!(snapshot::restore(&session), Some(snap));
    assert_eq!(snapshot::restore(&session), None);
}

#[test]
fn save_overwrites_previous_snapshot() {
    let session = new_session();
    snapshot::save(&session, &ContactSnapshot::from(&submission(false)));
    let newer = ContactSnapshot {
        name: "Max".into(),
        ..ContactSnapshot::from(&submission(true))
    };

    snapshot::save(&session, &newer);

    assert_eq!(snapshot::restore(&session), Some(newer));
}

#[test]
fn snapshot_holds_only_the_editable_fields() {
    let session = new_session();
    snapshot::save(&session, &ContactSnapshot::from(&submission(false)));

    let stored: Value = session::read(&session, SNAPSHOT_SESSION_KEY).unwrap();
    let keys: Vec<_> = stored.as_object().unwrap().keys().cloned().collect();

    assert_eq!(keys.len(), 6);
    for key in ["name", "emailAddress", "phone", "message", "consent", "copy"] {
        assert!(keys.iter().any(|k| k == key), "missing {}", key);
    }
}

#[test]
fn malformed_snapshot_is_dropped() {
    let session = new_session();
    session::write(&session, SNAPSHOT_SESSION_KEY, &json!("not an object"));

    assert_eq!(snapshot::restore(&session), None);
    assert!(!session.contains_key(SNAPSHOT_SESSION_KEY));
}

#[test]
fn clear_removes_snapshot() {
    let session = new_session();
    snapshot::save(&session, &ContactSnapshot::from(&submission(false)));

    snapshot::clear(&session);

    assert!(!session.contains_key(SNAPSHOT_SESSION_KEY));
}

#[test]
fn restored_snapshot_prefills_form() {
    let snap = ContactSnapshot::from(&submission(true));

    let form = ContactForm::from(snap);

    assert_eq!(form.name, "Erika Mustermann");
    assert_eq!(form.email, "erika@example.com");
    assert_eq!(form.phone, "");
    assert!(form.consent && form.copy);
    assert!(form.website.is_empty() && form.emailrep.is_empty());
}
