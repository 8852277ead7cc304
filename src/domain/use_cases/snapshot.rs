//! Keeps the submitted field values across the post/redirect/get cycle.

use actix_session::Session;

use crate::{entities::contact::ContactSnapshot, session};

pub const SNAPSHOT_SESSION_KEY: &str = "cf_data";

/// Overwrites any earlier snapshot.
pub fn save(session: &Session, snapshot: &ContactSnapshot) {
    session::write(session, SNAPSHOT_SESSION_KEY, snapshot);
}

/// Reads the snapshot and removes it, so only the next render sees it.
pub fn restore(session: &Session) -> Option<ContactSnapshot> {
    session::take(session, SNAPSHOT_SESSION_KEY)
}

pub fn clear(session: &Session) {
    session.remove(SNAPSHOT_SESSION_KEY);
}
