use actix_session::Session;
use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    entities::email::{ThemePreference, THEME_SESSION_KEY},
    session,
};

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: ThemePreference,
}

/// Remembers the visitor's colour scheme; notification mails follow it.
#[post("/theme")]
pub async fn set_theme(session: Session, body: web::Json<ThemeRequest>) -> HttpResponse {
    let theme = body.theme.as_str();
    session::write(&session, THEME_SESSION_KEY, &theme);

    HttpResponse::Ok().json(json!({
        "status": "success",
        "theme": theme,
    }))
}
