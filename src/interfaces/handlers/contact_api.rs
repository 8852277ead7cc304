use actix_session::Session;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    api_errors::{api_success, ApiError},
    entities::contact::ContactForm,
    use_cases::contact::{ContactOutcome, ContactPost, RedirectReason},
    utils::client_info::client_info,
    AppState,
};

pub const CSRF_HEADER: &str = "x-csrf-token";

#[post("/contact")]
pub async fn submit_contact_api(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<ContactForm>,
) -> Result<HttpResponse, ApiError> {
    let mut form = body.into_inner();
    if form.csrf_token.as_deref().is_none_or(|t| t.trim().is_empty()) {
        form.csrf_token = req
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
    }

    let post = ContactPost {
        form,
        client: client_info(&req, state.trust_forwarded_for),
    };

    match state.contact_handler.handle(&session, Some(post)).await {
        ContactOutcome::Redirect(reason) if reason.reports_success() => Ok(api_success()),
        ContactOutcome::Redirect(RedirectReason::RateLimited { retry_after_secs }) => {
            Err(ApiError::RateLimited(retry_after_secs))
        }
        ContactOutcome::Redirect(_) => Err(ApiError::MailFailure),
        ContactOutcome::RenderWithErrors { errors, .. } => Err(ApiError::Invalid(errors)),
        ContactOutcome::NoAction => Err(ApiError::BadRequest("Empty submission".into())),
    }
}

/// CSRF token for programmatic callers; sent back as `X-CSRF-Token` or `_token`.
#[get("/contact/token")]
pub async fn contact_token(state: web::Data<AppState>, session: Session) -> HttpResponse {
    let token = state.contact_handler.issue_csrf_token(&session);
    HttpResponse::Ok()
        .insert_header((actix_web::http::header::CACHE_CONTROL, "no-store"))
        .json(json!({ "token": token }))
}
