use actix_session::Session;
use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use url::form_urlencoded;

use crate::{
    entities::contact::ContactForm,
    errors::FieldErrors,
    use_cases::contact::{ContactOutcome, ContactPost, RedirectReason},
    utils::client_info::client_info,
    views::contact_page::{ContactPage, Flash, FlashQuery},
    AppState,
};

const CONTACT_PATH: &str = "/contact";

#[get("/contact")]
pub async fn contact_page(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<FlashQuery>,
) -> HttpResponse {
    let outcome = state.contact_handler.handle(&session, None).await;
    browser_response(&state, &session, outcome, query.flash())
}

#[post("/contact")]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<ContactForm>,
) -> HttpResponse {
    let post = ContactPost {
        form: form.into_inner(),
        client: client_info(&req, state.trust_forwarded_for),
    };
    let outcome = state.contact_handler.handle(&session, Some(post)).await;
    browser_response(&state, &session, outcome, None)
}

fn browser_response(
    state: &AppState,
    session: &Session,
    outcome: ContactOutcome,
    flash: Option<Flash>,
) -> HttpResponse {
    match outcome {
        ContactOutcome::NoAction => {
            let form = state.contact_handler.restore_form(session);
            render(state, session, &form, &FieldErrors::new(), flash, HttpResponse::Ok())
        }
        ContactOutcome::Redirect(reason) => redirect(reason),
        ContactOutcome::RenderWithErrors { form, errors } => {
            render(state, session, &form, &errors, None, HttpResponse::UnprocessableEntity())
        }
    }
}

fn render(
    state: &AppState,
    session: &Session,
    form: &ContactForm,
    errors: &FieldErrors,
    flash: Option<Flash>,
    mut builder: actix_web::HttpResponseBuilder,
) -> HttpResponse {
    let csrf_token = state.contact_handler.issue_csrf_token(session);
    let page = ContactPage {
        site_name: &state.site_name,
        locale: state.contact_handler.locale(),
        form,
        errors,
        csrf_token: &csrf_token,
        flash,
    };

    builder
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(page.render())
}

/// `303 See Other` back to the form with the outcome marker and alert anchor.
pub fn redirect(reason: RedirectReason) -> HttpResponse {
    let (key, value) = reason.query_pair();
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("{}?{}#{}", CONTACT_PATH, query, reason.anchor())))
        .finish()
}
