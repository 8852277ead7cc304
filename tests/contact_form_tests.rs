
use reqwest::StatusCode;
use test_utils::*;
use unisurf_site::utils::html::escape;

const SUCCESS_LOCATION: &str = "/contact?submit=1#contact-success";

#[actix_rt::test]
async fn contact_page_renders_form_with_csrf_token() {
    let app = TestApp::spawn().await;

    let html = app.get_contact_page().await;

    assert!(html.contains(r#"<form method="post" action="/contact""#));
    assert!(html.contains(r#"name="website""#));
    assert!(html.contains(r#"name="emailrep""#));
    let token = csrf_from_html(&html).unwrap();
    assert_eq!(token.len(), 43);
    assert!(!html.contains("contact-success"));
}

#[actix_rt::test]
async fn csrf_token_is_stable_within_a_session() {
    let app = TestApp::spawn().await;

    let first = app.form_token().await;
    let second = app.form_token().await;

    assert_eq!(first, second);
}

#[actix_rt::test]
async fn valid_submission_redirects_to_success_and_notifies_owner() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;

    let response = app.post_form(&valid_fields(&token)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), SUCCESS_LOCATION);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.address, OWNER_ADDRESS);
    assert_eq!(sent[0].from.address, SENDER_ADDRESS);
    assert_eq!(sent[0].reply_to.as_ref().unwrap().address, "john@example.com");
    assert_eq!(sent[0].subject, "UniSurf — New contact inquiry");
    assert!(!sent[0].text.is_empty());
    assert!(!sent[0].html.is_empty());

    let stored = app.repo.submissions();
    assert_eq!(stored.len(), 1);
    let submission = &stored[0].submission;
    assert_eq!(submission.name, "John Doe");
    assert_eq!(submission.email, "john@example.com");
    assert_eq!(submission.phone.as_deref(), Some("+49 123 456789"));
    assert_eq!(submission.message, "This is a valid test message with more than 10 characters");
    assert!(submission.consent);
    assert!(!submission.copy);

    let metadata = &stored[0].metadata;
    assert_eq!(metadata.ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(metadata.user_agent.as_deref(), Some("unisurf-tests/1.0"));
    assert!(metadata.time.is_some());
    assert!(metadata.host.as_deref().unwrap_or_default().starts_with("127.0.0.1"));
}

#[actix_rt::test]
async fn requesting_a_copy_sends_a_second_mail_to_the_visitor() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    let mut fields = valid_fields(&token);
    fields.push(("copy", "1"));

    let response = app.post_form(&fields).await;

    assert_eq!(location(&response), SUCCESS_LOCATION);
    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to.address, OWNER_ADDRESS);
    assert_eq!(sent[1].to.address, "john@example.com");
    assert_eq!(sent[1].subject, "UniSurf — Your contact inquiry");
    assert!(sent[1].reply_to.is_none());
}

#[actix_rt::test]
async fn success_flash_is_rendered_after_redirect() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    app.post_form(&valid_fields(&token)).await;

    let html = app.get_contact_page_with_query("?submit=1").await;

    assert!(html.contains(r#"id="contact-success""#));
    // Snapshot cleared on success: nothing is prefilled.
    assert!(html.contains(r#"name="name" value="""#));
}

#[actix_rt::test]
async fn honeypot_submission_looks_successful_but_has_no_side_effects() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    let mut fields = valid_fields(&token);
    fields.push(("website", "http://spam.example"));

    let response = app.post_form(&fields).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), SUCCESS_LOCATION);
    assert!(app.mailer.sent().is_empty());
    assert!(app.repo.is_empty());

    // The trapped attempt still counted against the rate window.
    let response = app.post_form(&valid_fields(&token)).await;
    assert_eq!(location(&response), "/contact?error=rate#contact-error");
    assert!(app.mailer.sent().is_empty());
}

#[actix_rt::test]
async fn mapped_decoy_field_also_trips_the_honeypot() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    let mut fields = valid_fields(&token);
    fields.push(("emailrep", "bot@spam.example"));

    let response = app.post_form(&fields).await;

    assert_eq!(location(&response), SUCCESS_LOCATION);
    assert!(app.mailer.sent().is_empty());
    assert!(app.repo.is_empty());
}

#[actix_rt::test]
async fn spam_with_invalid_fields_never_reveals_validation_errors() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;

    let response = app
        .post_form(&[("_token", token.as_str()), ("website", "x"), ("message", "short")])
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), SUCCESS_LOCATION);
}

#[actix_rt::test]
async fn back_to_back_submissions_are_rate_limited() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;

    let first = app.post_form(&valid_fields(&token)).await;
    let second = app.post_form(&valid_fields(&token)).await;

    assert_eq!(location(&first), SUCCESS_LOCATION);
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&second), "/contact?error=rate#contact-error");
    assert_eq!(app.mailer.sent().len(), 1);
    assert_eq!(app.repo.len(), 1);

    let html = app.get_contact_page_with_query("?error=rate").await;
    assert!(html.contains(r#"id="contact-error""#));
}

#[actix_rt::test]
async fn sessions_are_rate_limited_independently() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    app.post_form(&valid_fields(&token)).await;

    let other = TestApp {
        client: reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap(),
        address: app.address.clone(),
        repo: app.repo.clone(),
        mailer: app.mailer.clone(),
        config: app.config.clone(),
    };
    let other_token = other.form_token().await;
    let response = other.post_form(&valid_fields(&other_token)).await;

    assert_eq!(location(&response), SUCCESS_LOCATION);
    assert_eq!(app.mailer.sent().len(), 2);
}

#[actix_rt::test]
async fn invalid_submission_is_rerendered_with_field_errors() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;

    let response = app
        .post_form(&[
            ("_token", token.as_str()),
            ("name", "John Doe"),
            ("email", "not-an-email"),
            ("message", "too short"),
        ])
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"data-field="email""#));
    assert!(html.contains(r#"data-field="message""#));
    assert!(html.contains(r#"data-field="consent""#));
    assert!(!html.contains(r#"data-field="name""#));
    // Submitted values are echoed back.
    assert!(html.contains(&format!(r#"value="{}""#, escape("John Doe"))));
    assert!(app.mailer.sent().is_empty());
    assert!(app.repo.is_empty());

    // No snapshot was written for an invalid form.
    let html = app.get_contact_page().await;
    assert!(html.contains(r#"name="name" value="""#));
}

#[actix_rt::test]
async fn submission_without_csrf_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.get_contact_page().await;
    let fields: Vec<_> = valid_fields("").into_iter().filter(|(k, _)| *k != "_token").collect();

    let response = app.post_form(&fields).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"data-field="_token""#));
    assert!(app.mailer.sent().is_empty());
}

#[actix_rt::test]
async fn forged_csrf_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.get_contact_page().await;

    let response = app.post_form(&valid_fields("forged-token")).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.repo.is_empty());
}

#[actix_rt::test]
async fn mail_failure_keeps_the_form_for_one_more_render() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    app.mailer.set_failing(true);

    let response = app.post_form(&valid_fields(&token)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contact?error=mail#contact-error");
    // Persistence is attempted before the mail and survives its failure.
    assert_eq!(app.repo.len(), 1);

    let html = app.get_contact_page_with_query("?error=mail").await;
    assert!(html.contains(r#"id="contact-error""#));
    assert!(html.contains(&format!(r#"name="name" value="{}""#, escape("John Doe"))));
    assert!(html.contains(&format!(r#"name="email" value="{}""#, escape("john@example.com"))));
    assert!(html.contains(&format!(r#"name="phone" value="{}""#, escape("+49 123 456789"))));
    assert!(html.contains(&escape("This is a valid test message with more than 10 characters")));
    assert!(html.contains(r#"name="consent" value="1" checked"#));

    // Read destroys: the following render is blank again.
    let html = app.get_contact_page().await;
    assert!(html.contains(r#"name="name" value="""#));
}

#[actix_rt::test]
async fn stale_snapshot_is_dropped_by_the_next_post() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    app.mailer.set_failing(true);
    app.post_form(&valid_fields(&token)).await;

    // The visitor never follows the redirect and posts again straight away.
    let response = app
        .post_form(&[("_token", token.as_str()), ("name", "Someone Else"), ("email", "nope")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains(&format!(r#"name="name" value="{}""#, escape("Someone Else"))));

    let html = app.get_contact_page().await;
    assert!(html.contains(r#"name="name" value="""#));
    assert!(!html.contains(&escape("John Doe")));
}

#[actix_rt::test]
async fn failed_mail_does_not_count_against_the_rate_window() {
    let app = TestApp::spawn().await;
    let token = app.form_token().await;
    app.mailer.set_failing(true);
    app.post_form(&valid_fields(&token)).await;

    app.mailer.set_failing(false);
    let response = app.post_form(&valid_fields(&token)).await;

    assert_eq!(location(&response), SUCCESS_LOCATION);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[actix_rt::test]
async fn relaxed_policy_admits_spaced_submissions() {
    let app = TestApp::spawn_with(relaxed_rate_config()).await;
    let token = app.form_token().await;

    let first = app.post_form(&valid_fields(&token)).await;
    let second = app.post_form(&valid_fields(&token)).await;

    assert_eq!(location(&first), SUCCESS_LOCATION);
    assert_eq!(location(&second), SUCCESS_LOCATION);
    assert_eq!(app.repo.len(), 2);
}
