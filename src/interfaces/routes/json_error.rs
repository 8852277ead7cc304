use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::{api_errors::ApiError, i18n::Locale, AppState};

const JSON_LIMIT_BYTES: usize = 64 * 1024;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(|err, req| json_error(err, req).into()),
    );
}

/// Malformed or oversized JSON bodies get the regular error envelope. The
/// parser's own message is only logged.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> ApiError {
    let locale = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.contact_handler.locale())
        .unwrap_or_default();
    tracing::debug!(path = %req.path(), "Rejected JSON payload: {}", err);

    match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ApiError::BadRequest(locale.payload_too_large().to_string())
        }
        _ => ApiError::BadRequest(locale.invalid_payload().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn parser_details_stay_out_of_the_message() {
        let req = TestRequest::default().to_http_request();
        let err = serde_json::from_str::<u8>("\"x\"").unwrap_err();

        let ApiError::BadRequest(message) = json_error(JsonPayloadError::Deserialize(err), &req) else {
            panic!("expected a bad request");
        };

        assert_eq!(message, Locale::default().invalid_payload());
        assert!(!message.contains("line"));
    }
}
