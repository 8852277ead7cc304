use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use derive_more::Display;
use serde_json::json;

use crate::errors::FieldErrors;

/// Failures of the JSON API, rendered as `{"status":"error","code":..}`.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display("Invalid input: {}", _0)]
    Invalid(FieldErrors),

    #[display("Rate limited, retry after {}s", _0)]
    RateLimited(u64),

    #[display("Mail delivery failed")]
    MailFailure,

    #[display("Bad request: {}", _0)]
    BadRequest(String),

    #[display("Internal server error")]
    InternalServerError,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Invalid(_) => "invalid",
            ApiError::RateLimited(_) => "rate",
            ApiError::MailFailure => "mail",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::InternalServerError => "internal",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MailFailure => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            ApiError::Invalid(errors) => builder.json(json!({
                "status": "error",
                "code": self.code(),
                "errors": errors,
            })),
            ApiError::RateLimited(retry_after) => builder
                .insert_header((header::RETRY_AFTER, retry_after.to_string()))
                .json(json!({
                    "status": "error",
                    "code": self.code(),
                })),
            ApiError::BadRequest(message) => builder.json(json!({
                "status": "error",
                "code": self.code(),
                "message": message,
            })),
            ApiError::MailFailure | ApiError::InternalServerError => builder.json(json!({
                "status": "error",
                "code": self.code(),
            })),
        }
    }
}

/// Body of a successful API call.
pub fn api_success() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "success" }))
}
