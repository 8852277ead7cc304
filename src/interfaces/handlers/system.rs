use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use parking_lot::RwLock;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, mail::MailTransport, repositories::contact::ContactRepository, AppState};

#[derive(Serialize, Clone)]
struct ComponentStatus {
    kind: String,
    status: String,
}

#[derive(Serialize, Clone)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: String,
    database: ComponentStatus,
    sessions: ComponentStatus,
    mail_transport: String,
}

const CACHE_SECS: i64 = 5;

/// Last health report of one app instance and when it was taken.
#[derive(Default)]
pub struct HealthCache {
    last: RwLock<Option<(i64, HealthCheckResponse)>>,
}

impl HealthCache {
    fn fresh(&self, now: i64) -> Option<HealthCheckResponse> {
        match &*self.last.read() {
            Some((at, response)) if now - at <= CACHE_SECS => Some(response.clone()),
            _ => None,
        }
    }

    fn store(&self, now: i64, response: HealthCheckResponse) {
        *self.last.write() = Some((now, response));
    }
}

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let repo = &state.contact_handler.contact_repo;
    let database = ComponentStatus {
        kind: repo.kind().to_string(),
        status: match repo.check_connection().await {
            Ok(_) => "OK",
            Err(e) => {
                tracing::warn!("Health check: database unavailable: {}", e);
                "Unavailable"
            }
        }
        .to_string(),
    };

    let sessions = ComponentStatus {
        kind: state.session_backend.kind().to_string(),
        status: match state.session_backend.ping().await {
            Ok(_) => "OK",
            Err(e) => {
                tracing::warn!("Health check: session store unavailable: {}", e);
                "Unavailable"
            }
        }
        .to_string(),
    };

    let degraded = database.status != "OK" || sessions.status != "OK";

    HealthCheckResponse {
        status: if degraded { "degraded" } else { "healthy" }.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        sessions,
        mail_transport: state.contact_handler.notifier.mailer.kind().to_string(),
    }
}

/// Liveness report, cached for a few seconds so frequent polling stays cheap.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();

    if let Some(cached) = state.health.fresh(now) {
        return HttpResponse::Ok().json(cached);
    }

    let response = build_health_response(&state).await;
    state.health.store(now, response.clone());
    HttpResponse::Ok().json(response)
}

#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, "/contact"))
        .finish()
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({
        "status": "error",
        "code": "not_found",
    }))
}
