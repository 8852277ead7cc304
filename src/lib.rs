use std::{net::TcpListener, sync::Arc};

use actix_session::storage::SessionStore;
use actix_web::{cookie::Key, dev::Server, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

mod domain;
mod interfaces;
mod infrastructure;
pub mod api_errors;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, i18n, use_cases};
pub use interfaces::{handlers, repositories, routes, views};
pub use infrastructure::{db, limiter, mail, session, utils};

use mail::{http_api::HttpApiMailer, log_mailer::LogMailer, MailTransport, MailTransportKind};
use repositories::contact::ContactRepository;
use handlers::system::HealthCache;
use session::{SessionBackend, SessionSettings};
use use_cases::{contact::ContactHandler, notifier::ContactNotifier};

pub type AppContactHandler = ContactHandler<Arc<dyn ContactRepository>, Arc<dyn MailTransport>>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub session_backend: SessionBackend,
    pub session_settings: SessionSettings,
    pub health: HealthCache,
    pub site_name: String,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        contact_repo: Arc<dyn ContactRepository>,
        mailer: Arc<dyn MailTransport>,
        session_backend: SessionBackend,
    ) -> Self {
        let notifier = ContactNotifier::new(
            mailer,
            config.sender_mailbox(),
            config.owner_mailbox(),
            config.name.clone(),
            config.locale,
        );
        let contact_handler = ContactHandler::new(
            contact_repo,
            notifier,
            config.rate_policy(),
            config.locale,
        );

        AppState {
            contact_handler,
            session_backend,
            session_settings: config.session_settings(),
            health: HealthCache::default(),
            site_name: config.name.clone(),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}

/// Picks the mail transport named by `mail_transport`.
pub fn build_mailer(config: &settings::AppConfig) -> Result<Arc<dyn MailTransport>, errors::MailError> {
    Ok(match config.mail_transport {
        MailTransportKind::Log => Arc::new(LogMailer),
        MailTransportKind::Http => Arc::new(HttpApiMailer::from_config(config)?),
    })
}

/// Starts the HTTP server on `listener`. `make_store` builds the session
/// store for each worker.
pub fn serve<S, F>(
    listener: TcpListener,
    config: &settings::AppConfig,
    state: web::Data<AppState>,
    make_store: F,
    key: Key,
) -> std::io::Result<Server>
where
    S: SessionStore + 'static,
    F: Fn() -> S + Clone + Send + 'static,
{
    let cors_config = config.clone();

    let server = HttpServer::new(move || {
        let sessions = session::session_middleware(make_store(), key.clone(), &state.session_settings);

        App::new()
            .app_data(state.clone())
            .wrap(sessions)
            .wrap(utils::cors::build_cors(&cors_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(routes::configure_routes)
            .default_service(web::to(handlers::system::not_found))
    })
    .workers(config.worker_count.max(1))
    .listen(listener)?
    .run();

    Ok(server)
}
