use std::{net::TcpListener, sync::Arc};

use actix_session::storage::{CookieSessionStore, RedisSessionStore};
use actix_web::web;
use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unisurf_site::{
    build_mailer,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    repositories::{contact::ContactRepository, memory::InMemoryContactRepo, sqlx_repo::SqlxContactRepo},
    serve,
    session::{session_key, SessionBackend},
    settings::AppConfig,
    AppState,
};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let contact_repo: Arc<dyn ContactRepository> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections)
                .await
                .context("Failed to create database connection pool")?;
            if config.run_migrations {
                run_migrations(&pool).await.context("Failed to run database migrations")?;
            }
            Arc::new(SqlxContactRepo::new(pool))
        }
        None => {
            tracing::warn!(
                capacity = config.memory_repo_capacity,
                "No database configured, only the most recent contact submissions are kept in memory"
            );
            Arc::new(InMemoryContactRepo::with_capacity(config.memory_repo_capacity))
        }
    };

    let key = session_key(&config.session_secret).context("Failed to derive session key")?;
    let redis_store = match &config.redis_url {
        Some(url) => Some(
            RedisSessionStore::new(url.clone())
                .await
                .context("Failed to connect Redis session store")?,
        ),
        None => {
            tracing::warn!("No Redis configured, session state is kept in encrypted cookies");
            None
        }
    };
    let session_backend = match &config.redis_url {
        Some(url) => SessionBackend::redis(url).context("Failed to create Redis health pool")?,
        None => SessionBackend::Cookie,
    };

    let mailer = build_mailer(&config).context("Failed to set up mail transport")?;

    let app_state = web::Data::new(AppState::new(&config, contact_repo, mailer, session_backend));

    let server_addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&server_addr).with_context(|| format!("Failed to bind {}", server_addr))?;

    tracing::info!(
        "🚀 Starting {} contact service v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = match redis_store {
        Some(store) => serve(listener, &config, app_state, move || store.clone(), key),
        None => serve(listener, &config, app_state, CookieSessionStore::default, key),
    }
    .context("Failed to start HTTP server")?;

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => {},
    }

    Ok(())
}
