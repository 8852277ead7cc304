use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

use crate::{
    domain::i18n::Locale,
    entities::email::Mailbox,
    limiter::rate_limiter::RateLimitPolicy,
    mail::MailTransportKind,
    session::SessionSettings,
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    /// Site name used in page titles and mail subjects.
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Submissions are kept in memory when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_db_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Upper bound of submissions kept when no database is configured.
    #[serde(default = "default_memory_repo_capacity")]
    pub memory_repo_capacity: usize,

    /// Session state travels in an encrypted cookie when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// At least 64 bytes. Sessions are lost on restart when empty.
    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Take the client IP from `X-Forwarded-For` (only behind a trusted proxy).
    #[serde(default)]
    pub trust_forwarded_for: bool,

    #[serde(default)]
    pub locale: Locale,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_rate_min_interval")]
    pub rate_min_interval_secs: i64,

    #[serde(default = "default_rate_max_per_window")]
    pub rate_max_per_window: usize,

    #[serde(default = "default_rate_window")]
    pub rate_window_secs: i64,

    #[serde(default)]
    pub mail_transport: MailTransportKind,

    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,

    #[serde(default)]
    pub mail_api_key: String,

    #[serde(default = "default_mail_timeout")]
    pub mail_timeout_secs: u64,

    #[serde(default)]
    pub mail_from_address: String,

    #[serde(default)]
    pub mail_from_name: Option<String>,

    #[serde(default)]
    pub mail_owner_address: String,

    #[serde(default)]
    pub mail_owner_name: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "UniSurf".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_memory_repo_capacity() -> usize {
    500
}
fn default_true() -> bool {
    true
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_session_cookie_name() -> String {
    SessionSettings::default().cookie_name
}
fn default_session_ttl() -> u64 {
    SessionSettings::default().ttl.as_secs()
}
fn default_rate_min_interval() -> i64 {
    RateLimitPolicy::default().min_interval_secs
}
fn default_rate_max_per_window() -> usize {
    RateLimitPolicy::default().max_per_window
}
fn default_rate_window() -> i64 {
    RateLimitPolicy::default().window_secs
}
fn default_mail_api_url() -> String {
    "https://api.brevo.com/v3/smtp/email".to_string()
}
fn default_mail_timeout() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            database_url: None,
            database_max_connections: default_db_max_connections(),
            run_migrations: true,
            memory_repo_capacity: default_memory_repo_capacity(),
            redis_url: None,
            session_secret: String::new(),
            cors_allowed_origins: default_cors_origins(),
            trust_forwarded_for: false,
            locale: Locale::default(),
            log_level: default_log_level(),
            log_json: false,
            session_cookie_name: default_session_cookie_name(),
            session_ttl_secs: default_session_ttl(),
            rate_min_interval_secs: default_rate_min_interval(),
            rate_max_per_window: default_rate_max_per_window(),
            rate_window_secs: default_rate_window(),
            mail_transport: MailTransportKind::default(),
            mail_api_url: default_mail_api_url(),
            mail_api_key: String::new(),
            mail_timeout_secs: default_mail_timeout(),
            mail_from_address: String::new(),
            mail_from_name: None,
            mail_owner_address: String::new(),
            mail_owner_name: None,
        }
    }
}

impl AppConfig {
    /// Reads `config/default`, `config/{APP_ENV}` and `APP_*` variables, in that order.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins"),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.database_url = config.database_url.filter(|url| !url.trim().is_empty());
        config.redis_url = config.redis_url.filter(|url| !url.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Checks every setting and reports all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.mail_owner_address.trim().is_empty() {
            errors.push("MAIL_OWNER_ADDRESS must be set");
        }
        if self.mail_from_address.trim().is_empty() {
            errors.push("MAIL_FROM_ADDRESS must be set");
        }
        if self.mail_transport == MailTransportKind::Http {
            match Url::parse(self.mail_api_url.trim()) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => errors.push("MAIL_API_URL must be an http(s) URL for the http mail transport"),
            }
            if self.mail_api_key.trim().is_empty() {
                errors.push("MAIL_API_KEY must be set for the http mail transport");
            }
        }
        if self.rate_window_secs <= 0 {
            errors.push("RATE_WINDOW_SECS must be positive");
        }
        if self.rate_min_interval_secs < 0 {
            errors.push("RATE_MIN_INTERVAL_SECS cannot be negative");
        }
        if self.rate_max_per_window == 0 {
            errors.push("RATE_MAX_PER_WINDOW must be at least 1");
        }
        if self.session_ttl_secs == 0 {
            errors.push("SESSION_TTL_SECS must be positive");
        }
        if !self.session_secret.is_empty() && self.session_secret.len() < 64 {
            errors.push("SESSION_SECRET must be at least 64 bytes");
        }
        if self.is_production() && self.session_secret.is_empty() {
            errors.push("SESSION_SECRET must be set in production");
        }
        if self.memory_repo_capacity == 0 {
            errors.push("MEMORY_REPO_CAPACITY must be at least 1");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn rate_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            min_interval_secs: self.rate_min_interval_secs,
            max_per_window: self.rate_max_per_window,
            window_secs: self.rate_window_secs,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            cookie_name: self.session_cookie_name.clone(),
            ttl: Duration::from_secs(self.session_ttl_secs),
            secure: self.is_production(),
        }
    }

    pub fn sender_mailbox(&self) -> Mailbox {
        Mailbox::new(
            self.mail_from_address.trim(),
            self.mail_from_name.clone().or_else(|| Some(self.name.clone())),
        )
    }

    pub fn owner_mailbox(&self) -> Mailbox {
        Mailbox::new(self.mail_owner_address.trim(), self.mail_owner_name.clone())
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.trim().is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            Some(value) => value.redact(),
            None => "[NOT SET]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("database_max_connections", &self.database_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("memory_repo_capacity", &self.memory_repo_capacity)
            .field("redis_url", &self.redis_url.redact())
            .field("session_secret", &self.session_secret.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("locale", &self.locale)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("rate_min_interval_secs", &self.rate_min_interval_secs)
            .field("rate_max_per_window", &self.rate_max_per_window)
            .field("rate_window_secs", &self.rate_window_secs)
            .field("mail_transport", &self.mail_transport)
            .field("mail_api_url", &self.mail_api_url)
            .field("mail_api_key", &self.mail_api_key.redact())
            .field("mail_timeout_secs", &self.mail_timeout_secs)
            .field("mail_from_address", &self.mail_from_address)
            .field("mail_owner_address", &self.mail_owner_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            mail_from_address: "noreply@unisurf.example".into(),
            mail_owner_address: "owner@unisurf.example".into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn defaults_validate_once_addresses_are_set() {
        assert!(valid_config().validate().is_ok());
        assert!(AppConfig::default().validate().is_err());
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = AppConfig {
            env: AppEnvironment::Production,
            mail_transport: MailTransportKind::Http,
            rate_window_secs: 0,
            ..valid_config()
        };
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("MAIL_API_KEY"));
        assert!(message.contains("SESSION_SECRET must be set"));
        assert!(message.contains("RATE_WINDOW_SECS"));
        assert!(message.contains("Wildcard CORS"));
    }

    #[test]
    fn mail_api_url_must_parse() {
        let config = AppConfig {
            mail_transport: MailTransportKind::Http,
            mail_api_key: "xkeysib-secret".into(),
            mail_api_url: "api.brevo.com/v3/smtp/email".into(),
            ..valid_config()
        };
        assert!(config.validate().unwrap_err().to_string().contains("MAIL_API_URL"));

        let config = AppConfig {
            mail_api_url: "https://api.brevo.com/v3/smtp/email".into(),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let config = AppConfig {
            session_secret: "too-short".into(),
            ..valid_config()
        };
        assert!(config.validate().unwrap_err().to_string().contains("64 bytes"));

        let config = AppConfig {
            session_secret: "s".repeat(64),
            ..valid_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = AppConfig {
            database_url: Some("postgres://user:pw@localhost/db".into()),
            mail_api_key: "xkeysib-secret".into(),
            session_secret: "k".repeat(64),
            ..valid_config()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains(&"k".repeat(64)));
        assert!(!debug.contains("pw@localhost"));
        assert!(!debug.contains("xkeysib-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let config = AppConfig {
            cors_allowed_origins: vec!["https://a.example, https://b.example".into()],
            ..valid_config()
        };
        assert_eq!(config.cors_origins(), vec!["https://a.example", "https://b.example"]);
    }
}
