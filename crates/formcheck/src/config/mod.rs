use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

const DEFAULT_SITE_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_GREETING_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration for the diagnostics service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub site: SiteConfig,
    /// `None` when the database URL or key is missing; the probe then reports "not configured".
    pub database: Option<DatabaseConfig>,
    /// `None` when the relay host or credentials are missing.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url = env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SITE_BASE_URL.to_string());
        let site = SiteConfig::new(base_url)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            site,
            database: DatabaseConfig::from_env(),
            smtp: SmtpConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the marketing site serving `/api/health-check` and the form endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    base_url: String,
}

impl SiteConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let mut base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/').len();
        base_url.truncate(trimmed);

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSiteUrl(base_url));
        }

        Ok(Self { base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Hosted database REST endpoint and anonymous key.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl DatabaseConfig {
    fn from_env() -> Option<Self> {
        let url = first_env(&["SUPABASE_URL", "VITE_SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"])?;
        let anon_key = first_env(&[
            "SUPABASE_ANON_KEY",
            "VITE_SUPABASE_ANON_KEY",
            "NEXT_PUBLIC_SUPABASE_ANON_KEY",
        ])?;
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

/// How the relay connection is secured before credentials are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS; the upgrade is mandatory.
    #[default]
    StartTls,
    /// TLS from the first byte (SMTPS, usually port 465).
    Implicit,
    /// No encryption. Only for relays on a trusted local network.
    None,
}

impl SmtpTls {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "smtps" | "implicit" => Ok(Self::Implicit),
            "none" | "plain" => Ok(Self::None),
            other => Err(ConfigError::InvalidSmtpTls(other.to_string())),
        }
    }
}

/// Mail relay used by the form endpoints. There are no built-in credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub tls: SmtpTls,
    pub greeting_timeout: Duration,
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let port = match env::var("SMTP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidSmtpPort)?,
            Err(_) => DEFAULT_SMTP_PORT,
        };
        let greeting_timeout = match env::var("SMTP_GREETING_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSmtpTimeout)?,
            Err(_) => DEFAULT_SMTP_GREETING_TIMEOUT_SECS,
        };
        let tls = match env::var("SMTP_TLS") {
            Ok(raw) => SmtpTls::parse(&raw)?,
            Err(_) => SmtpTls::default(),
        };

        let (Some(host), Some(user), Some(password)) = (
            first_env(&["SMTP_HOST"]),
            first_env(&["SMTP_USER"]),
            first_env(&["SMTP_PASS"]),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port,
            user,
            password,
            tls,
            greeting_timeout: Duration::from_secs(greeting_timeout),
        }))
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("tls", &self.tls)
            .field("greeting_timeout", &self.greeting_timeout)
            .finish()
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSiteUrl(String),
    InvalidSmtpPort,
    InvalidSmtpTimeout,
    InvalidSmtpTls(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSiteUrl(value) => {
                write!(f, "SITE_BASE_URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::InvalidSmtpTimeout => {
                write!(f, "SMTP_GREETING_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidSmtpTls(value) => {
                write!(f, "SMTP_TLS must be starttls, tls or none, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSiteUrl(_)
            | ConfigError::InvalidSmtpPort
            | ConfigError::InvalidSmtpTimeout
            | ConfigError::InvalidSmtpTls(_) => None,
        }
    }
}

/// Serializes tests that read or change process-wide environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}
