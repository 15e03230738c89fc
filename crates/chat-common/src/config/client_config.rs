//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub http: HttpSettings,
    pub log: LogConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue("APP_ENV", s.to_string())),
        }
    }
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// REST API endpoint and credentials
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header
    pub token: Option<String>,
    pub user_agent: String,
}

// Hand-written so the token never reaches a log line.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            user_agent: default_user_agent(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    /// Requests allowed in flight at once
    pub max_connections: usize,
    pub dns_cache_ttl: Duration,
    pub trace: TraceMode,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_connections: default_max_connections(),
            dns_cache_ttl: default_dns_cache_ttl(),
            trace: TraceMode::default(),
        }
    }
}

/// Which request tracers to attach to the HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    /// No tracers
    #[default]
    Off,
    /// One line per request start and end
    Summary,
    /// Headers, bodies, connection and DNS events. Logs credentials.
    Verbose,
}

impl FromStr for TraceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "none" | "" => Ok(Self::Off),
            "summary" => Ok(Self::Summary),
            "verbose" | "debug" => Ok(Self::Verbose),
            other => Err(ConfigError::InvalidValue("HTTP_TRACE", other.to_string())),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,chat_http=debug`
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-client".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_base_url() -> String {
    "https://discord.com/api/v7".to_string()
}

fn default_user_agent() -> String {
    format!("chat-client ({})", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_connections() -> usize {
    100
}

fn default_dns_cache_ttl() -> Duration {
    Duration::from_secs(10)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|s| {
                    s.trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue(key, s.clone()))
                })
                .transpose()
        };

        let max_connections = match parsed("HTTP_MAX_CONNECTIONS")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue(
                    "HTTP_MAX_CONNECTIONS",
                    "0".to_string(),
                ))
            }
            Some(n) => usize::try_from(n)
                .map_err(|_| ConfigError::InvalidValue("HTTP_MAX_CONNECTIONS", n.to_string()))?,
            None => default_max_connections(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .map(|s| s.parse::<Environment>())
                    .transpose()?
                    .unwrap_or_else(default_env),
            },
            api: ApiConfig {
                base_url: lookup("API_BASE_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_base_url),
                token: lookup("API_TOKEN").filter(|s| !s.is_empty()),
                user_agent: lookup("API_USER_AGENT").unwrap_or_else(default_user_agent),
            },
            http: HttpSettings {
                timeout: parsed("HTTP_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or_else(default_timeout),
                max_connections,
                dns_cache_ttl: parsed("HTTP_DNS_CACHE_TTL_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or_else(default_dns_cache_ttl),
                trace: lookup("HTTP_TRACE")
                    .map(|s| s.parse::<TraceMode>())
                    .transpose()?
                    .unwrap_or_default(),
            },
            log: LogConfig {
                level: lookup("LOG_LEVEL").unwrap_or_else(default_log_level),
                json: lookup("LOG_JSON")
                    .map(|s| match s.to_lowercase().as_str() {
                        "1" | "true" | "yes" => Ok(true),
                        "0" | "false" | "no" => Ok(false),
                        _ => Err(ConfigError::InvalidValue("LOG_JSON", s)),
                    })
                    .transpose()?
                    .unwrap_or(false),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
