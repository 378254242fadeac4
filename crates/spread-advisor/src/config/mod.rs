use crate::catalog::CatalogSource;
use crate::recommendation::{ScoringConfig, ScoringConfigError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

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

    pub fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub scoring: ScoringConfig,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat(value))?,
            Err(_) => LogFormat::Compact,
        };

        let catalog_path = env::var("APP_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let defaults = ScoringConfig::default();
        let mut scoring = ScoringConfig {
            min_confidence: env_number("APP_SCORING_MIN_CONFIDENCE", defaults.min_confidence)?,
            top_n: env_number("APP_SCORING_TOP_N", defaults.top_n)?,
            keyword_saturation: env_number(
                "APP_SCORING_KEYWORD_SATURATION",
                defaults.keyword_saturation,
            )?,
            ..defaults
        };
        scoring.weights.keyword =
            env_number("APP_SCORING_KEYWORD_WEIGHT", scoring.weights.keyword)?;
        scoring.weights.emotional_state =
            env_number("APP_SCORING_EMOTION_WEIGHT", scoring.weights.emotional_state)?;
        scoring.weights.preference =
            env_number("APP_SCORING_PREFERENCE_WEIGHT", scoring.weights.preference)?;
        scoring.validate().map_err(ConfigError::Scoring)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            catalog: CatalogConfig { path: catalog_path },
            scoring,
        })
    }
}

fn env_number<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable, value }),
        Err(_) => Ok(default),
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

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Full,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" | "pretty" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Where the spread catalog is read from. Unset means the embedded copy.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn source(&self) -> CatalogSource {
        match &self.path {
            Some(path) => CatalogSource::File(path.clone()),
            None => CatalogSource::Embedded,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidNumber { variable: &'static str, value: String },
    Scoring(ScoringConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'full' (found '{value}')")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be numeric (found '{value}')")
            }
            ConfigError::Scoring(err) => write!(f, "invalid scoring configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Scoring(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARIABLES: [&str; 12] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_FORMAT",
        "APP_CATALOG_PATH",
        "APP_SCORING_KEYWORD_WEIGHT",
        "APP_SCORING_EMOTION_WEIGHT",
        "APP_SCORING_PREFERENCE_WEIGHT",
        "APP_SCORING_MIN_CONFIDENCE",
        "APP_SCORING_TOP_N",
        "APP_SCORING_KEYWORD_SATURATION",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in VARIABLES {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert!(matches!(config.catalog.source(), CatalogSource::Embedded));
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn scoring_overrides_are_validated() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_KEYWORD_WEIGHT", "0.5");
        env::set_var("APP_SCORING_EMOTION_WEIGHT", "0.2");
        env::set_var("APP_SCORING_TOP_N", "5");
        env::set_var("APP_CATALOG_PATH", "/srv/spreads.json");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.weights.keyword, 0.5);
        assert_eq!(config.scoring.top_n, 5);
        assert!(matches!(
            config.catalog.source(),
            CatalogSource::File(path) if path == PathBuf::from("/srv/spreads.json")
        ));

        env::set_var("APP_SCORING_PREFERENCE_WEIGHT", "0.9");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::Scoring(ScoringConfigError::WeightSum { .. }))
        ));

        env::set_var("APP_SCORING_TOP_N", "many");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                variable: "APP_SCORING_TOP_N",
                ..
            })
        ));
        reset_env();
    }
}
