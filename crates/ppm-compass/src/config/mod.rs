use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::comparison::FilterRatingSource;

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

/// Top-level configuration for the comparison service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
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

        let alias_file = env::var("PPM_ALIAS_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let filter_rating_source = match env::var("PPM_FILTER_RATING_SOURCE") {
            Ok(raw) => parse_filter_rating_source(&raw)?,
            Err(_) => FilterRatingSource::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            matching: MatchingConfig {
                alias_file,
                filter_rating_source,
            },
        })
    }
}

fn parse_filter_rating_source(raw: &str) -> Result<FilterRatingSource, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "ratings" | "ratings_map" => Ok(FilterRatingSource::RatingsMap),
        "resolver" | "resolution_chain" => Ok(FilterRatingSource::ResolutionChain),
        _ => Err(ConfigError::InvalidFilterRatingSource(raw.to_string())),
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

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Knobs for the matching core that differ between deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchingConfig {
    /// Optional JSON file with extra criterion aliases merged over the built-in table.
    pub alias_file: Option<PathBuf>,
    /// Where `Criteria` filter conditions read tool ratings from.
    pub filter_rating_source: FilterRatingSource,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("PPM_FILTER_RATING_SOURCE must be 'ratings' or 'resolver', found '{0}'")]
    InvalidFilterRatingSource(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("PPM_ALIAS_FILE");
        env::remove_var("PPM_FILTER_RATING_SOURCE");
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
        assert!(config.telemetry.ansi);
        assert_eq!(config.matching, MatchingConfig::default());
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
    fn reads_matching_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("PPM_ALIAS_FILE", "/etc/ppm/aliases.json");
        env::set_var("PPM_FILTER_RATING_SOURCE", "Resolver");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(!config.telemetry.ansi);
        assert_eq!(
            config.matching.alias_file,
            Some(PathBuf::from("/etc/ppm/aliases.json"))
        );
        assert_eq!(
            config.matching.filter_rating_source,
            FilterRatingSource::ResolutionChain
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_filter_rating_source() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PPM_FILTER_RATING_SOURCE", "magic");
        let err = AppConfig::load().expect_err("unknown source rejected");
        assert!(matches!(err, ConfigError::InvalidFilterRatingSource(value) if value == "magic"));
        reset_env();
    }
}
