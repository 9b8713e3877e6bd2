//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PUSTAKALAYA_API_URL` - Base URL of the remote library API
//!
//! ## Optional
//! - `PUSTAKALAYA_UPLOADS_URL` - Base URL for uploaded files (default: `<api>/uploads/`)
//! - `PUSTAKALAYA_HTTP_TIMEOUT_SECS` - Transport timeout for API calls (default: none)
//! - `PUSTAKALAYA_CONSOLE_HOST` - Bind address (default: 127.0.0.1)
//! - `PUSTAKALAYA_CONSOLE_PORT` - Listen port (default: 3001)
//! - `PUSTAKALAYA_SESSION_FILE` - Where the logged-in identity is kept
//!   (default: `<data dir>/pustakalaya/session.json`)
//! - `PUSTAKALAYA_STATIC_DIR` - Stylesheet directory (default: crates/console/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const SESSION_FILE_NAME: &str = "session.json";
const DATA_DIR_NAME: &str = "pustakalaya";
const DEFAULT_STATIC_DIR: &str = "crates/console/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote library API settings
    pub api: ApiConfig,
    /// Durable location of the logged-in identity
    pub session_file: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Remote library API settings, shared by the console and the CLI.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the endpoint scripts are resolved against (always ends in `/`)
    pub base_url: Url,
    /// Base URL certificate paths are resolved against (always ends in `/`)
    pub uploads_url: Url,
    /// Optional transport timeout; `None` waits for the transport to give up
    pub timeout: Option<Duration>,
}

impl ConsoleConfig {
    /// Defaults for everything but the API and session file.
    #[must_use]
    pub fn new(api: ApiConfig, session_file: PathBuf) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            api,
            session_file,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PUSTAKALAYA_CONSOLE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PUSTAKALAYA_CONSOLE_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("PUSTAKALAYA_CONSOLE_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PUSTAKALAYA_CONSOLE_PORT".to_string(), e.to_string())
            })?;

        let api = ApiConfig::from_env()?;
        let session_file = session_file_from_env();
        let static_dir = PathBuf::from(get_env_or_default(
            "PUSTAKALAYA_STATIC_DIR",
            DEFAULT_STATIC_DIR,
        ));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            api,
            session_file,
            static_dir,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ApiConfig {
    /// Load the API settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PUSTAKALAYA_API_URL` is missing or any URL or
    /// timeout fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("PUSTAKALAYA_API_URL")?;
        let uploads_url = get_optional_env("PUSTAKALAYA_UPLOADS_URL");
        let timeout = get_optional_env("PUSTAKALAYA_HTTP_TIMEOUT_SECS");
        Self::new(&base_url, uploads_url.as_deref(), timeout.as_deref())
    }

    /// Build the API settings from raw values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a URL is not an absolute
    /// http(s) URL or the timeout is not a whole number of seconds.
    pub fn new(
        base_url: &str,
        uploads_url: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let base_url = parse_base_url("PUSTAKALAYA_API_URL", base_url)?;
        let uploads_url = match uploads_url {
            Some(raw) => parse_base_url("PUSTAKALAYA_UPLOADS_URL", raw)?,
            None => base_url.join("uploads/").map_err(|e| {
                ConfigError::InvalidEnvVar("PUSTAKALAYA_API_URL".to_string(), e.to_string())
            })?,
        };
        let timeout = timeout_secs
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "PUSTAKALAYA_HTTP_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            uploads_url,
            timeout,
        })
    }
}

/// Resolve the session file location from `PUSTAKALAYA_SESSION_FILE`, falling
/// back to the platform data directory.
#[must_use]
pub fn session_file_from_env() -> PathBuf {
    get_optional_env("PUSTAKALAYA_SESSION_FILE").map_or_else(default_session_file, PathBuf::from)
}

/// Default session file under the platform data directory.
#[must_use]
pub fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
        .join(SESSION_FILE_NAME)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an absolute http(s) URL and make sure its path ends in `/`, so
/// relative joins stay underneath it.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let api = ApiConfig::new("https://library.example.org/api", None, None).unwrap();
        assert_eq!(api.base_url.as_str(), "https://library.example.org/api/");
        assert_eq!(
            api.base_url.join("p_stats_web.php").unwrap().as_str(),
            "https://library.example.org/api/p_stats_web.php"
        );
    }

    #[test]
    fn test_uploads_default_to_api_subdirectory() {
        let api = ApiConfig::new("https://library.example.org/api/", None, None).unwrap();
        assert_eq!(
            api.uploads_url.as_str(),
            "https://library.example.org/api/uploads/"
        );
    }

    #[test]
    fn test_explicit_uploads_url() {
        let api = ApiConfig::new(
            "https://library.example.org/api/",
            Some("https://cdn.example.org/files"),
            None,
        )
        .unwrap();
        assert_eq!(api.uploads_url.as_str(), "https://cdn.example.org/files/");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ApiConfig::new("ftp://library.example.org/", None, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PUSTAKALAYA_API_URL"));
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(ApiConfig::new("/api/", None, None).is_err());
    }

    #[test]
    fn test_timeout_parsing() {
        let api = ApiConfig::new("http://localhost:8080/", None, Some("15")).unwrap();
        assert_eq!(api.timeout, Some(Duration::from_secs(15)));

        let api = ApiConfig::new("http://localhost:8080/", None, None).unwrap();
        assert_eq!(api.timeout, None);

        assert!(ApiConfig::new("http://localhost:8080/", None, Some("soon")).is_err());
    }

    #[test]
    fn test_default_session_file_name() {
        let path = default_session_file();
        assert!(path.ends_with("pustakalaya/session.json"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ConsoleConfig::new(
            ApiConfig::new("http://localhost:8080/", None, None).unwrap(),
            PathBuf::from("/tmp/session.json"),
        );

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }
}
