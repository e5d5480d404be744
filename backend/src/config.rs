//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Secret used when `JWT_SECRET` is not set. Only suitable for development.
pub const DEV_JWT_SECRET: &str = "crudhub-dev-secret-change-me";

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cover upload configuration
    pub uploads: UploadConfig,
    /// Token and password hashing configuration
    pub auth: AuthConfig,
    /// Weather upstream configuration
    pub weather: WeatherConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection string or file path
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

/// Cover upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where uploaded covers are written
    pub dir: PathBuf,
    /// Largest accepted cover in bytes
    pub max_bytes: usize,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expiry_secs: u64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Admin account created at startup when both fields are set
    pub admin_username: Option<String>,
    /// Password for the seeded admin account
    pub admin_password: Option<String>,
}

/// Weather upstream configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeather API key
    pub api_key: Option<String>,
    /// Current-weather endpoint
    pub base_url: String,
    /// Upstream request timeout (in seconds)
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/crudhub.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiry_secs: 3600,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin_username: None,
            admin_password: None,
        }
    }
}

// Secrets stay out of the startup log.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_secs", &self.jwt_expiry_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("admin_username", &self.admin_username)
            .finish()
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                port: parse_var("PORT").unwrap_or(defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
            },
            uploads: UploadConfig {
                dir: env::var_os("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.uploads.dir),
                max_bytes: parse_var("MAX_UPLOAD_BYTES").unwrap_or(defaults.uploads.max_bytes),
            },
            auth: AuthConfig {
                jwt_secret: non_empty_var("JWT_SECRET").unwrap_or(defaults.auth.jwt_secret),
                jwt_expiry_secs: parse_var("JWT_EXPIRY_SECS")
                    .unwrap_or(defaults.auth.jwt_expiry_secs),
                bcrypt_cost: parse_var("BCRYPT_COST").unwrap_or(defaults.auth.bcrypt_cost),
                admin_username: non_empty_var("ADMIN_USERNAME"),
                admin_password: non_empty_var("ADMIN_PASSWORD"),
            },
            weather: WeatherConfig {
                api_key: non_empty_var("OPENWEATHER_API_KEY"),
                base_url: non_empty_var("OPENWEATHER_BASE_URL")
                    .unwrap_or(defaults.weather.base_url),
                timeout_secs: parse_var("WEATHER_TIMEOUT_SECS")
                    .unwrap_or(defaults.weather.timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether the built-in development secret is signing tokens
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "PORT",
        "HOST",
        "DATABASE_URL",
        "MAX_UPLOAD_BYTES",
        "JWT_SECRET",
        "OPENWEATHER_API_KEY",
    ];

    fn clear() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        clear();
        let config = Config::from_env();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server_addr(), "0.0.0.0:3001");
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        assert!(config.weather.api_key.is_none());
        assert!(config.uses_dev_secret());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear();
        env::set_var("PORT", "8088");
        env::set_var("DATABASE_URL", "sqlite:/tmp/other.db");
        env::set_var("JWT_SECRET", "s3cret");
        env::set_var("OPENWEATHER_API_KEY", "abc");

        let config = Config::from_env();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.database.url, "sqlite:/tmp/other.db");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.weather.api_key.as_deref(), Some("abc"));
        assert!(!config.uses_dev_secret());
        clear();
    }

    #[test]
    #[serial]
    fn test_unparseable_numbers_fall_back() {
        clear();
        env::set_var("PORT", "not-a-port");
        env::set_var("MAX_UPLOAD_BYTES", "-3");
        let config = Config::from_env();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        clear();
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::default();
        let rendered = format!("{:?}", config.auth);
        assert!(!rendered.contains(DEV_JWT_SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
