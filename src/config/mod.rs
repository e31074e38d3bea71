use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while building configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string, from DATABASE_URL (required)
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the external auth service
    pub base_url: String,
    /// Path of the get-session endpoint on the auth service
    pub get_session_path: String,
    /// Name of the session cookie issued by the auth service
    pub cookie_name: String,
    /// Shortest cookie value the edge gate will let through
    pub min_cookie_len: usize,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Build configuration from the environment. Environment-keyed defaults
    /// first, then specific env var overrides, then required-var validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        };

        config.database.url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        // Numeric overrides all behave the same way: an unparseable value
        // keeps the environment default
        if let Ok(v) = env::var("PORT") {
            config.server.port = v.parse().unwrap_or(config.server.port);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = v.parse().unwrap_or(config.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            config.database.connect_timeout_secs =
                v.parse().unwrap_or(config.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("AUTH_BASE_URL") {
            config.auth.base_url = v;
        } else if config.environment == Environment::Production {
            tracing::warn!("AUTH_BASE_URL not set, using default {}", config.auth.base_url);
        }
        if let Ok(v) = env::var("AUTH_GET_SESSION_PATH") {
            config.auth.get_session_path = v;
        }
        if let Ok(v) = env::var("AUTH_SESSION_COOKIE") {
            config.auth.cookie_name = v;
        }
        if let Ok(v) = env::var("AUTH_MIN_COOKIE_LEN") {
            config.auth.min_cookie_len = v.parse().unwrap_or(config.auth.min_cookie_len);
        }
        if let Ok(v) = env::var("AUTH_REQUEST_TIMEOUT_SECS") {
            config.auth.request_timeout_secs =
                v.parse().unwrap_or(config.auth.request_timeout_secs);
        }

        // Catch malformed auth URLs at startup, not on the first request
        url::Url::parse(&config.auth.base_url)
            .map_err(|_| ConfigError::InvalidVar("AUTH_BASE_URL", config.auth.base_url.clone()))?;

        Ok(config)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            auth: AuthConfig {
                base_url: "http://localhost:3001".to_string(),
                get_session_path: "/api/auth/get-session".to_string(),
                cookie_name: "better-auth.session_token".to_string(),
                min_cookie_len: 10,
                request_timeout_secs: 5,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            auth: AuthConfig {
                base_url: "http://localhost:3001".to_string(),
                get_session_path: "/api/auth/get-session".to_string(),
                cookie_name: "better-auth.session_token".to_string(),
                min_cookie_len: 10,
                request_timeout_secs: 3,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.cookie_name, "better-auth.session_token");
        assert_eq!(config.auth.min_cookie_len, 10);
    }

    // The only test that touches process env vars; keeping it alone avoids
    // races with parallel test threads
    #[test]
    fn from_env_applies_overrides_and_tolerates_bad_numbers() {
        env::set_var("DATABASE_URL", "postgres://localhost/todos_test");
        env::set_var("PORT", "not-a-port");
        env::set_var("AUTH_GET_SESSION_PATH", "/session");
        env::set_var("AUTH_MIN_COOKIE_LEN", "32");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.port, 3000); // unparseable keeps the default
        assert_eq!(config.auth.get_session_path, "/session");
        assert_eq!(config.auth.min_cookie_len, 32);

        env::remove_var("DATABASE_URL");
        env::remove_var("PORT");
        env::remove_var("AUTH_GET_SESSION_PATH");
        env::remove_var("AUTH_MIN_COOKIE_LEN");
    }

    #[test]
    fn production_tightens_database_settings() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.database.max_connections > AppConfig::development().database.max_connections);
        assert!(config.database.connect_timeout_secs < AppConfig::development().database.connect_timeout_secs);
    }
}
