use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub likes: LikesConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Session token lifetime. One policy for login and register.
    #[serde(default = "default_jwt_lifetime_seconds")]
    pub lifetime_seconds: u64,
}

fn default_jwt_lifetime_seconds() -> u64 {
    7 * 24 * 60 * 60
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Set the Secure attribute on the session cookie. Off by default for
    /// local development over plain HTTP.
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LikesConfig {
    /// Tick period for the SSE live-count stream.
    #[serde(default = "default_stream_interval_ms")]
    pub stream_interval_ms: u64,
}

impl Default for LikesConfig {
    fn default() -> Self {
        Self {
            stream_interval_ms: default_stream_interval_ms(),
        }
    }
}

fn default_stream_interval_ms() -> u64 {
    2000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SOCIABLE__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:sociable.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional.
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("SOCIABLE")
                .separator("__")
                .try_parsing(true),
        );

        // Legacy environment variables without prefix.
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.likes.stream_interval_ms == 0 {
            return Err("likes.stream_interval_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
