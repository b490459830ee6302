//! Process configuration, read once at startup from the environment.

use axum_extra::extract::cookie::SameSite;
use chrono::Duration;

pub const SESSION_COOKIE: &str = "auth_token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

/// Token signing and session settings handed to the auth flow.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Tokens with less remaining lifetime than this are reissued on verify.
    pub refresh_threshold: Duration,
    pub cookie: CookieConfig,
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE.to_string(),
            secure: false,
            same_site: SameSite::Strict,
            max_age: Duration::hours(24),
        }
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(24),
            refresh_threshold: Duration::minutes(30),
            cookie: CookieConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080u16)?;
        let ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", 24 * 60 * 60i64)?;
        let threshold_secs = parse_or(&lookup, "SESSION_REFRESH_THRESHOLD_SECS", 30 * 60i64)?;

        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                value: ttl_secs.to_string(),
            });
        }

        if threshold_secs < 0 || threshold_secs >= ttl_secs {
            return Err(ConfigError::Invalid {
                key: "SESSION_REFRESH_THRESHOLD_SECS",
                value: threshold_secs.to_string(),
            });
        }

        let production = lookup("APP_ENV").is_some_and(|env| env == "production");

        let mut auth = AuthConfig::new(jwt_secret);
        auth.token_ttl = Duration::seconds(ttl_secs);
        auth.refresh_threshold = Duration::seconds(threshold_secs);
        auth.cookie.max_age = auth.token_ttl;
        auth.cookie.secure = production;

        Ok(Self {
            database_url,
            host,
            port,
            auth,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
