use anyhow::Context;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_allowed_origin: String,
    pub max_request_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            debug: false,
            database_url: "sqlite://job_application.db".to_string(),
            database_max_connections: 5,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            max_request_body_bytes: 64 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let body_limit_kb: usize =
            parse_or(&lookup, "MAX_REQUEST_BODY_KB", defaults.max_request_body_bytes / 1024)?;
        let max_request_body_bytes = body_limit_kb
            .checked_mul(1024)
            .with_context(|| format!("MAX_REQUEST_BODY_KB is too large: {}", body_limit_kb))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            debug: match lookup("DEBUG") {
                Some(raw) => parse_flag(&raw).with_context(|| format!("DEBUG has invalid value '{}'", raw))?,
                None => defaults.debug,
            },
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.cors_allowed_origin),
            max_request_body_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn default_log_filter(&self) -> String {
        let level = if self.debug { "debug" } else { "info" };
        format!("job_application_api={level},tower_http={level}")
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
