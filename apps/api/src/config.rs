use anyhow::{bail, Context, Result};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// 30 days.
const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Where documents and user records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// In-process maps. Contents are lost on restart.
    Memory,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Required when `storage_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub session_secret: String,
    pub session_ttl_secs: i64,
    /// Without a key every generation request takes the template path.
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend =
            StorageBackend::parse(&std::env::var("STORAGE_BACKEND").unwrap_or_default())?;

        let database_url = match storage_backend {
            StorageBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StorageBackend::Memory => optional_env("DATABASE_URL"),
        };

        Ok(Config {
            storage_backend,
            database_url,
            session_secret: session_secret(&require_env("SESSION_SECRET")?)?,
            session_ttl_secs: session_ttl_secs(optional_env("SESSION_TTL_SECS").as_deref())?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_api_url: optional_env("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Tokens signed with an empty key can be forged by anyone.
fn session_secret(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        bail!("SESSION_SECRET must not be empty");
    }
    Ok(raw.to_string())
}

fn session_ttl_secs(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_TTL_SECS);
    };
    let ttl = raw
        .parse::<i64>()
        .context("SESSION_TTL_SECS must be an integer number of seconds")?;
    if ttl <= 0 {
        bail!("SESSION_TTL_SECS must be positive, got {ttl}");
    }
    Ok(ttl)
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_defaults_to_postgres() {
        assert_eq!(StorageBackend::parse("").unwrap(), StorageBackend::Postgres);
        assert_eq!(
            StorageBackend::parse("Postgres").unwrap(),
            StorageBackend::Postgres
        );
    }

    #[test]
    fn test_storage_backend_memory() {
        assert_eq!(
            StorageBackend::parse(" memory ").unwrap(),
            StorageBackend::Memory
        );
    }

    #[test]
    fn test_storage_backend_rejects_unknown() {
        assert!(StorageBackend::parse("mongo").is_err());
    }

    #[test]
    fn test_session_secret_must_not_be_blank() {
        assert!(session_secret("").is_err());
        assert!(session_secret("  \t").is_err());
        assert_eq!(session_secret("s3cret").unwrap(), "s3cret");
    }

    #[test]
    fn test_session_ttl_must_be_positive() {
        assert_eq!(session_ttl_secs(None).unwrap(), DEFAULT_SESSION_TTL_SECS);
        assert_eq!(session_ttl_secs(Some("3600")).unwrap(), 3600);
        assert!(session_ttl_secs(Some("0")).is_err());
        assert!(session_ttl_secs(Some("-60")).is_err());
        assert!(session_ttl_secs(Some("soon")).is_err());
    }
}
