use std::fmt;

use anyhow::{bail, Context};

/// One year.
const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub session_ttl_minutes: i64,
    pub cookie_secure: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Missing required
    /// values and unparsable optional ones are both errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let session_ttl_minutes = parse_or(&lookup, "SESSION_TTL_MINUTES", 60 * 24)?;
        if session_ttl_minutes <= 0 {
            bail!("SESSION_TTL_MINUTES must be positive");
        }
        if session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            bail!("SESSION_TTL_MINUTES must not exceed {MAX_SESSION_TTL_MINUTES}");
        }

        let auth = AuthConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "taskboard".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "taskboard-users".into()),
            session_ttl_minutes,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", true)?,
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            auth,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
