use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Longest accepted session lifetime: 30 days.
pub const MAX_SESSION_TTL: usize = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl: usize,
    pub cookie_secure: bool,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    // Development affordances
    pub allow_initialize_db: bool,
    pub seed_on_startup: bool,

    pub log_dir: String,
}

/// Reads `key`, falling back to `default` when unset.
fn var_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:5001")?,
            database_url: var_or("DATABASE_URL", "sqlite://leave_data.db")?,
            session_secret: env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            session_ttl: var_or("SESSION_TTL", "28800")?, // default 8 hours
            cookie_secure: var_or("COOKIE_SECURE", "false")?,

            rate_login_per_min: var_or("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", "1000")?,

            allow_initialize_db: var_or("ALLOW_INITIALIZE_DB", "false")?,
            seed_on_startup: var_or("SEED_ON_STARTUP", "false")?,

            log_dir: var_or("LOG_DIR", "logs")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.session_secret.len() < 16 {
            bail!("SESSION_SECRET must be at least 16 characters");
        }
        if self.session_ttl == 0 {
            bail!("SESSION_TTL must be greater than zero");
        }
        if self.session_ttl > MAX_SESSION_TTL {
            bail!("SESSION_TTL must be at most {MAX_SESSION_TTL} seconds");
        }
        if self.rate_login_per_min == 0 || self.rate_protected_per_min == 0 {
            bail!("rate limits must be at least 1 request per minute");
        }
        Ok(())
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            session_secret: "test-session-secret-0123456789".to_string(),
            session_ttl: 3600,
            cookie_secure: false,
            rate_login_per_min: 1000,
            rate_protected_per_min: 10_000,
            allow_initialize_db: true,
            seed_on_startup: false,
            log_dir: "logs".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let config = Config {
            session_secret: "short".to_string(),
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn session_ttl_is_bounded() {
        let too_long = Config {
            session_ttl: usize::MAX,
            ..Config::for_tests()
        };
        assert!(too_long.validate().is_err());

        let longest = Config {
            session_ttl: MAX_SESSION_TTL,
            ..Config::for_tests()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let config = Config {
            rate_login_per_min: 0,
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_is_valid() {
        assert!(Config::for_tests().validate().is_ok());
    }
}
