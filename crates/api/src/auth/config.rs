use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Session settings. Only `JWT_SECRET` is required.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration_minutes: u64,
    pub refresh_token_expiration_days: u64,
    pub cookie_domain: Option<String>,
    /// Adds `Secure` and tightens the refresh cookie to `SameSite=Strict`.
    pub cookie_secure: bool,
}

/// Read `name`, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            jwt_secret,
            access_token_expiration_minutes: env_or("ACCESS_TOKEN_EXPIRATION_MINUTES", 15),
            refresh_token_expiration_days: env_or("REFRESH_TOKEN_EXPIRATION_DAYS", 7),
            cookie_domain: env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()),
            cookie_secure: env_or("COOKIE_SECURE", true),
        })
    }

    /// Refresh cookie `Max-Age`, matching the stored token's lifetime.
    pub fn refresh_max_age_secs(&self) -> u64 {
        self.refresh_token_expiration_days * 24 * 60 * 60
    }
}
