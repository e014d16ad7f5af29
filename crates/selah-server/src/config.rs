use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::info;

use selah_feed::PagePolicy;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub page_policy: PagePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("SELAH_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("SELAH_JWT_SECRET is unset or still a placeholder; it must match the auth provider's secret");
        }

        let defaults = PagePolicy::default();
        let page_policy = PagePolicy {
            max_limit: parse_or(&get, "SELAH_FEED_MAX_LIMIT", defaults.max_limit)?,
            overfetch_cap: parse_or(&get, "SELAH_FEED_OVERFETCH_CAP", defaults.overfetch_cap)?,
            ..defaults
        };
        if page_policy.max_limit == 0 || page_policy.max_limit > defaults.max_limit {
            bail!(
                "SELAH_FEED_MAX_LIMIT must be between 1 and {}, got {}",
                defaults.max_limit,
                page_policy.max_limit
            );
        }

        Ok(Self {
            jwt_secret,
            db_path: get("SELAH_DB_PATH").unwrap_or_else(|| "selah.db".into()).into(),
            host: get("SELAH_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "SELAH_PORT", 3000)?,
            page_policy,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw.parse().with_context(|| format!("Invalid {} value '{}'", key, raw)),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
