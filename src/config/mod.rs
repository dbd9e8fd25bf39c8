// * Runtime configuration for the prober and the suite runner.
// * Defaults come from `constants`; the environment may override them.

pub mod constants;

use crate::network::cookies::CookiePolicy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

// * Environment variables read by `ProbeConfig::from_env`
pub const ENV_BASE_URL: &str = "MMODE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "MMODE_TIMEOUT_MS";
pub const ENV_COOKIE_POLICY: &str = "MMODE_COOKIE_POLICY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL {value:?}: {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid timeout {0:?} (expected milliseconds > 0)")]
    Timeout(String),

    #[error("Unknown cookie policy {0:?} (expected \"jar\" or \"first-request\")")]
    CookiePolicy(String),
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub max_redirects: usize,
    pub cookie_policy: CookiePolicy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            // ! CRITICAL: constant is a valid absolute URL
            base_url: Url::parse(constants::DEFAULT_BASE_URL)
                .expect("! CRITICAL: DEFAULT_BASE_URL must parse"),
            timeout: Duration::from_millis(constants::REQUEST_TIMEOUT_MS),
            max_redirects: constants::MAX_REDIRECTS,
            cookie_policy: CookiePolicy::default(),
        }
    }
}

impl ProbeConfig {
    // * Builds a config pointed at `base_url` with all other defaults.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    // * Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // * Same as `from_env`, over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BASE_URL) {
            config.base_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Timeout(raw.clone()))?;
            if millis == 0 {
                return Err(ConfigError::Timeout(raw));
            }
            config.timeout = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(ENV_COOKIE_POLICY) {
            config.cookie_policy = raw
                .parse()
                .map_err(|_| ConfigError::CookiePolicy(raw.clone()))?;
        }

        Ok(config)
    }
}

// * A base URL without a trailing slash would make `join` drop its last segment.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&with_slash).map_err(|source| ConfigError::BaseUrl {
        value: raw.to_string(),
        source,
    })
}
