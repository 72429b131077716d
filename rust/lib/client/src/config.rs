//! Client configuration.
//!
//! The API origin and request timeout come from the environment; the
//! identity-provider publishable key is chosen by the host the app is
//! served from.

use std::time::Duration;

/// Environment variable selecting the API origin.
pub const API_URL_ENV: &str = "FRIENDFRAME_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "FRIENDFRAME_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosts that must use the live identity-provider key.
pub const PRODUCTION_HOSTS: &[&str] = &["friendframe.bre.land", "paper-server.bre.land"];

const LIVE_PUBLISHABLE_KEY: &str = "pk_live_Y2xlcmsuZnJpZW5kZnJhbWUuYnJlLmxhbmQk";
const TEST_PUBLISHABLE_KEY: &str = "pk_test_Y2hhcm1lZC1vcG9zc3VtLTY0LmNsZXJrLmFjY291bnRzLmRldiQ";

/// Publishable identity-provider key for the host serving the app.
pub fn publishable_key_for_host(host: &str) -> &'static str {
    if PRODUCTION_HOSTS.contains(&host) {
        LIVE_PUBLISHABLE_KEY
    } else {
        TEST_PUBLISHABLE_KEY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API origin, e.g. `https://friendframe.bre.land/api`.
    pub base_url: String,
    /// Upper bound on a single request, connect to last byte.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `FRIENDFRAME_API_URL` and `FRIENDFRAME_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty or unparsable values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(TIMEOUT_ENV)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// The base URL without trailing slashes.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
