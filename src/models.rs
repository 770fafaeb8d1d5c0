//! Configuration and credential types
//!
//! The credential is read once when a client is built; a missing key is a
//! startup failure rather than something each call has to handle.

use crate::{Error, Result};
use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GOOGLE_AI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// API credential. Never printed: `Debug` and `Display` both redact it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub request_timeout: Duration,
    /// Overall limit for one call, retries and backoff included.
    pub call_deadline: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} not set", API_KEY_VAR)))?;

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        let base_url = lookup("GEMINI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = Duration::from_secs(
            parse_secs(&lookup, "GEMINI_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        let call_deadline = parse_secs(&lookup, "GEMINI_DEADLINE_SECS")?.map(Duration::from_secs);

        Ok(Self {
            api_key: ApiKey::new(api_key),
            model,
            base_url,
            request_timeout,
            call_deadline,
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds, got '{}'", key, raw))
            })
        })
        .transpose()
}
