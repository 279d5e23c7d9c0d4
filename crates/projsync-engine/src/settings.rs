//! Engine settings read from the environment.

use std::time::Duration;

use projsync_access::{RetryPolicy, DEFAULT_TIMEOUT};

/// Tuning shared by every client the engine builds for a run.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Bound on every remote call.
    pub request_timeout: Duration,

    /// Retries for transport and 5xx failures. Zero by default, so a single
    /// attempt's outcome is final.
    pub retry: RetryPolicy,

    pub user_agent: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            user_agent: concat!("projsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl EngineSettings {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load settings from a custom variable reader.
    ///
    /// Tests supply variables this way without touching process-global state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let defaults = Self::default();

        let request_timeout = match reader("PROJSYNC_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = parse_var::<u64>("PROJSYNC_REQUEST_TIMEOUT_SECS", &raw)?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue(
                        "PROJSYNC_REQUEST_TIMEOUT_SECS".into(),
                        "timeout must be at least one second".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.request_timeout,
        };

        let max_retries = match reader("PROJSYNC_MAX_RETRIES") {
            Ok(raw) => parse_var::<u32>("PROJSYNC_MAX_RETRIES", &raw)?,
            Err(_) => defaults.retry.max_retries,
        };

        let base_delay = match reader("PROJSYNC_RETRY_BASE_DELAY_MS") {
            Ok(raw) => Duration::from_millis(parse_var::<u64>("PROJSYNC_RETRY_BASE_DELAY_MS", &raw)?),
            Err(_) => defaults.retry.base_delay,
        };

        Ok(Self {
            request_timeout,
            retry: RetryPolicy::new(max_retries, base_delay),
            user_agent: defaults.user_agent,
        })
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the retry budget, keeping the configured backoff.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry = RetryPolicy::new(max_retries, self.retry.base_delay);
        self
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.into(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
