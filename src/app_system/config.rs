use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const STORE_RESPONSE_DELAY_VAR: &str = "MARKET_STORE_RESPONSE_DELAY_MS";
pub const COUNTER_ACCEPT_DELAY_VAR: &str = "MARKET_COUNTER_ACCEPT_DELAY_MS";
pub const ACTOR_BUFFER_VAR: &str = "MARKET_ACTOR_BUFFER";
pub const NOTIFICATION_BUFFER_VAR: &str = "MARKET_NOTIFICATION_BUFFER";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Delays for the simulated store replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationTimings {
    /// From `Requested` to the store's offer.
    pub store_response_delay: Duration,
    /// From the buyer's counter to the store accepting it.
    pub counter_accept_delay: Duration,
}

impl Default for NegotiationTimings {
    fn default() -> Self {
        Self {
            store_response_delay: Duration::from_millis(2000),
            counter_accept_delay: Duration::from_millis(3000),
        }
    }
}

/// Runtime settings for the market system.
///
/// Log verbosity is not here; it comes from `RUST_LOG` (see [`super::setup_tracing`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub timings: NegotiationTimings,
    pub actor_buffer: usize,
    pub notification_buffer: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            timings: NegotiationTimings::default(),
            actor_buffer: 32,
            notification_buffer: 64,
        }
    }
}

impl MarketConfig {
    /// Defaults overridden by any `MARKET_*` variables present in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = parse_var::<u64>(&lookup, STORE_RESPONSE_DELAY_VAR)? {
            config.timings.store_response_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, COUNTER_ACCEPT_DELAY_VAR)? {
            config.timings.counter_accept_delay = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<usize>(&lookup, ACTOR_BUFFER_VAR)? {
            config.actor_buffer = nonzero(ACTOR_BUFFER_VAR, size)?;
        }
        if let Some(size) = parse_var::<usize>(&lookup, NOTIFICATION_BUFFER_VAR)? {
            config.notification_buffer = nonzero(NOTIFICATION_BUFFER_VAR, size)?;
        }
        debug!(?config, "Configuration resolved");
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

// tokio channels panic on a zero capacity
fn nonzero(key: &'static str, size: usize) -> Result<usize, ConfigError> {
    if size == 0 {
        Err(ConfigError::InvalidValue { key, value: size.to_string() })
    } else {
        Ok(size)
    }
}
