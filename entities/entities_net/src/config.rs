//! Configuration Module
//!
//! Listener backlog and the per-socket options applied by
//! `Net::configure`. Defaults match what an event loop usually wants; any
//! field can be overridden from the environment.

use thiserror::Error;

/// Environment variable for [`NetConfig::backlog`]
pub const ENV_BACKLOG: &str = "NET_BACKLOG";
/// Environment variable for [`NetConfig::send_buffer`]
pub const ENV_SEND_BUFFER: &str = "NET_SNDBUF";
/// Environment variable for [`NetConfig::recv_buffer`]
pub const ENV_RECV_BUFFER: &str = "NET_RCVBUF";
/// Environment variable for [`NetConfig::no_linger`]
pub const ENV_NO_LINGER: &str = "NET_NO_LINGER";

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Net layer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetConfig {
    /// Backlog used by `Net::listen_default`
    pub backlog: i32,
    /// `SO_SNDBUF` to apply, if any
    pub send_buffer: Option<i32>,
    /// `SO_RCVBUF` to apply, if any
    pub recv_buffer: Option<i32>,
    /// Reset connections on close instead of lingering
    pub no_linger: bool,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            backlog: 128,
            send_buffer: None,
            recv_buffer: None,
            no_linger: false,
        }
    }
}

impl NetConfig {
    /// Build a configuration from the process environment
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value for a variable name, or `None` if unset
    ///
    /// # Returns
    ///
    /// * `Ok(NetConfig)` - Defaults overlaid with every value found
    /// * `Err(ConfigError)` - A value was present but malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(backlog) = parse_int(&lookup, ENV_BACKLOG)? {
            config.backlog = backlog;
        }
        config.send_buffer = parse_int(&lookup, ENV_SEND_BUFFER)?.or(config.send_buffer);
        config.recv_buffer = parse_int(&lookup, ENV_RECV_BUFFER)?.or(config.recv_buffer);
        if let Some(value) = lookup(ENV_NO_LINGER) {
            config.no_linger = match value.trim() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_NO_LINGER,
                        value,
                    })
                }
            };
        }
        Ok(config)
    }
}

fn parse_int<F>(lookup: &F, key: &'static str) -> Result<Option<i32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
