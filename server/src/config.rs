//! Relay configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid { var: &'static str, expected: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub port: u16,
    /// Client bundle root; must contain `index.html`.
    pub static_dir: PathBuf,
    /// Outbound queue depth per connection. A peer whose queue is full misses
    /// events rather than stalling the relay.
    pub channel_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RelayConfig {
    /// Build typed relay config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: default `public`
    /// - `RELAY_CHANNEL_CAPACITY`: default 256
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_var(&lookup, "PORT", "a port number", DEFAULT_PORT)?;
        let channel_capacity = parse_var(&lookup, "RELAY_CHANNEL_CAPACITY", "a positive integer", DEFAULT_CHANNEL_CAPACITY)?;
        if channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "RELAY_CHANNEL_CAPACITY",
                expected: "a positive integer",
                value: "0".into(),
            });
        }
        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);

        Ok(Self { port, static_dir, channel_capacity })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|_| ConfigError::Invalid { var, expected, value })
}
