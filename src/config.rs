//! Configuration management for the relay
//!
//! Values come from built-in defaults, then an optional `config.toml` in the
//! working directory, then `RELAY_` prefixed environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::RelayError;

const CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "RELAY";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 12345;
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// What happens when a client asks for a name that is already registered.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNamePolicy {
    /// The newcomer silently takes over the registry slot. The displaced
    /// connection stays open but no longer receives broadcasts.
    #[default]
    Replace,
    /// The newcomer is told the name is taken and disconnected.
    Reject,
}

/// Relay configuration shared by the server and the terminal client
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Host the server binds to and the client connects to
    pub bind_address: String,

    /// TCP port for both sides
    pub port: u16,

    /// Bytes read per receive call, i.e. the largest single message
    pub buffer_size: usize,

    #[serde(default)]
    pub duplicate_names: DuplicateNamePolicy,

    /// Also accept `exit` followed by one line terminator as the leave command
    #[serde(default)]
    pub lenient_exit: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            duplicate_names: DuplicateNamePolicy::Replace,
            lenient_exit: false,
        }
    }
}

impl RelayConfig {
    /// Load configuration from defaults, `config.toml` and the environment.
    pub fn load() -> Result<Self, RelayError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("buffer_size", DEFAULT_BUFFER_SIZE as i64)?
            .set_default("duplicate_names", "replace")?
            .set_default("lenient_exit", false)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: RelayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.bind_address.trim().is_empty() {
            return Err(RelayError::Config(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            )));
        }

        if self.port == 0 {
            return Err(RelayError::Config(config::ConfigError::Message(
                "port cannot be 0".into(),
            )));
        }

        if self.buffer_size == 0 {
            return Err(RelayError::Config(config::ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            )));
        }

        Ok(())
    }

    /// Bind/connect address as `host:port`
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
