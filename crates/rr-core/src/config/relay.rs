//! Relay configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::serde_utils::duration_secs;
use crate::error::ConfigError;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// RCON peer settings
    pub rcon: RconConfig,
    /// HTTP front end settings
    pub http: HttpConfig,
}

impl RelayConfig {
    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rcon.host.trim().is_empty() {
            return Err(ConfigError::Invalid("rcon.host must not be empty".into()));
        }
        if self.rcon.port == 0 {
            return Err(ConfigError::Invalid("rcon.port must not be 0".into()));
        }
        for (key, value) in [
            ("rcon.connect_timeout", self.rcon.connect_timeout),
            ("rcon.auth_timeout", self.rcon.auth_timeout),
            ("rcon.reconnect_interval", self.rcon.reconnect_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid(format!("{} must be at least 1 second", key)));
            }
        }
        if self.rcon.max_pending == 0 {
            return Err(ConfigError::Invalid("rcon.max_pending must be at least 1".into()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Invalid("http.bind_address must not be empty".into()));
        }
        Ok(())
    }
}

/// Connection settings for the game server's RCON endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RconConfig {
    /// Peer hostname or IP
    pub host: String,

    /// Peer RCON port
    pub port: u16,

    /// Shared secret sent in the auth packet
    pub password: String,

    /// Bound on a single TCP connect attempt
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,

    /// Bound on waiting for the auth response
    #[serde(with = "duration_secs")]
    pub auth_timeout: Duration,

    /// Bound on waiting for a command response (0 = wait until the
    /// response or a disconnect arrives)
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,

    /// Fixed delay before each reconnect attempt
    #[serde(with = "duration_secs")]
    pub reconnect_interval: Duration,

    /// Maximum number of commands awaiting a response
    pub max_pending: usize,

    /// Keep reconnecting after the server rejects the password
    pub retry_on_auth_failure: bool,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25575,
            password: String::new(),
            connect_timeout: Duration::from_secs(5),
            auth_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            reconnect_interval: Duration::from_secs(5),
            max_pending: 64,
            retry_on_auth_failure: true,
        }
    }
}

impl RconConfig {
    /// `host:port` for connecting
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request timeout, or `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (!self.request_timeout.is_zero()).then_some(self.request_timeout)
    }
}

/// HTTP front end settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,

    /// Directory of static files served at `/`
    pub public_dir: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            public_dir: PathBuf::from("public"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.rcon.address(), "localhost:25575");
        assert_eq!(config.rcon.reconnect_interval, Duration::from_secs(5));
        assert!(config.rcon.retry_on_auth_failure);
        assert_eq!(config.http.bind_address, "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
[rcon]
host = "10.0.0.5"
password = "hunter2"
request_timeout = 0
"#,
        )
        .unwrap();

        assert_eq!(config.rcon.address(), "10.0.0.5:25575");
        assert_eq!(config.rcon.password, "hunter2");
        assert_eq!(config.rcon.request_timeout(), None);
        assert_eq!(config.rcon.max_pending, 64);
        assert_eq!(config.http.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RelayConfig::default();
        config.rcon.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RelayConfig::default();
        config.rcon.max_pending = 0;
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.rcon.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let config: RelayConfig = toml::from_str("[rcon]\nreconnect_interval = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(msg)) if msg.contains("reconnect_interval")
        ));

        let config: RelayConfig = toml::from_str("[rcon]\nconnect_timeout = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(msg)) if msg.contains("connect_timeout")
        ));

        let mut config = RelayConfig::default();
        config.rcon.auth_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        // Zero here means "no timeout", not a busy loop
        let config: RelayConfig = toml::from_str("[rcon]\nrequest_timeout = 0\n").unwrap();
        assert!(config.validate().is_ok());
    }
}
