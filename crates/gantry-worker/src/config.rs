// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Worker configuration for connecting to the relay.

use std::fmt;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable naming the relay endpoint.
pub const ENV_RELAY: &str = "GANTRY_RELAY";

/// Environment variable for the connect timeout in milliseconds.
pub const ENV_CONNECT_TIMEOUT_MS: &str = "GANTRY_CONNECT_TIMEOUT_MS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The relay endpoint string could not be parsed.
    #[error("invalid relay endpoint {value:?}: {reason}")]
    InvalidEndpoint { value: String, reason: String },
}

/// Where the relay listens for this worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEndpoint {
    /// TCP socket address, written as `tcp://host:port` or a bare address.
    Tcp(SocketAddr),
    /// Unix domain socket path, written as `unix:///path/to.sock`.
    #[cfg(unix)]
    Unix(PathBuf),
}

impl fmt::Display for RelayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayEndpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
            #[cfg(unix)]
            RelayEndpoint::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}

impl FromStr for RelayEndpoint {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(path) = value.strip_prefix("unix://") {
            #[cfg(unix)]
            {
                if path.is_empty() {
                    return Err(ConfigError::InvalidEndpoint {
                        value: value.to_string(),
                        reason: "empty socket path".to_string(),
                    });
                }
                return Ok(RelayEndpoint::Unix(PathBuf::from(path)));
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                return Err(ConfigError::InvalidEndpoint {
                    value: value.to_string(),
                    reason: "unix sockets are not supported on this platform".to_string(),
                });
            }
        }

        let raw = value.strip_prefix("tcp://").unwrap_or(value);
        raw.parse::<SocketAddr>()
            .map(RelayEndpoint::Tcp)
            .map_err(|e| ConfigError::InvalidEndpoint {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Worker configuration for connecting to the relay.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Relay endpoint (default: `tcp://127.0.0.1:6001`).
    pub relay: RelayEndpoint,
    /// Connection timeout in milliseconds (default: 10_000).
    pub connect_timeout_ms: u64,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Optional Environment Variables
    /// - `GANTRY_RELAY` - Relay endpoint (default: "tcp://127.0.0.1:6001")
    /// - `GANTRY_CONNECT_TIMEOUT_MS` - Connect timeout (default: 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let relay = std::env::var(ENV_RELAY)
            .unwrap_or_else(|_| "tcp://127.0.0.1:6001".to_string())
            .parse()?;

        let connect_timeout_ms = std::env::var(ENV_CONNECT_TIMEOUT_MS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Ok(Self {
            relay,
            connect_timeout_ms,
        })
    }

    /// Create a configuration for local development, connecting to
    /// `127.0.0.1:6001`.
    pub fn localhost() -> Self {
        Self {
            relay: RelayEndpoint::Tcp("127.0.0.1:6001".parse().expect("static address")),
            connect_timeout_ms: 10_000,
        }
    }

    /// Set the relay endpoint.
    pub fn with_relay(mut self, relay: RelayEndpoint) -> Self {
        self.relay = relay;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parse_tcp_scheme() {
        let endpoint: RelayEndpoint = "tcp://127.0.0.1:6001".parse().unwrap();
        assert_eq!(
            endpoint,
            RelayEndpoint::Tcp("127.0.0.1:6001".parse().unwrap())
        );
    }

    #[test]
    fn test_endpoint_parse_bare_address() {
        let endpoint: RelayEndpoint = "10.0.0.1:9000".parse().unwrap();
        assert_eq!(endpoint, RelayEndpoint::Tcp("10.0.0.1:9000".parse().unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn test_endpoint_parse_unix() {
        let endpoint: RelayEndpoint = "unix:///tmp/relay.sock".parse().unwrap();
        assert_eq!(endpoint, RelayEndpoint::Unix(PathBuf::from("/tmp/relay.sock")));
    }

    #[cfg(unix)]
    #[test]
    fn test_endpoint_parse_empty_unix_path() {
        assert!("unix://".parse::<RelayEndpoint>().is_err());
    }

    #[test]
    fn test_endpoint_parse_invalid() {
        assert!("not-an-endpoint".parse::<RelayEndpoint>().is_err());
        assert!("tcp://missing-port".parse::<RelayEndpoint>().is_err());
    }

    #[test]
    fn test_endpoint_display_round_trip() {
        let endpoint: RelayEndpoint = "tcp://127.0.0.1:6001".parse().unwrap();
        let rendered = endpoint.to_string();
        let reparsed: RelayEndpoint = rendered.parse().unwrap();
        assert_eq!(endpoint, reparsed);
    }

    #[test]
    fn test_localhost_config() {
        let config = WorkerConfig::localhost();
        assert_eq!(
            config.relay,
            RelayEndpoint::Tcp("127.0.0.1:6001".parse().unwrap())
        );
        assert_eq!(config.connect_timeout_ms, 10_000);
    }

    #[test]
    fn test_builder_chain() {
        let config = WorkerConfig::localhost()
            .with_relay("tcp://192.168.1.5:7000".parse().unwrap())
            .with_connect_timeout_ms(500);

        assert_eq!(
            config.relay,
            RelayEndpoint::Tcp("192.168.1.5:7000".parse().unwrap())
        );
        assert_eq!(config.connect_timeout_ms, 500);
    }
}
