// ── Runtime connection configuration ──
//
// Describes *where* the field controller is and how patiently to talk to
// it. Never touches disk: the CLI builds a `ControllerConfig` from its
// profile and hands it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

pub const DEFAULT_HOST: &str = "10.59.87.50";
pub const DEFAULT_PORT: u16 = 5805;
pub const DEFAULT_SECURE_PATH: &str = "/ws";
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = fieldlink_api::DEFAULT_CONNECT_TIMEOUT;

/// Configuration for one field controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// LAN address of the controller (or of the TLS proxy in front of it).
    pub host: String,
    /// Plain WebSocket port.
    pub port: u16,
    /// Use `wss://` through the proxy instead of `ws://` to the port.
    pub secure: bool,
    /// Path the TLS proxy forwards to the controller.
    pub secure_path: String,
    /// Fixed wait between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Deadline for one dial, handshake included.
    pub connect_timeout: Duration,
    /// How long one-shot operations wait for the controller.
    pub timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            secure: false,
            secure_path: DEFAULT_SECURE_PATH.into(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ControllerConfig {
    /// WebSocket endpoint: `wss://{host}{secure_path}` when secure,
    /// `ws://{host}:{port}` otherwise.
    pub fn ws_url(&self) -> Result<Url, CoreError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(CoreError::Config {
                message: "controller host is empty".into(),
            });
        }

        let raw = if self.secure {
            let path = self.secure_path.trim();
            if path.starts_with('/') {
                format!("wss://{host}{path}")
            } else {
                format!("wss://{host}/{path}")
            }
        } else {
            format!("ws://{host}:{}", self.port)
        };

        Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("invalid controller address '{raw}': {e}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_url_uses_port() {
        let url = ControllerConfig::default().ws_url().unwrap();
        assert_eq!(url.as_str(), "ws://10.59.87.50:5805/");
    }

    #[test]
    fn secure_url_goes_through_proxy_path() {
        let config = ControllerConfig {
            host: "field.local".into(),
            secure: true,
            ..ControllerConfig::default()
        };
        assert_eq!(config.ws_url().unwrap().as_str(), "wss://field.local/ws");

        let config = ControllerConfig {
            secure_path: "controller".into(),
            ..config
        };
        assert_eq!(
            config.ws_url().unwrap().as_str(),
            "wss://field.local/controller"
        );
    }

    #[test]
    fn empty_host_is_rejected() {
        let config = ControllerConfig {
            host: "  ".into(),
            ..ControllerConfig::default()
        };
        assert!(matches!(config.ws_url(), Err(CoreError::Config { .. })));
    }
}
