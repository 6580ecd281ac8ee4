// ── Core error types ──
//
// Nothing in the sync path is fatal: transport trouble is retried inside
// `fieldlink-api` and bad frames are dropped. These variants only surface
// at the edges -- building a client, validating a command, or waiting on
// the controller with a deadline.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Controller client has been shut down")]
    Shutdown,

    #[error("Timed out after {timeout_secs}s waiting for the controller")]
    Timeout { timeout_secs: u64 },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fieldlink_api::Error> for CoreError {
    fn from(err: fieldlink_api::Error) -> Self {
        match err {
            fieldlink_api::Error::Shutdown => CoreError::Shutdown,
            other => CoreError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_shutdown_stays_shutdown() {
        assert!(matches!(
            CoreError::from(fieldlink_api::Error::Shutdown),
            CoreError::Shutdown
        ));
    }

    #[test]
    fn socket_failures_are_internal() {
        let err = CoreError::from(fieldlink_api::Error::WebSocketConnect("reset".into()));
        assert!(matches!(err, CoreError::Internal(ref m) if m.contains("reset")));
    }
}
