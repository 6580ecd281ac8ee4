use thiserror::Error;

/// Top-level error type for the `fieldlink-api` crate.
///
/// Connection failures never escape the reconnect loop; `WebSocketConnect`
/// is only ever logged there. Callers observe `Shutdown` and
/// `Serialization`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Dial, handshake or socket I/O failed (refused, reset, timed out).
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// The transport was torn down; no further sends are accepted.
    #[error("Transport has been shut down")]
    Shutdown,

    // ── Data ────────────────────────────────────────────────────────
    /// Outbound command could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
