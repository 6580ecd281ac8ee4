// fieldlink-api: Wire protocol, codec, and WebSocket transport for the field controller.

pub mod codec;
pub mod error;
pub mod protocol;
pub mod websocket;

pub use codec::Envelope;
pub use error::Error;
pub use protocol::{
    Alliance, AutoWinnerChoice, FieldSafeMode, ForceMode, MatchStatus, OutboundMessage,
    ScoreMessage, StatusMessage,
};
pub use websocket::{
    ConnectionState, DEFAULT_CONNECT_TIMEOUT, ReconnectConfig, Transport, TransportConfig,
};
