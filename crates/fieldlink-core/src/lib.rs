//! Controller-authoritative state layer between `fieldlink-api` and the
//! presentation (CLI, dashboards).
//!
//! The field controller is the only source of truth for match time, scores,
//! hub activation, and lighting. This crate never advances time or predicts
//! a score; it folds whatever the controller last reported into a stable,
//! enumerated view and forwards operator commands back.
//!
//! - **[`FieldController`]**: Facade owning the transport, the sync task,
//!   and the [`MatchStore`]. The first `connect()` spawns the background tasks;
//!   [`disconnect()`](FieldController::disconnect) tears them down for good.
//!
//! - **[`Synchronizer`]**: Pure, timer-free fold of inbound envelopes into
//!   [`DerivedMatchState`] plus the bounded [`ScoringLog`].
//!
//! - **[`MatchStore`]**: Read-only, `watch`-backed publication of the
//!   derived state. The sync task is its only writer.
//!
//! - **[`Command`] / [`CommandSender`]**: Validated operator intents. Sending
//!   never touches local state; effects show up in the next status snapshot.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod derive;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandSender};
pub use config::ControllerConfig;
pub use controller::FieldController;
pub use error::CoreError;
pub use store::MatchStore;
pub use stream::MatchStream;
pub use sync::{Applied, Synchronizer};

pub use fieldlink_api::ConnectionState;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alliance, AutoWinnerChoice, DerivedMatchState, FieldSafeMode, ForceMode, HubStatus,
    HubStatuses, LedMode, MotorState, Period, RemoteStatusSnapshot, ScoringEvent, ScoringLog,
};
