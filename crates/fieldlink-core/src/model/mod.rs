// ── Match domain model ──
//
// Canonical, presentation-facing types. Everything the controller reports
// is folded into these closed enums before a consumer sees it, so an
// unknown string from newer firmware can never reach a renderer.

pub mod hub;
pub mod led;
pub mod period;
pub mod scoring;
pub mod snapshot;
pub mod state;

// ── Re-exports ──────────────────────────────────────────────────────

pub use hub::{HubStatus, HubStatuses};
pub use led::LedMode;
pub use period::Period;
pub use scoring::{SCORING_LOG_CAPACITY, ScoringEvent, ScoringLog};
pub use snapshot::RemoteStatusSnapshot;
pub use state::{DerivedMatchState, MotorState};

// Wire vocabulary that is also domain vocabulary.
pub use fieldlink_api::{Alliance, AutoWinnerChoice, FieldSafeMode, ForceMode};
