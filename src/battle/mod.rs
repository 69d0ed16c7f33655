//! The battle session: turn manager and clash controller.
//!
//! - `Battle`: Owns all mutable battle state; the only writer
//! - `ClashOutcome`: What a resolved clash did
//! - `NotificationSink`: User-facing messages for rejected and completed actions
//! - `Pacer`: Optional, cancellable presentation steps

mod clash;
mod notify;
mod pacing;
mod session;
mod turn;

pub use clash::ClashOutcome;
pub use notify::{Notification, NotificationSink, Severity, TracingSink, HISTORY_LIMIT};
pub use pacing::{Pacer, PacingStep, PacingToken, ScheduledStep};
pub use session::{Battle, EffectsMut};
