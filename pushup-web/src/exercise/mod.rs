//! Exercise module - push-up repetition counting
//!
//! Re-exports only. All logic in submodules.

mod config;
mod counter;
mod feedback;
mod schedule;
mod state;

pub use config::{CounterConfig, ConfigError};
pub use counter::{CounterSnapshot, Evaluation, FrameOutcome, RepCounter};
pub use feedback::{CollaboratorFailure, Feedback};
pub use schedule::{ReturnTicket, ScheduledReturn};
pub use state::{AngleZone, RepState};
