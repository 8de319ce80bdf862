//! Guided three-phase timer.
//!
//! [`GuidedTimer`] is the pure state machine; [`TimerDriver`] runs one on
//! tokio with a one-second tick.

mod cue;
mod driver;
mod engine;

pub use cue::{PhaseCue, Tone};
pub use driver::{TimerCommand, TimerDriver};
pub use engine::{
    GuidedTimer, Phase, TimerOptions, COOLDOWN_SECS, DEFAULT_ACTIVE_SECS, PREPARE_SECS,
};
