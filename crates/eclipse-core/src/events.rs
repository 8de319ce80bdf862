use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, PhaseCue};

/// Every timer state change produces an Event.
/// Front ends render them; the caller records history on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A new phase began.
    PhaseChanged {
        phase: Phase,
        remaining_secs: u32,
        /// Screen-reader text, `None` when announcements are off.
        announcement: Option<String>,
        cue: Option<PhaseCue>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The cooldown finished; emitted once per run.
    TimerCompleted {
        technique_name: String,
        active_secs: u32,
        at: DateTime<Utc>,
    },
    /// The run was abandoned before completion.
    TimerCancelled {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A finished timer went back to idle.
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        paused: bool,
        label: String,
        remaining_secs: u32,
        total_secs: u32,
        remaining_display: String,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::PhaseChanged { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::TimerCancelled { at, .. }
            | Event::TimerReset { at }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }

    /// True for events after which the timer no longer ticks.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. } | Event::TimerCancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TimerPaused {
            phase: Phase::Active,
            remaining_secs: 12,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["phase"], "active");
        assert_eq!(json["remaining_secs"], 12);
    }

    #[test]
    fn terminal_events() {
        let at = Utc::now();
        assert!(Event::TimerCancelled {
            phase: Phase::Prepare,
            remaining_secs: 0,
            at
        }
        .is_terminal());
        assert!(!Event::TimerReset { at }.is_terminal());
    }
}
