//! Guided timer implementation.
//!
//! The guided timer is a tick-driven state machine. It does not use
//! internal threads - the caller (or [`super::TimerDriver`]) calls `tick()`
//! once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Prepare -> Active -> Cooldown -> Done
//!            \________\__________\-----> Idle   (cancel)
//! ```
//!
//! `paused` is orthogonal to the phase and only meaningful while running.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = GuidedTimer::new(60, TimerOptions::default());
//! timer.start();
//! // Once per second:
//! for event in timer.tick() { /* render */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::cue::PhaseCue;
use crate::events::Event;
use crate::format::format_clock;

/// Settling-in phase length, seconds.
pub const PREPARE_SECS: u32 = 5;
/// Return-to-calm phase length, seconds.
pub const COOLDOWN_SECS: u32 = 5;
/// Active length used when the technique declares none.
pub const DEFAULT_ACTIVE_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Prepare,
    Active,
    Cooldown,
    Done,
}

impl Phase {
    /// Prepare, active and cooldown count down.
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Prepare | Phase::Active | Phase::Cooldown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Prepare => "prepare",
            Phase::Active => "active",
            Phase::Cooldown => "cooldown",
            Phase::Done => "done",
        }
    }
}

/// Presentation options for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerOptions {
    /// Shown and announced during the active phase.
    pub technique_name: String,
    /// Emit screen-reader announcements on phase entry.
    pub announcements: bool,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            technique_name: "Technique".to_string(),
            announcements: true,
        }
    }
}

/// Three-phase guided countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedTimer {
    options: TimerOptions,
    active_secs: u32,
    phase: Phase,
    remaining_secs: u32,
    paused: bool,
}

impl GuidedTimer {
    /// Create an idle timer. A zero `active_secs` falls back to
    /// [`DEFAULT_ACTIVE_SECS`].
    pub fn new(active_secs: u32, options: TimerOptions) -> Self {
        let active_secs = if active_secs > 0 {
            active_secs
        } else {
            DEFAULT_ACTIVE_SECS
        };
        Self {
            options,
            active_secs,
            phase: Phase::Idle,
            remaining_secs: 0,
            paused: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Counting down right now.
    pub fn is_running(&self) -> bool {
        self.phase.is_running() && !self.paused
    }

    pub fn active_secs(&self) -> u32 {
        self.active_secs
    }

    pub fn options(&self) -> &TimerOptions {
        &self.options
    }

    /// Full length of `phase`; zero for idle and done.
    pub fn phase_total(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Prepare => PREPARE_SECS,
            Phase::Active => self.active_secs,
            Phase::Cooldown => COOLDOWN_SECS,
            Phase::Idle | Phase::Done => 0,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_total(self.phase);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        (f64::from(elapsed) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Remaining time as `m:ss`.
    pub fn remaining_display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn phase_label(&self) -> String {
        match self.phase {
            Phase::Idle => "Prêt ?".to_string(),
            Phase::Prepare => "Installe-toi...".to_string(),
            Phase::Active => self.options.technique_name.clone(),
            Phase::Cooldown => "Reprends doucement...".to_string(),
            Phase::Done => "C'est fait.".to_string(),
        }
    }

    /// Announcement spoken on entering `phase`, if enabled.
    pub fn announcement(&self, phase: Phase) -> Option<String> {
        if !self.options.announcements {
            return None;
        }
        match phase {
            Phase::Idle => None,
            Phase::Prepare => Some("Phase de préparation. Installe-toi.".to_string()),
            Phase::Active => Some(format!("Phase technique. {}.", self.options.technique_name)),
            Phase::Cooldown => Some("Phase de retour. Reprends doucement.".to_string()),
            Phase::Done => Some("Terminé.".to_string()),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            paused: self.paused,
            label: self.phase_label(),
            remaining_secs: self.remaining_secs,
            total_secs: self.phase_total(self.phase),
            remaining_display: self.remaining_display(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run. Only valid from idle or done.
    pub fn start(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Idle | Phase::Done => Some(self.enter(Phase::Prepare)),
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.phase.is_running() || self.paused {
            return None;
        }
        self.paused = true;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if !self.phase.is_running() || !self.paused {
            return None;
        }
        self.paused = false;
        Some(Event::TimerResumed {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Abandon a run in progress.
    pub fn cancel(&mut self) -> Option<Event> {
        if !self.phase.is_running() {
            return None;
        }
        let event = Event::TimerCancelled {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        };
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
        self.paused = false;
        Some(event)
    }

    /// Return a finished timer to idle.
    pub fn reset(&mut self) -> Option<Event> {
        if self.phase != Phase::Done {
            return None;
        }
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
        self.paused = false;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance one second. Returns the events produced by a phase change.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running() {
            return Vec::new();
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return Vec::new();
        }
        match self.phase {
            Phase::Prepare => vec![self.enter(Phase::Active)],
            Phase::Active => vec![self.enter(Phase::Cooldown)],
            Phase::Cooldown => {
                let changed = self.enter(Phase::Done);
                tracing::debug!(technique = %self.options.technique_name, "guided timer completed");
                vec![
                    changed,
                    Event::TimerCompleted {
                        technique_name: self.options.technique_name.clone(),
                        active_secs: self.active_secs,
                        at: Utc::now(),
                    },
                ]
            }
            Phase::Idle | Phase::Done => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, phase: Phase) -> Event {
        self.phase = phase;
        self.remaining_secs = self.phase_total(phase);
        self.paused = false;
        Event::PhaseChanged {
            phase,
            remaining_secs: self.remaining_secs,
            announcement: self.announcement(phase),
            cue: PhaseCue::for_phase(phase),
            at: Utc::now(),
        }
    }
}
