use serde::{Deserialize, Serialize};

use super::Phase;

/// One sine tone of a phase cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    /// Start offset from the beginning of the cue.
    pub offset_ms: u32,
    /// Peak gain, 0.0 .. 1.0.
    pub volume: f32,
}

const fn tone(frequency_hz: f32, duration_ms: u32, offset_ms: u32, volume: f32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        offset_ms,
        volume,
    }
}

const PREPARE: [Tone; 1] = [tone(440.0, 400, 0, 0.25)];
const ACTIVE: [Tone; 2] = [tone(523.0, 300, 0, 0.25), tone(659.0, 400, 150, 0.25)];
const COOLDOWN: [Tone; 1] = [tone(392.0, 500, 0, 0.2)];
const DONE: [Tone; 3] = [
    tone(523.0, 600, 0, 0.2),
    tone(659.0, 600, 100, 0.2),
    tone(784.0, 800, 200, 0.2),
];

/// Audible cue played on phase entry, as data for the front end to synthesize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseCue {
    pub tones: Vec<Tone>,
}

impl PhaseCue {
    /// Cue for entering `phase`; idle has none.
    pub fn for_phase(phase: Phase) -> Option<Self> {
        let tones: &[Tone] = match phase {
            Phase::Idle => return None,
            Phase::Prepare => &PREPARE,
            Phase::Active => &ACTIVE,
            Phase::Cooldown => &COOLDOWN,
            Phase::Done => &DONE,
        };
        Some(Self {
            tones: tones.to_vec(),
        })
    }

    /// Time until the last tone has faded out.
    pub fn total_ms(&self) -> u32 {
        self.tones
            .iter()
            .map(|t| t.offset_ms + t.duration_ms)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_running_phase_has_a_cue() {
        assert!(PhaseCue::for_phase(Phase::Idle).is_none());
        for phase in [Phase::Prepare, Phase::Active, Phase::Cooldown, Phase::Done] {
            assert!(PhaseCue::for_phase(phase).is_some());
        }
    }

    #[test]
    fn completion_chord_rises() {
        let cue = PhaseCue::for_phase(Phase::Done).unwrap();
        let freqs: Vec<f32> = cue.tones.iter().map(|t| t.frequency_hz).collect();
        assert_eq!(freqs, vec![523.0, 659.0, 784.0]);
        assert_eq!(cue.total_ms(), 1000);
    }
}
