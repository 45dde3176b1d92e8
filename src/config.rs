#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::tempo::{TempoConfig, TempoError};

/// Startup configuration for the step synth.
///
/// Every field has a default matching the stock instrument: eight steps in
/// 4/4 at 120 BPM, each step a 400 Hz note held for 200 ms.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Number of steps in the pattern
    pub steps: usize,
    /// Steps grouped per beat divisor (4 = steps are sixteenths of a 4/4 bar)
    pub signature: u32,
    /// Initial frequency for every step (Hz)
    pub note_frequency: f32,
    /// Initial note length for every step (ms)
    pub note_duration_ms: f32,
    /// Longest delay time the delay line can hold (seconds)
    pub max_delay_seconds: f32,
}

impl SynthConfig {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            steps: 8,
            signature: 4,
            note_frequency: 400.0,
            note_duration_ms: 200.0,
            max_delay_seconds: 1.0,
        }
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_signature(mut self, signature: u32) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_note(mut self, frequency: f32, duration_ms: f32) -> Self {
        self.note_frequency = frequency;
        self.note_duration_ms = duration_ms;
        self
    }

    /// Validated tempo derived from this configuration.
    pub fn tempo(&self) -> Result<TempoConfig, TempoError> {
        TempoConfig::new(self.bpm, self.steps, self.signature)
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tempo_is_a_quarter_second_per_step() {
        let tempo = SynthConfig::default().tempo().unwrap();
        assert!((tempo.step_interval_ms() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = SynthConfig::new()
            .with_bpm(90.0)
            .with_steps(16)
            .with_signature(4)
            .with_note(220.0, 50.0);
        assert_eq!(config.steps, 16);
        assert_eq!(config.note_frequency, 220.0);
        assert_eq!(config.note_duration_ms, 50.0);
        assert!(config.tempo().is_ok());
    }

    #[test]
    fn zero_steps_is_rejected() {
        assert!(SynthConfig::new().with_steps(0).tempo().is_err());
    }
}
