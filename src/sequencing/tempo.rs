use thiserror::Error;

/// Shortest gap allowed between two step triggers. Anything faster would
/// fire several steps inside one audio frame.
pub const MIN_STEP_INTERVAL_MS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TempoError {
    #[error("tempo must be a positive, finite BPM (got {0})")]
    InvalidBpm(f64),

    #[error("{bpm} BPM puts steps {interval_ms} ms apart; the minimum is 1 ms")]
    TooFast { bpm: f64, interval_ms: f64 },

    #[error("a pattern needs at least one step")]
    NoSteps,

    #[error("signature must be at least 1")]
    ZeroSignature,
}

/// Tempo of the step pattern.
///
/// `steps / signature` is the number of beats one pass of the pattern spans,
/// so with 8 steps and a signature of 4 every step is half a beat.
///
/// Only built through [`TempoConfig::new`], so every value in circulation
/// has at least one step and a step interval of at least
/// [`MIN_STEP_INTERVAL_MS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoConfig {
    bpm: f64,
    steps: usize,
    signature: u32,
}

impl TempoConfig {
    pub fn new(bpm: f64, steps: usize, signature: u32) -> Result<Self, TempoError> {
        validate_bpm(bpm)?;
        if steps == 0 {
            return Err(TempoError::NoSteps);
        }
        if signature == 0 {
            return Err(TempoError::ZeroSignature);
        }
        Self {
            bpm,
            steps,
            signature,
        }
        .checked()
    }

    /// Same steps and signature at a new tempo.
    pub fn with_bpm(self, bpm: f64) -> Result<Self, TempoError> {
        validate_bpm(bpm)?;
        Self { bpm, ..self }.checked()
    }

    fn checked(self) -> Result<Self, TempoError> {
        let interval_ms = self.step_interval_ms();
        if interval_ms < MIN_STEP_INTERVAL_MS {
            return Err(TempoError::TooFast {
                bpm: self.bpm,
                interval_ms,
            });
        }
        Ok(self)
    }

    /// Beats per minute
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Steps in one pass of the pattern
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Steps-per-beat divisor
    pub fn signature(&self) -> u32 {
        self.signature
    }

    /// Wall-clock time between consecutive step triggers.
    ///
    /// Formula: (60000 / (steps / signature)) / bpm
    pub fn step_interval_ms(&self) -> f64 {
        let beats_per_pass = self.steps as f64 / self.signature as f64;
        (60_000.0 / beats_per_pass) / self.bpm
    }

    /// Whether the pattern spans a whole number of beats. Uneven ratios still
    /// produce a usable interval; it just drifts against the bar.
    pub fn divides_evenly(&self) -> bool {
        self.steps % self.signature as usize == 0
    }
}

fn validate_bpm(bpm: f64) -> Result<(), TempoError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        Err(TempoError::InvalidBpm(bpm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_steps_in_four_at_120() {
        let tempo = TempoConfig::new(120.0, 8, 4).unwrap();
        // (60000 / (8 / 4)) / 120 = 250
        assert_eq!(tempo.step_interval_ms(), 250.0);
        assert!(tempo.divides_evenly());
    }

    #[test]
    fn test_sixteen_steps_in_four_at_120() {
        let tempo = TempoConfig::new(120.0, 16, 4).unwrap();
        assert_eq!(tempo.step_interval_ms(), 125.0);
    }

    #[test]
    fn test_uneven_ratio_is_approximate_not_an_error() {
        let tempo = TempoConfig::new(120.0, 7, 4).unwrap();
        assert!(!tempo.divides_evenly());
        assert!((tempo.step_interval_ms() - 285.714_285).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert_eq!(TempoConfig::new(0.0, 8, 4), Err(TempoError::InvalidBpm(0.0)));
        assert!(TempoConfig::new(-10.0, 8, 4).is_err());
        assert!(TempoConfig::new(f64::NAN, 8, 4).is_err());
        assert_eq!(TempoConfig::new(120.0, 0, 4), Err(TempoError::NoSteps));
        assert_eq!(TempoConfig::new(120.0, 8, 0), Err(TempoError::ZeroSignature));
    }

    #[test]
    fn test_with_bpm_keeps_shape() {
        let tempo = TempoConfig::new(120.0, 8, 4).unwrap();
        let faster = tempo.with_bpm(240.0).unwrap();
        assert_eq!(faster.steps(), 8);
        assert_eq!(faster.step_interval_ms(), 125.0);
        assert!(tempo.with_bpm(0.0).is_err());
    }

    #[test]
    fn test_tempo_faster_than_one_step_per_ms_is_rejected() {
        let tempo = TempoConfig::new(120.0, 8, 4).unwrap();
        assert!(matches!(tempo.with_bpm(1.0e9), Err(TempoError::TooFast { .. })));
        // 30000 BPM in 8/4 is exactly 1 ms per step
        assert_eq!(tempo.with_bpm(30_000.0).unwrap().step_interval_ms(), 1.0);
        assert!(tempo.with_bpm(30_001.0).is_err());
        assert!(matches!(
            TempoConfig::new(120.0, 1_000_000, 1),
            Err(TempoError::TooFast { .. })
        ));
    }
}
