use std::f32::consts::TAU;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Oscillator Waveforms
====================

  Sine:      pure tone, fundamental only
  Square:    hollow, odd harmonics falling off as 1/n
  Sawtooth:  bright, every harmonic falling off as 1/n
  Triangle:  soft, odd harmonics falling off as 1/n²

The order of `Waveform::NAMES` is the order a wave-shape control index selects
from: index 0 is sine, index 3 is triangle.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Variant names in control-index order.
    pub const NAMES: [&'static str; 4] = ["sine", "square", "sawtooth", "triangle"];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

impl FromStr for Waveform {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "sawtooth" => Ok(Waveform::Sawtooth),
            "triangle" => Ok(Waveform::Triangle),
            _ => Err(()),
        }
    }
}

/// Phase-accumulator oscillator.
///
/// Phase lives in [0, 1); the waveform is evaluated from phase, then phase
/// advances by `frequency / sample_rate`.
#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let p = self.phase;
        let sample = match self.waveform {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Triangle => {
                if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    2.0 - 4.0 * p
                } else {
                    4.0 * p - 4.0
                }
            }
        };

        self.phase = (p + frequency / sample_rate).rem_euclid(1.0);
        sample
    }

    pub fn render(&mut self, buffer: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = OscillatorBlock::new(Waveform::Sine);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, frequency, sample_rate);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn waveforms_stay_in_unit_range() {
        for name in Waveform::NAMES {
            let waveform: Waveform = name.parse().unwrap();
            let mut osc = OscillatorBlock::new(waveform);
            let mut buffer = vec![0.0f32; 1024];
            osc.render(&mut buffer, 1_234.5, 48_000.0);
            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{name} left [-1, 1]"
            );
        }
    }

    #[test]
    fn triangle_starts_at_zero_and_rises() {
        let mut osc = OscillatorBlock::new(Waveform::Triangle);
        let first = osc.next_sample(100.0, 48_000.0);
        let second = osc.next_sample(100.0, 48_000.0);
        assert_eq!(first, 0.0);
        assert!(second > first);
    }

    #[test]
    fn names_round_trip_in_table_order() {
        for (i, name) in Waveform::NAMES.iter().enumerate() {
            let waveform: Waveform = name.parse().unwrap();
            assert_eq!(waveform.name(), Waveform::NAMES[i]);
        }
        assert!("pulse".parse::<Waveform>().is_err());
    }
}
