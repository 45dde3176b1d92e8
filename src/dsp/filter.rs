use std::f32::consts::PI;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | passes                      | rejects / shapes              |
| --------- | --------------------------- | ----------------------------- |
| lowpass   | below cutoff                | above cutoff                  |
| highpass  | above cutoff                | below cutoff                  |
| bandpass  | around cutoff               | both sides                    |
| lowshelf  | everything                  | boosts/cuts below cutoff      |
| peaking   | everything                  | boosts/cuts around cutoff     |
| notch     | everything but cutoff       | at cutoff                     |
| allpass   | every frequency at 0 dB     | shifts phase around cutoff    |

All seven responses come from one TPT state-variable core:

    out = m0 * input + m1 * band + m2 * low

with (m0, m1, m2) picked per type. Shelf and peaking use `gain_db`; the rest
ignore it.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    LowShelf,
    Peaking,
    Notch,
    AllPass,
}

impl FilterType {
    /// Variant names in control-index order.
    pub const NAMES: [&'static str; 7] = [
        "lowpass", "highpass", "bandpass", "lowshelf", "peaking", "notch", "allpass",
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterType::LowPass => "lowpass",
            FilterType::HighPass => "highpass",
            FilterType::BandPass => "bandpass",
            FilterType::LowShelf => "lowshelf",
            FilterType::Peaking => "peaking",
            FilterType::Notch => "notch",
            FilterType::AllPass => "allpass",
        }
    }
}

impl FromStr for FilterType {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "lowpass" => Ok(FilterType::LowPass),
            "highpass" => Ok(FilterType::HighPass),
            "bandpass" => Ok(FilterType::BandPass),
            "lowshelf" => Ok(FilterType::LowShelf),
            "peaking" => Ok(FilterType::Peaking),
            "notch" => Ok(FilterType::Notch),
            "allpass" => Ok(FilterType::AllPass),
            _ => Err(()),
        }
    }
}

const MIN_Q: f32 = 0.05;
const SHELF_K: f32 = std::f32::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    a1: f32,
    a2: f32,
    a3: f32,
    m0: f32,
    m1: f32,
    m2: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    pub gain_db: f32,
    filter_type: FilterType,

    coefficients: Coefficients,
    // Inputs the coefficients were last computed from
    computed_for: Option<(FilterType, f32, f32, f32, f32)>,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz: 1000.0,
            q: 1.0,
            gain_db: 0.0,
            filter_type,
            coefficients: Coefficients {
                a1: 1.0,
                a2: 0.0,
                a3: 0.0,
                m0: 1.0,
                m1: 0.0,
                m2: 0.0,
            },
            computed_for: None,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            ..Self::new(FilterType::LowPass)
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            ..Self::new(FilterType::HighPass)
        }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }

    pub fn set_gain_db(&mut self, gain_db: f32) {
        self.gain_db = gain_db;
    }

    fn update_coefficients(&mut self, sample_rate: f32) {
        let key = (
            self.filter_type,
            self.cutoff_hz,
            self.q,
            self.gain_db,
            sample_rate,
        );
        if self.computed_for == Some(key) {
            return;
        }

        let cutoff = self.cutoff_hz.clamp(10.0, sample_rate * 0.49);
        let q = self.q.max(MIN_Q);
        let a = 10.0_f32.powf(self.gain_db / 40.0);
        let mut g = (PI * cutoff / sample_rate).tan();

        let (k, m0, m1, m2) = match self.filter_type {
            FilterType::LowPass => (1.0 / q, 0.0, 0.0, 1.0),
            FilterType::HighPass => {
                let k = 1.0 / q;
                (k, 1.0, -k, -1.0)
            }
            // m1 = k keeps the peak at unity gain
            FilterType::BandPass => {
                let k = 1.0 / q;
                (k, 0.0, k, 0.0)
            }
            FilterType::LowShelf => {
                g /= a.sqrt();
                (SHELF_K, 1.0, SHELF_K * (a - 1.0), a * a - 1.0)
            }
            FilterType::Peaking => {
                let k = 1.0 / (q * a);
                (k, 1.0, k * (a * a - 1.0), 0.0)
            }
            FilterType::Notch => {
                let k = 1.0 / q;
                (k, 1.0, -k, 0.0)
            }
            FilterType::AllPass => {
                let k = 1.0 / q;
                (k, 1.0, -2.0 * k, 0.0)
            }
        };

        let a1 = 1.0 / (1.0 + g * (g + k));
        let a2 = g * a1;
        let a3 = g * a2;

        self.coefficients = Coefficients {
            a1,
            a2,
            a3,
            m0,
            m1,
            m2,
        };
        self.computed_for = Some(key);
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, sample_rate: f32) -> f32 {
        self.update_coefficients(sample_rate);
        let c = self.coefficients;

        let v3 = sample - self.ic2eq;
        let v1 = c.a1 * self.ic1eq + c.a2 * v3;
        let v2 = self.ic2eq + c.a2 * self.ic1eq + c.a3 * v3;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        c.m0 * sample + c.m1 * v1 + c.m2 * v2
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
