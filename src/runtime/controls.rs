//! The control surface: every knob a front end can turn, with its range and
//! the value it starts at.

use std::fmt;

use crate::{
    config::SynthConfig,
    dsp::{FilterType, Waveform},
};

/// One logical control. Step controls carry their zero-based step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Power,
    StepFrequency(usize),
    Tempo,
    StepDuration(usize),
    WaveShape,
    Gain,
    DelayMix,
    DelayTime,
    Feedback,
    FilterKind,
    FilterFrequency,
    FilterQ,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Power => write!(f, "ON/OFF"),
            Control::StepFrequency(i) => write!(f, "Freq {}", i + 1),
            Control::Tempo => write!(f, "BPM"),
            Control::StepDuration(i) => write!(f, "Time {}", i + 1),
            Control::WaveShape => write!(f, "Wave"),
            Control::Gain => write!(f, "Gain"),
            Control::DelayMix => write!(f, "Delay"),
            Control::DelayTime => write!(f, "Time"),
            Control::Feedback => write!(f, "Feedbk"),
            Control::FilterKind => write!(f, "Filter"),
            Control::FilterFrequency => write!(f, "Freq"),
            Control::FilterQ => write!(f, "Q"),
        }
    }
}

/// Which panel a control belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlGroup {
    Clock,
    Sequence,
    Source,
    Echo,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub control: Control,
    pub group: ControlGroup,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl ControlSpec {
    const fn new(
        control: Control,
        group: ControlGroup,
        min: f32,
        max: f32,
        step: f32,
        default: f32,
    ) -> Self {
        Self {
            control,
            group,
            min,
            max,
            step,
            default,
        }
    }

    /// Moves `value` by `steps` increments, staying inside the range.
    pub fn nudge(&self, value: f32, steps: i32) -> f32 {
        (value + self.step * steps as f32).clamp(self.min, self.max)
    }

    /// Human-readable value, naming variants for enumerated controls.
    pub fn format(&self, value: f32) -> String {
        let index = value.round().max(0.0) as usize;
        match self.control {
            Control::Power => (if value > 0.0 { "on" } else { "off" }).to_string(),
            Control::WaveShape => Waveform::NAMES.get(index).unwrap_or(&"?").to_string(),
            Control::FilterKind => FilterType::NAMES.get(index).unwrap_or(&"?").to_string(),
            _ if self.step < 1.0 => format!("{value:.2}"),
            _ => format!("{value:.0}"),
        }
    }
}

/// Every control in panel order, with defaults taken from `config`.
pub fn control_specs(config: &SynthConfig) -> Vec<ControlSpec> {
    use Control::*;
    use ControlGroup::*;

    let steps = config.steps;
    let mut specs = Vec::with_capacity(2 * steps + 10);

    specs.push(ControlSpec::new(Power, Clock, 0.0, 1.0, 1.0, 0.0));
    specs.extend((0..steps).map(|i| {
        ControlSpec::new(StepFrequency(i), Sequence, 0.0, 2_000.0, 1.0, config.note_frequency)
    }));
    specs.push(ControlSpec::new(Tempo, Clock, 0.0, 300.0, 1.0, config.bpm as f32));
    specs.extend((0..steps).map(|i| {
        ControlSpec::new(StepDuration(i), Sequence, 0.0, 500.0, 1.0, config.note_duration_ms)
    }));

    let waves = (Waveform::NAMES.len() - 1) as f32;
    let filters = (FilterType::NAMES.len() - 1) as f32;
    specs.extend([
        ControlSpec::new(WaveShape, Source, 0.0, waves, 1.0, 0.0),
        ControlSpec::new(Gain, Source, 0.0, 1.0, 0.01, 0.4),
        ControlSpec::new(DelayMix, Echo, 0.0, 1.0, 0.01, 0.4),
        ControlSpec::new(DelayTime, Echo, 0.0, 0.5, 0.01, 0.0),
        ControlSpec::new(Feedback, Echo, 0.0, 1.0, 0.01, 0.0),
        ControlSpec::new(FilterKind, Filter, 0.0, filters, 1.0, 0.0),
        ControlSpec::new(FilterFrequency, Filter, 0.0, 3_000.0, 1.0, 1_000.0),
        ControlSpec::new(FilterQ, Filter, 0.0, 30.0, 0.01, 2.0),
    ]);

    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_order_matches_layout() {
        let specs = control_specs(&SynthConfig::new().with_steps(2));
        let labels: Vec<String> = specs.iter().map(|s| s.control.to_string()).collect();
        assert_eq!(
            labels,
            [
                "ON/OFF", "Freq 1", "Freq 2", "BPM", "Time 1", "Time 2", "Wave", "Gain", "Delay",
                "Time", "Feedbk", "Filter", "Freq", "Q"
            ]
        );
    }

    #[test]
    fn enumerated_ranges_cover_their_tables() {
        let specs = control_specs(&SynthConfig::new());
        let wave = specs.iter().find(|s| s.control == Control::WaveShape).unwrap();
        let filter = specs.iter().find(|s| s.control == Control::FilterKind).unwrap();
        assert_eq!(wave.max, 3.0);
        assert_eq!(filter.max, 6.0);
        assert_eq!(filter.format(3.0), "lowshelf");
    }

    #[test]
    fn nudge_stays_in_range() {
        let specs = control_specs(&SynthConfig::new());
        let q = specs.iter().find(|s| s.control == Control::FilterQ).unwrap();
        assert_eq!(q.nudge(29.995, 5), 30.0);
        assert_eq!(q.nudge(0.0, -1), 0.0);
    }
}
