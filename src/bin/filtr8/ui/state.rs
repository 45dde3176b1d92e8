//! Snapshot of the synth the widgets draw from
//!
//! Control values are copied out under the lock after every edit; step
//! highlights arrive separately over the ring buffer from the audio thread.

use filtr8::runtime::{Control, ControlSpec, StepSynth};

/// Highlight hook calls forwarded from the audio thread
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightEvent {
    Clear(usize),
    Set(usize),
}

/// One control as shown in the panel
#[derive(Clone, Copy, Debug)]
pub struct ControlRow {
    pub spec: ControlSpec,
    pub value: f32,
}

pub struct UiState {
    pub rows: Vec<ControlRow>,
    /// Index into `rows` of the control being edited
    pub selected: usize,
    /// Step currently highlighted
    pub active_step: Option<usize>,
    pub playing: bool,
    pub sample_rate: f32,
    /// Last rejected edit, shown in place of the help line
    pub status: Option<String>,
}

impl UiState {
    pub fn new(synth: &StepSynth, sample_rate: f32) -> Self {
        let mut state = Self {
            rows: Vec::new(),
            selected: 0,
            active_step: None,
            playing: false,
            sample_rate,
            status: None,
        };
        state.refresh(synth);
        state
    }

    /// Re-reads every control value from the synth.
    pub fn refresh(&mut self, synth: &StepSynth) {
        self.rows = synth
            .specs()
            .iter()
            .map(|&spec| ControlRow {
                spec,
                value: synth.value(spec.control).unwrap_or(spec.default),
            })
            .collect();
        self.playing = synth.sequencer().is_active();
    }

    pub fn apply(&mut self, event: HighlightEvent) {
        match event {
            HighlightEvent::Clear(step) if self.active_step == Some(step) => {
                self.active_step = None
            }
            HighlightEvent::Clear(_) => {}
            HighlightEvent::Set(step) => self.active_step = Some(step),
        }
    }

    pub fn value(&self, control: Control) -> Option<f32> {
        self.rows
            .iter()
            .find(|row| row.spec.control == control)
            .map(|row| row.value)
    }

    pub fn selected_row(&self) -> Option<ControlRow> {
        self.rows.get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1) % self.rows.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + self.rows.len() - 1) % self.rows.len();
        }
    }

    /// Number of steps in the pattern
    pub fn steps(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.spec.control, Control::StepFrequency(_)))
            .count()
    }
}
