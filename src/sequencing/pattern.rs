/*
Step Pattern
============

A fixed-length row of steps played in order and wrapped back to step 0
after the last one. Each step holds a pitch and a note length:

    step:       0     1     2     3     4     5     6     7
    frequency:  400   400   500   --    400   400   600   400
    duration:   200   200   100   --    200   200   200   200

Either field may be missing. A step missing a field is a rest: the
sequencer still moves through it on time, it just launches no voice.

Note length is independent of the step interval. A note shorter than its
step leaves a gap; a longer one overlaps the next step's voice.
*/

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Frequency,
    Duration,
}

impl NoteField {
    pub fn name(self) -> &'static str {
        match self {
            NoteField::Frequency => "frequency",
            NoteField::Duration => "duration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error("step {index} is outside the pattern (0..{len})")]
    StepOutOfRange { index: usize, len: usize },

    #[error("{} must be finite and non-negative (got {value})", .field.name())]
    InvalidValue { field: NoteField, value: f32 },
}

/// One step's pitch and sustain length.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Note {
    /// Pitch (Hz)
    pub frequency: Option<f32>,
    /// Sustain length (ms)
    pub duration_ms: Option<f64>,
}

impl Note {
    pub const REST: Note = Note {
        frequency: None,
        duration_ms: None,
    };

    pub fn new(frequency: f32, duration_ms: f64) -> Self {
        Self {
            frequency: Some(frequency),
            duration_ms: Some(duration_ms),
        }
    }

    /// Frequency and duration, if both are set.
    pub fn playable(&self) -> Option<(f32, f64)> {
        Some((self.frequency?, self.duration_ms?))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    notes: Vec<Note>,
}

impl Pattern {
    /// `steps` empty steps.
    pub fn new(steps: usize) -> Self {
        Self {
            notes: vec![Note::REST; steps],
        }
    }

    /// `steps` copies of the same note.
    pub fn uniform(steps: usize, frequency: f32, duration_ms: f64) -> Self {
        Self {
            notes: vec![Note::new(frequency, duration_ms); steps],
        }
    }

    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        Self {
            notes: notes.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Grows or shrinks the pattern; new steps start empty.
    pub fn resize(&mut self, steps: usize) {
        self.notes.resize(steps, Note::REST);
    }

    fn note_mut(&mut self, index: usize) -> Result<&mut Note, PatternError> {
        let len = self.notes.len();
        self.notes
            .get_mut(index)
            .ok_or(PatternError::StepOutOfRange { index, len })
    }
}

/// Bound setter for one field of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEditor {
    pub index: usize,
    pub field: NoteField,
}

impl NoteEditor {
    pub fn new(index: usize, field: NoteField) -> Self {
        Self { index, field }
    }

    /// Writes `value` into the step, leaving the other field as it was.
    pub fn set(&self, pattern: &mut Pattern, value: f32) -> Result<(), PatternError> {
        if !value.is_finite() || value < 0.0 {
            return Err(PatternError::InvalidValue {
                field: self.field,
                value,
            });
        }

        let note = pattern.note_mut(self.index)?;
        match self.field {
            NoteField::Frequency => note.frequency = Some(value),
            NoteField::Duration => note.duration_ms = Some(value as f64),
        }
        Ok(())
    }
}
