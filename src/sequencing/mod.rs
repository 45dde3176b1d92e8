pub mod pattern;
pub mod sequencer;
pub mod tempo;

pub use pattern::{Note, NoteEditor, NoteField, Pattern, PatternError};
pub use sequencer::{Sequencer, SequencerEvent, StepHighlighter, Transport};
pub use tempo::{TempoConfig, TempoError};
