// Purpose: One-shot oscillator voices and the live factory that makes them.
// This layer sits between the sequencer and the signal graph.

pub mod factory;
pub mod voice;

pub use factory::VoiceFactory;
pub use voice::{Voice, VoiceError, VoiceId};
