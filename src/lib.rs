pub mod config;
pub mod dsp;
pub mod engine; // Cooperative timer queue
pub mod error;
pub mod graph; // Signal graph, node factory and parameter binding
pub mod runtime; // Composed synth, control surface and audio output
pub mod sequencing; // Tempo, pattern and the step sequencer
pub mod synth; // One-shot voices and the voice factory

pub use config::SynthConfig;
pub use error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
