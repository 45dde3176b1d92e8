use tracing::trace;

use crate::{
    dsp::oscillator::Waveform,
    graph::{
        node::NodeId,
        param::{DiscreteAttr, ParamError, WAVE_SHAPES},
    },
    synth::voice::{Voice, VoiceError, VoiceId},
};

/// Live configuration shared by every voice it produces.
///
/// Setters only affect voices made afterwards; voices already produced keep
/// what they were built with.
#[derive(Debug, Clone)]
pub struct VoiceFactory {
    frequency: f32,
    waveform: Waveform,
    destination: Option<NodeId>,
    sample_rate: f32,
    next_id: u64,
}

impl VoiceFactory {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frequency: 440.0,
            waveform: Waveform::Sine,
            destination: None,
            sample_rate,
            next_id: 0,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    /// Picks the wave shape by index into the wave-shape table.
    /// An index outside the table keeps the current shape.
    pub fn set_wave_shape(&mut self, index: f32) -> Result<(), ParamError> {
        let name = WAVE_SHAPES.lookup(index)?;
        self.waveform.assign(WAVE_SHAPES.param, name)
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn connect(&mut self, destination: NodeId) {
        self.destination = Some(destination);
    }

    pub fn make_voice(&mut self) -> Result<Voice, VoiceError> {
        let destination = self.destination.ok_or(VoiceError::Unconnected)?;
        let id = VoiceId(self.next_id);
        self.next_id += 1;
        trace!(?id, frequency = self.frequency, waveform = self.waveform.name(), "voice made");
        Ok(Voice::new(
            id,
            destination,
            self.waveform,
            self.frequency,
            self.sample_rate,
        ))
    }
}
