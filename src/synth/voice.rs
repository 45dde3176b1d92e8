use thiserror::Error;

use crate::{
    dsp::oscillator::{OscillatorBlock, Waveform},
    graph::{node::NodeId, param::AudioParam, RenderCtx},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("voice factory has no destination to wire the voice to")]
    Unconnected,

    #[error("voice {0:?} was already started")]
    AlreadyStarted(VoiceId),

    #[error("voice {0:?} was stopped before it started")]
    NotStarted(VoiceId),

    #[error("voice {0:?} was already stopped")]
    AlreadyStopped(VoiceId),

    #[error("voice {0:?} is not attached to the graph")]
    UnknownVoice(VoiceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,     // Built, not yet started
    Started,  // Start time set, no stop yet
    Stopping, // Stop time set
}

/// A single-use oscillator bound to one destination.
///
/// Start and stop are each accepted once. Between them the voice sounds on
/// the graph clock; after its stop time it is finished and gets dropped.
#[derive(Debug, Clone)]
pub struct Voice {
    id: VoiceId,
    destination: NodeId,
    oscillator: OscillatorBlock,
    frequency: AudioParam,
    start_ms: Option<f64>,
    stop_ms: Option<f64>,
}

impl Voice {
    pub(crate) fn new(
        id: VoiceId,
        destination: NodeId,
        waveform: Waveform,
        frequency: f32,
        sample_rate: f32,
    ) -> Self {
        Self {
            id,
            destination,
            oscillator: OscillatorBlock::new(waveform),
            frequency: AudioParam::new(frequency, 0.0, sample_rate / 2.0, sample_rate),
            start_ms: None,
            stop_ms: None,
        }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency.value()
    }

    /// Retunes the voice. Before it starts the new pitch applies at once;
    /// while sounding it glides.
    pub fn set_frequency(&mut self, frequency: f32) {
        if self.start_ms.is_some() {
            self.frequency.set_value(frequency);
        } else {
            self.frequency.jump_to(frequency);
        }
    }

    pub fn start_ms(&self) -> Option<f64> {
        self.start_ms
    }

    pub fn stop_ms(&self) -> Option<f64> {
        self.stop_ms
    }

    pub fn state(&self) -> VoiceState {
        match (self.start_ms, self.stop_ms) {
            (None, _) => VoiceState::Idle,
            (Some(_), None) => VoiceState::Started,
            (Some(_), Some(_)) => VoiceState::Stopping,
        }
    }

    pub fn start(&mut self, when_ms: f64) -> Result<(), VoiceError> {
        if self.start_ms.is_some() {
            return Err(VoiceError::AlreadyStarted(self.id));
        }
        self.start_ms = Some(when_ms);
        Ok(())
    }

    pub fn stop(&mut self, when_ms: f64) -> Result<(), VoiceError> {
        let Some(start) = self.start_ms else {
            return Err(VoiceError::NotStarted(self.id));
        };
        if self.stop_ms.is_some() {
            return Err(VoiceError::AlreadyStopped(self.id));
        }
        self.stop_ms = Some(when_ms.max(start));
        Ok(())
    }

    pub fn is_sounding(&self, time_ms: f64) -> bool {
        match self.start_ms {
            Some(start) => time_ms >= start && self.stop_ms.map_or(true, |stop| time_ms < stop),
            None => false,
        }
    }

    pub fn is_finished(&self, time_ms: f64) -> bool {
        self.stop_ms.is_some_and(|stop| time_ms >= stop)
    }

    /// Produces this frame's sample, or silence outside the sounding window.
    #[inline]
    pub fn render(&mut self, ctx: &RenderCtx) -> f32 {
        if !self.is_sounding(ctx.time_ms) {
            return 0.0;
        }
        let frequency = self.frequency.next();
        self.oscillator.next_sample(frequency, ctx.sample_rate)
    }
}
