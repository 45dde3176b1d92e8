//! Sequencer - step pattern playback on a cooperative timeline
//!
//! The sequencer never sleeps or spawns. It registers deferred work on a
//! [`Scheduler`] and reacts when its owner hands the fired events back
//! through [`Sequencer::handle`].

use tracing::{debug, info, trace, warn};

use crate::{
    engine::scheduler::{Scheduler, TimerHandle},
    graph::SignalGraph,
    sequencing::{
        pattern::{NoteEditor, NoteField, Pattern, PatternError},
        tempo::{TempoConfig, TempoError},
    },
    synth::{factory::VoiceFactory, voice::VoiceId},
};

/// Token for one RUNNING period. Every `power` on starts a new session, so
/// step events left over from an earlier session are recognisably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Session(u64);

/// Deferred work the sequencer registers on its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Trigger the next step, if `session` is still the running one.
    Step { session: Session },
    /// End a voice started by an earlier step.
    StopVoice(VoiceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stopped,
    Running {
        session: Session,
        /// The next step trigger; only ever set while running.
        pending: Option<TimerHandle>,
    },
}

/// Hook for showing which step is playing.
///
/// Called at most twice per step: clear the old step, then set the new one.
pub trait StepHighlighter: Send {
    fn clear(&mut self, step: usize);
    fn set(&mut self, step: usize);
}

pub struct Sequencer {
    tempo: TempoConfig,
    pattern: Pattern,
    voices: VoiceFactory,
    transport: Transport,
    /// Last step played; `None` until the first step fires.
    position: Option<usize>,
    next_session: u64,
    highlighter: Option<Box<dyn StepHighlighter>>,
}

impl Sequencer {
    /// The pattern is resized to `tempo.steps()`.
    pub fn new(tempo: TempoConfig, mut pattern: Pattern, voices: VoiceFactory) -> Self {
        pattern.resize(tempo.steps());
        Self {
            tempo,
            pattern,
            voices,
            transport: Transport::Stopped,
            position: None,
            next_session: 0,
            highlighter: None,
        }
    }

    pub fn set_highlighter(&mut self, highlighter: Box<dyn StepHighlighter>) {
        self.highlighter = Some(highlighter);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.transport, Transport::Running { .. })
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// The pending step trigger, if one is registered.
    pub fn pending_step(&self) -> Option<TimerHandle> {
        match self.transport {
            Transport::Running { pending, .. } => pending,
            Transport::Stopped => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.position
    }

    pub fn tempo(&self) -> TempoConfig {
        self.tempo
    }

    pub fn step_interval_ms(&self) -> f64 {
        self.tempo.step_interval_ms()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn voice_factory(&self) -> &VoiceFactory {
        &self.voices
    }

    pub fn voice_factory_mut(&mut self) -> &mut VoiceFactory {
        &mut self.voices
    }

    /// Turns playback on for `value > 0`, off otherwise.
    ///
    /// Turning on schedules the first step one full interval out. Turning off
    /// cancels the pending step; voices already sounding keep their stop
    /// events. Repeating the current state does nothing.
    pub fn power(&mut self, value: f32, timeline: &mut Scheduler<SequencerEvent>) {
        match (value > 0.0, self.transport) {
            (true, Transport::Stopped) => {
                let session = Session(self.next_session);
                self.next_session += 1;
                let interval = self.step_interval_ms();
                let pending = timeline.schedule(interval, SequencerEvent::Step { session });
                self.transport = Transport::Running {
                    session,
                    pending: Some(pending),
                };
                info!(interval_ms = interval, "sequencer started");
            }
            (false, Transport::Running { pending, .. }) => {
                if let Some(handle) = pending {
                    timeline.cancel(handle);
                }
                self.transport = Transport::Stopped;
                info!(position = ?self.position, "sequencer stopped");
            }
            _ => trace!(value, "power unchanged"),
        }
    }

    /// Changes tempo. An already pending step keeps its time; the new
    /// interval applies from the next one scheduled.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<(), TempoError> {
        self.tempo = self.tempo.with_bpm(bpm)?;
        debug!(bpm, interval_ms = self.step_interval_ms(), "tempo changed");
        Ok(())
    }

    pub fn note_editor(&self, index: usize, field: NoteField) -> NoteEditor {
        NoteEditor::new(index, field)
    }

    pub fn edit_note(
        &mut self,
        index: usize,
        field: NoteField,
        value: f32,
    ) -> Result<(), PatternError> {
        self.note_editor(index, field).set(&mut self.pattern, value)
    }

    /// Dispatches an event fired by the timeline.
    pub fn handle(
        &mut self,
        event: SequencerEvent,
        timeline: &mut Scheduler<SequencerEvent>,
        graph: &mut SignalGraph,
    ) {
        match event {
            SequencerEvent::Step { session } => match self.transport {
                Transport::Running { session: current, .. } if current == session => {
                    self.transport = Transport::Running {
                        session,
                        pending: None,
                    };
                    self.on_step(timeline, graph);
                }
                _ => trace!(?session, "stale step ignored"),
            },
            SequencerEvent::StopVoice(id) => {
                if let Err(err) = graph.stop_voice(id, timeline.now_ms()) {
                    trace!(?id, %err, "stop skipped");
                }
            }
        }
    }

    /// Plays the next step and schedules the one after it.
    ///
    /// Returns the voice launched, or `None` for a rest. Does nothing while
    /// stopped.
    pub fn on_step(
        &mut self,
        timeline: &mut Scheduler<SequencerEvent>,
        graph: &mut SignalGraph,
    ) -> Option<VoiceId> {
        let Transport::Running { session, pending } = self.transport else {
            return None;
        };
        if let Some(handle) = pending {
            timeline.cancel(handle);
        }

        let voice = self.voices.make_voice();

        let index = self.position.map_or(0, |i| (i + 1) % self.pattern.len());
        if let Some(highlighter) = self.highlighter.as_mut() {
            if let Some(previous) = self.position {
                highlighter.clear(previous);
            }
            highlighter.set(index);
        }
        self.position = Some(index);

        let now = timeline.now_ms();
        let launched = match (voice, self.pattern.get(index).and_then(|n| n.playable())) {
            (Ok(mut voice), Some((frequency, duration_ms))) => {
                voice.set_frequency(frequency);
                let started = voice
                    .start(now)
                    .map_err(crate::Error::from)
                    .and_then(|_| graph.launch(voice).map_err(crate::Error::from));
                match started {
                    Ok(id) => {
                        timeline.schedule(duration_ms, SequencerEvent::StopVoice(id));
                        trace!(step = index, frequency, duration_ms, at_ms = now, "step");
                        Some(id)
                    }
                    Err(err) => {
                        warn!(step = index, %err, "voice not launched");
                        None
                    }
                }
            }
            (Ok(_), None) => {
                trace!(step = index, at_ms = now, "rest");
                None
            }
            (Err(err), _) => {
                warn!(step = index, %err, "voice not made");
                None
            }
        };

        let pending = timeline.schedule(self.step_interval_ms(), SequencerEvent::Step { session });
        self.transport = Transport::Running {
            session,
            pending: Some(pending),
        };

        launched
    }
}
