//! StepSynth - the wired instrument
//!
//! Owns the signal graph, the timeline and the sequencer, and advances all
//! three together one frame at a time. Everything runs on the caller's
//! thread: timeline events due at a frame are handled to completion before
//! that frame is rendered.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::{
    config::SynthConfig,
    engine::scheduler::Scheduler,
    graph::{NodeHandle, OutputTarget, ParameterSetter, SignalGraph},
    runtime::controls::{control_specs, Control, ControlSpec},
    sequencing::{
        pattern::{NoteField, Pattern},
        sequencer::{Sequencer, SequencerEvent, StepHighlighter},
    },
    synth::factory::VoiceFactory,
    Result, MAX_BLOCK_SIZE,
};

/// The five processing nodes of the instrument.
#[derive(Debug, Clone, Copy)]
pub struct SynthNodes {
    pub filter: NodeHandle,
    pub gain: NodeHandle,
    pub delay: NodeHandle,
    pub delay_gain: NodeHandle,
    pub feedback_gain: NodeHandle,
}

#[derive(Debug, Clone, Copy)]
struct Setters {
    gain: ParameterSetter,
    delay_mix: ParameterSetter,
    delay_time: ParameterSetter,
    feedback: ParameterSetter,
    filter_kind: ParameterSetter,
    filter_frequency: ParameterSetter,
    filter_q: ParameterSetter,
}

pub struct StepSynth {
    graph: SignalGraph,
    timeline: Scheduler<SequencerEvent>,
    sequencer: Sequencer,
    nodes: SynthNodes,
    setters: Setters,
    specs: Vec<ControlSpec>,
    values: HashMap<Control, f32>,
}

impl StepSynth {
    /// Builds and wires the instrument, then applies every control default.
    ///
    /// ```text
    /// voice ─▶ filter ─▶ gain ─┬──────────────────────▶ destination
    ///                          └▶ delay ─┬▶ delay_gain ─▶ destination
    ///                               ▲    └▶ feedback_gain ┐
    ///                               └──── (feedback) ◀────┘
    /// ```
    pub fn new(config: SynthConfig, target: OutputTarget) -> Result<Self> {
        let tempo = config.tempo()?;
        let mut graph = SignalGraph::with_max_delay(target, config.max_delay_seconds);

        let nodes = SynthNodes {
            gain: graph.create_node("createGainNode")?,
            delay: graph.create_node("createDelayNode")?,
            delay_gain: graph.create_node("createGainNode")?,
            feedback_gain: graph.create_node("createGainNode")?,
            filter: graph.create_node("createBiquadFilter")?,
        };
        let destination = graph.destination().id;

        let mut voices = VoiceFactory::new(target.sample_rate);
        voices.connect(nodes.filter.id);
        graph.connect(nodes.filter.id, nodes.gain.id)?;
        graph.connect(nodes.gain.id, destination)?;
        graph.connect(nodes.gain.id, nodes.delay.id)?;
        graph.connect(nodes.delay.id, nodes.delay_gain.id)?;
        graph.connect(nodes.delay.id, nodes.feedback_gain.id)?;
        graph.connect_feedback(nodes.feedback_gain.id, nodes.delay.id)?;
        graph.connect(nodes.delay_gain.id, destination)?;

        let setters = Setters {
            gain: nodes.gain.bind_parameter("gain")?,
            delay_mix: nodes.delay_gain.bind_parameter("gain")?,
            delay_time: nodes.delay.bind_parameter("delayTime")?,
            feedback: nodes.feedback_gain.bind_parameter("gain")?,
            filter_kind: nodes.filter.bind_parameter("type")?,
            filter_frequency: nodes.filter.bind_parameter("frequency")?,
            filter_q: nodes.filter.bind_parameter("Q")?,
        };

        let specs = control_specs(&config);
        let mut synth = Self {
            graph,
            timeline: Scheduler::new(),
            sequencer: Sequencer::new(tempo, Pattern::new(config.steps), voices),
            nodes,
            setters,
            values: HashMap::with_capacity(specs.len()),
            specs,
        };

        for i in 0..synth.specs.len() {
            let spec = synth.specs[i];
            synth.set(spec.control, spec.default)?;
        }

        info!(
            sample_rate = target.sample_rate,
            channels = target.channels,
            steps = config.steps,
            bpm = config.bpm,
            "synth ready"
        );
        Ok(synth)
    }

    /// Applies a control value. On error the previous value stays in effect.
    pub fn set(&mut self, control: Control, value: f32) -> Result<()> {
        match self.apply(control, value) {
            Ok(()) => {
                debug!(%control, value, "control set");
                self.values.insert(control, value);
                Ok(())
            }
            Err(err) => {
                warn!(%control, value, %err, "control value rejected");
                Err(err)
            }
        }
    }

    fn apply(&mut self, control: Control, value: f32) -> Result<()> {
        let graph = &mut self.graph;
        match control {
            Control::Power => self.sequencer.power(value, &mut self.timeline),
            Control::StepFrequency(i) => self.sequencer.edit_note(i, NoteField::Frequency, value)?,
            Control::Tempo => self.sequencer.set_bpm(value as f64)?,
            Control::StepDuration(i) => self.sequencer.edit_note(i, NoteField::Duration, value)?,
            Control::WaveShape => self.sequencer.voice_factory_mut().set_wave_shape(value)?,
            Control::Gain => self.setters.gain.set(graph, value)?,
            Control::DelayMix => self.setters.delay_mix.set(graph, value)?,
            Control::DelayTime => self.setters.delay_time.set(graph, value)?,
            Control::Feedback => self.setters.feedback.set(graph, value)?,
            Control::FilterKind => self.setters.filter_kind.set(graph, value)?,
            Control::FilterFrequency => self.setters.filter_frequency.set(graph, value)?,
            Control::FilterQ => self.setters.filter_q.set(graph, value)?,
        }
        Ok(())
    }

    /// Last value accepted for `control`.
    pub fn value(&self, control: Control) -> Option<f32> {
        self.values.get(&control).copied()
    }

    pub fn specs(&self) -> &[ControlSpec] {
        &self.specs
    }

    pub fn nodes(&self) -> SynthNodes {
        self.nodes
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn set_highlighter(&mut self, highlighter: Box<dyn StepHighlighter>) {
        self.sequencer.set_highlighter(highlighter);
    }

    pub fn now_ms(&self) -> f64 {
        self.graph.time_ms()
    }

    /// Time of the next timeline event, if any.
    pub fn next_event_ms(&self) -> Option<f64> {
        self.timeline.next_due()
    }

    /// Renders mono frames into `out`, firing timeline events as their time
    /// comes up.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let now = self.graph.time_ms();
            while let Some(event) = self.timeline.pop_due(now) {
                self.sequencer.handle(event, &mut self.timeline, &mut self.graph);
            }
            self.timeline.advance_to(now);
            *sample = self.graph.render_frame();
        }
    }

    fn frames_in(&self, duration_ms: f64) -> usize {
        let sample_rate = self.graph.sample_rate() as f64;
        (duration_ms.max(0.0) * sample_rate / 1_000.0).round() as usize
    }

    /// Renders `duration_ms` of audio and returns it.
    pub fn render_for(&mut self, duration_ms: f64) -> Vec<f32> {
        let mut out = vec![0.0; self.frames_in(duration_ms)];
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(block);
        }
        out
    }

    /// Advances the instrument by `duration_ms`, discarding the audio.
    pub fn run_for(&mut self, duration_ms: f64) {
        let mut frames = self.frames_in(duration_ms);
        let mut scratch = [0.0f32; 256];
        while frames > 0 {
            let n = frames.min(scratch.len());
            self.render_block(&mut scratch[..n]);
            frames -= n;
        }
    }
}
