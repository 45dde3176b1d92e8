use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    graph::{
        destination::DestinationNode,
        factory::{NamingConvention, NodeFactory},
        node::{GraphNode, NodeHandle, NodeId, NodeKind, RenderCtx},
        param::{ParamError, ParamSlot},
        GraphError,
    },
    synth::voice::{Voice, VoiceError, VoiceId},
};

/// Longest echo the delay nodes of a graph can hold unless overridden.
pub const DEFAULT_MAX_DELAY_SECONDS: f32 = 1.0;

/// The output device a graph renders for, injected at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputTarget {
    pub sample_rate: f32,
    pub channels: u16,
    pub naming: NamingConvention,
}

impl OutputTarget {
    pub fn new(sample_rate: f32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            naming: NamingConvention::Standard,
        }
    }

    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Ordinary signal flow; forward edges must form a DAG.
    Forward,
    /// Routes the source's previous-frame output back into the target.
    /// Exempt from the acyclic check, so loops must go through one of these.
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

/// Directed signal graph with a single destination.
///
/// Forward edges are processed in topological order each frame. Feedback
/// edges carry the value their source produced one frame earlier, which is
/// what lets a delay loop back into itself through a gain without turning the
/// processing order into a cycle.
///
/// Nodes live as long as the graph. Voices are attached with [`launch`] and
/// dropped automatically once their stop time has passed.
///
/// [`launch`]: SignalGraph::launch
pub struct SignalGraph {
    factory: NodeFactory,
    nodes: Vec<Box<dyn GraphNode>>,
    edges: Vec<Edge>,
    forward_out: Vec<Vec<usize>>,
    order: Vec<usize>,
    inputs: Vec<f32>,
    outputs: Vec<f32>,
    voices: Vec<Voice>,
    destination: NodeId,
    sample_rate: f32,
    channels: u16,
    frames: u64,
}

impl SignalGraph {
    pub fn new(target: OutputTarget) -> Self {
        Self::with_max_delay(target, DEFAULT_MAX_DELAY_SECONDS)
    }

    pub fn with_max_delay(target: OutputTarget, max_delay_seconds: f32) -> Self {
        let mut graph = Self {
            factory: NodeFactory::new(target.naming, target.sample_rate, max_delay_seconds),
            nodes: Vec::new(),
            edges: Vec::new(),
            forward_out: Vec::new(),
            order: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            voices: Vec::with_capacity(8),
            destination: NodeId(0),
            sample_rate: target.sample_rate,
            channels: target.channels,
            frames: 0,
        };
        graph.destination = graph.insert(Box::new(DestinationNode));
        graph
    }

    fn insert(&mut self, node: Box<dyn GraphNode>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.forward_out.push(Vec::new());
        self.inputs.push(0.0);
        self.outputs.push(0.0);
        self.rebuild_order();
        id
    }

    /// Creates a node through the backend's factory and adds it to the graph.
    pub fn create_node(&mut self, requested: &str) -> Result<NodeHandle, GraphError> {
        let node = self.factory.create_node(requested)?;
        let kind = node.kind();
        let id = self.insert(node);
        Ok(NodeHandle { id, kind })
    }

    pub fn destination(&self) -> NodeHandle {
        NodeHandle {
            id: self.destination,
            kind: NodeKind::Destination,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id.0).map(|node| node.kind())
    }

    fn check(&self, id: NodeId) -> Result<(), GraphError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }

    fn check_edge(&self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        if from == self.destination {
            return Err(GraphError::DestinationHasNoOutput);
        }
        Ok(())
    }

    /// Adds a forward edge. Rejects edges that would close a cycle; loops
    /// have to be made with [`connect_feedback`](Self::connect_feedback).
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check_edge(from, to)?;
        if self.has_edge(from, to, EdgeKind::Forward) {
            trace!(?from, ?to, "edge already present");
            return Ok(());
        }
        if from == to || self.reaches(to, from) {
            return Err(GraphError::CycleDetected { from, to });
        }

        self.edges.push(Edge {
            from,
            to,
            kind: EdgeKind::Forward,
        });
        self.forward_out[from.0].push(to.0);
        self.rebuild_order();
        debug!(?from, ?to, "connected");
        Ok(())
    }

    /// Adds a feedback edge: `to` receives what `from` produced on the
    /// previous frame. Self-referential loops are allowed here.
    pub fn connect_feedback(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check_edge(from, to)?;
        if self.has_edge(from, to, EdgeKind::Feedback) {
            return Ok(());
        }
        self.edges.push(Edge {
            from,
            to,
            kind: EdgeKind::Feedback,
        });
        debug!(?from, ?to, "connected feedback");
        Ok(())
    }

    fn has_edge(&self, from: NodeId, to: NodeId, kind: EdgeKind) -> bool {
        self.edges
            .iter()
            .any(|e| e.from == from && e.to == to && e.kind == kind)
    }

    /// True if `to` is reachable from `from` along forward edges.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![from.0];
        while let Some(i) = stack.pop() {
            if i == to.0 {
                return true;
            }
            if std::mem::replace(&mut seen[i], true) {
                continue;
            }
            stack.extend(self.forward_out[i].iter().copied());
        }
        false
    }

    // Kahn's algorithm over forward edges. `connect` keeps the forward edges
    // acyclic, so every node ends up in the order.
    fn rebuild_order(&mut self) {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        for targets in &self.forward_out {
            for &t in targets {
                in_degree[t] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        self.order.clear();
        while let Some(i) = ready.pop_front() {
            self.order.push(i);
            for &t in &self.forward_out[i] {
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    ready.push_back(t);
                }
            }
        }
    }

    /// Live access to a node parameter, used by bound setters.
    pub fn param_slot(&mut self, node: NodeId, name: &str) -> Result<ParamSlot<'_>, ParamError> {
        let target = self
            .nodes
            .get_mut(node.0)
            .ok_or(ParamError::UnknownNode(node))?;
        target.param_mut(name).ok_or_else(|| ParamError::UnknownParam {
            node,
            name: name.to_string(),
        })
    }

    /// Current position of the graph clock in milliseconds.
    pub fn time_ms(&self) -> f64 {
        self.frames as f64 * 1_000.0 / self.sample_rate as f64
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Attaches a voice to the graph. It sounds between its start and stop
    /// times and is dropped once it has stopped.
    pub fn launch(&mut self, voice: Voice) -> Result<VoiceId, GraphError> {
        self.check(voice.destination())?;
        let id = voice.id();
        trace!(?id, frequency = voice.frequency(), "voice launched");
        self.voices.push(voice);
        Ok(id)
    }

    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id() == id)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn stop_voice(&mut self, id: VoiceId, when_ms: f64) -> Result<(), VoiceError> {
        self.voices
            .iter_mut()
            .find(|v| v.id() == id)
            .ok_or(VoiceError::UnknownVoice(id))?
            .stop(when_ms)
    }

    /// Renders one frame and returns the destination's sample.
    pub fn render_frame(&mut self) -> f32 {
        let ctx = RenderCtx::new(self.sample_rate, self.time_ms());

        self.inputs.fill(0.0);
        for voice in &mut self.voices {
            self.inputs[voice.destination().0] += voice.render(&ctx);
        }
        for edge in &self.edges {
            if edge.kind == EdgeKind::Feedback {
                self.inputs[edge.to.0] += self.outputs[edge.from.0];
            }
        }

        for &i in &self.order {
            let out = self.nodes[i].process(self.inputs[i], &ctx);
            self.outputs[i] = out;
            for &t in &self.forward_out[i] {
                self.inputs[t] += out;
            }
        }

        self.frames += 1;
        let now = self.time_ms();
        self.voices.retain(|v| !v.is_finished(now));

        self.outputs[self.destination.0]
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.render_frame();
        }
    }

    /// Clears signal history in every node and drops all voices.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.inputs.fill(0.0);
        self.outputs.fill(0.0);
        self.voices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> SignalGraph {
        SignalGraph::new(OutputTarget::new(48_000.0, 2))
    }

    #[test]
    fn destination_exists_from_the_start() {
        let g = graph();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.destination().kind, NodeKind::Destination);
    }

    #[test]
    fn forward_cycle_is_rejected() {
        let mut g = graph();
        let a = g.create_node("createGainNode").unwrap();
        let b = g.create_node("createGainNode").unwrap();
        g.connect(a.id, b.id).unwrap();
        assert_eq!(
            g.connect(b.id, a.id),
            Err(GraphError::CycleDetected {
                from: b.id,
                to: a.id
            })
        );
        assert!(g.connect(a.id, a.id).is_err());
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut g = graph();
        let a = g.create_node("createGainNode").unwrap();
        let dest = g.destination().id;
        g.connect(a.id, dest).unwrap();
        g.connect(a.id, dest).unwrap();
        assert_eq!(g.edges().len(), 1);
    }

    #[test]
    fn destination_has_no_output() {
        let mut g = graph();
        let a = g.create_node("createGainNode").unwrap();
        let dest = g.destination().id;
        assert_eq!(g.connect(dest, a.id), Err(GraphError::DestinationHasNoOutput));
    }

    #[test]
    fn unknown_node_is_reported() {
        let mut g = graph();
        let dest = g.destination().id;
        assert_eq!(
            g.connect(NodeId(42), dest),
            Err(GraphError::UnknownNode(NodeId(42)))
        );
    }

    #[test]
    fn order_follows_edges_not_insertion() {
        let mut g = graph();
        let late = g.create_node("createGainNode").unwrap();
        let early = g.create_node("createGainNode").unwrap();
        g.connect(early.id, late.id).unwrap();
        let pos = |id: NodeId| g.order.iter().position(|&i| i == id.0).unwrap();
        assert!(pos(early.id) < pos(late.id));
    }

    #[test]
    fn clock_advances_per_frame() {
        let mut g = graph();
        let mut block = vec![0.0; 480];
        g.render_block(&mut block);
        assert!((g.time_ms() - 10.0).abs() < 1e-9);
        assert!(block.iter().all(|&s| s == 0.0));
    }
}
