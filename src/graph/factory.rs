use tracing::debug;

use crate::graph::{
    delay::DelayNode,
    filter::FilterNode,
    gain::GainNode,
    node::{GraphNode, NodeKind},
    GraphError,
};

/// How a backend spells its node constructors.
///
/// Legacy backends suffix some constructors with `Node` (`createGainNode`);
/// standard ones do not (`createGain`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingConvention {
    #[default]
    Standard,
    Suffixed,
}

const STANDARD: &[(&str, NodeKind)] = &[
    ("createGain", NodeKind::Gain),
    ("createDelay", NodeKind::Delay),
    ("createBiquadFilter", NodeKind::BiquadFilter),
];

const SUFFIXED: &[(&str, NodeKind)] = &[
    ("createGainNode", NodeKind::Gain),
    ("createDelayNode", NodeKind::Delay),
    ("createBiquadFilter", NodeKind::BiquadFilter),
];

impl NamingConvention {
    /// Rewrites a requested constructor name into this backend's spelling.
    pub fn normalize<'a>(&self, requested: &'a str) -> &'a str {
        match self {
            NamingConvention::Standard => requested.strip_suffix("Node").unwrap_or(requested),
            NamingConvention::Suffixed => requested,
        }
    }

    fn constructors(&self) -> &'static [(&'static str, NodeKind)] {
        match self {
            NamingConvention::Standard => STANDARD,
            NamingConvention::Suffixed => SUFFIXED,
        }
    }
}

/// Builds independent processing nodes from constructor names.
///
/// Holds no per-node state; every call yields a fresh node.
#[derive(Debug, Clone, Copy)]
pub struct NodeFactory {
    naming: NamingConvention,
    sample_rate: f32,
    max_delay_seconds: f32,
}

impl NodeFactory {
    pub fn new(naming: NamingConvention, sample_rate: f32, max_delay_seconds: f32) -> Self {
        Self {
            naming,
            sample_rate,
            max_delay_seconds,
        }
    }

    pub fn naming(&self) -> NamingConvention {
        self.naming
    }

    /// Resolves a constructor name to the kind it builds on this backend.
    pub fn resolve(&self, requested: &str) -> Result<NodeKind, GraphError> {
        let name = self.naming.normalize(requested);
        self.naming
            .constructors()
            .iter()
            .find(|(constructor, _)| *constructor == name)
            .map(|&(_, kind)| kind)
            .ok_or_else(|| GraphError::UnknownNodeKind(requested.to_string()))
    }

    pub fn create_node(&self, requested: &str) -> Result<Box<dyn GraphNode>, GraphError> {
        let kind = self.resolve(requested)?;
        debug!(requested, kind = kind.name(), "creating node");
        Ok(match kind {
            NodeKind::Gain => Box::new(GainNode::new(self.sample_rate)),
            NodeKind::Delay => Box::new(DelayNode::new(self.max_delay_seconds, self.sample_rate)),
            NodeKind::BiquadFilter => Box::new(FilterNode::new(self.sample_rate)),
            NodeKind::Destination => return Err(GraphError::UnknownNodeKind(requested.to_string())),
        })
    }
}
