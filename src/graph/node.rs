use crate::graph::param::{
    ParamError, ParamKind, ParamSlot, ParamSpec, ParameterSetter, FILTER_KINDS,
};

/// Index of a node inside its [`SignalGraph`](crate::graph::SignalGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time_ms: Position of the frame being rendered on the graph's clock
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time_ms: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time_ms: f64) -> Self {
        Self {
            sample_rate,
            time_ms,
        }
    }
}

/// The processing kinds a graph can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Gain,
    Delay,
    BiquadFilter,
    /// The single sink feeding the output device.
    Destination,
}

const GAIN_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "gain",
    kind: ParamKind::Continuous,
}];

const DELAY_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "delayTime",
    kind: ParamKind::Continuous,
}];

const FILTER_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "type",
        kind: ParamKind::Discrete(FILTER_KINDS),
    },
    ParamSpec {
        name: "frequency",
        kind: ParamKind::Continuous,
    },
    ParamSpec {
        name: "Q",
        kind: ParamKind::Continuous,
    },
    ParamSpec {
        name: "gain",
        kind: ParamKind::Continuous,
    },
];

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Gain => "Gain",
            NodeKind::Delay => "Delay",
            NodeKind::BiquadFilter => "BiquadFilter",
            NodeKind::Destination => "Destination",
        }
    }

    /// Parameters exposed by this kind, with their binding kind.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            NodeKind::Gain => GAIN_PARAMS,
            NodeKind::Delay => DELAY_PARAMS,
            NodeKind::BiquadFilter => FILTER_PARAMS,
            NodeKind::Destination => &[],
        }
    }

    pub fn param(self, name: &str) -> Option<ParamSpec> {
        self.params().iter().copied().find(|spec| spec.name == name)
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes are driven one frame at a time so feedback edges can close loops
/// with a single-sample delay.
pub trait GraphNode: Send {
    fn kind(&self) -> NodeKind;

    /// Consumes the summed input for this frame and returns the node's output.
    fn process(&mut self, input: f32, ctx: &RenderCtx) -> f32;

    /// Live access to a named parameter.
    ///
    /// Default implementation exposes nothing (passthrough nodes).
    fn param_mut(&mut self, _name: &str) -> Option<ParamSlot<'_>> {
        None
    }

    /// Clear any internal signal history.
    fn reset(&mut self) {}
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }

    fn process(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        (**self).process(input, ctx)
    }

    fn param_mut(&mut self, name: &str) -> Option<ParamSlot<'_>> {
        (**self).param_mut(name)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// A node as seen from outside the graph: its id and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl NodeHandle {
    /// Binds a setter for `name`, failing if this kind has no such parameter.
    pub fn bind_parameter(&self, name: &str) -> Result<ParameterSetter, ParamError> {
        let spec = self.kind.param(name).ok_or_else(|| ParamError::UnknownParam {
            node: self.id,
            name: name.to_string(),
        })?;
        Ok(ParameterSetter::new(self.id, spec))
    }
}
