//! Signal graph construction and parameter binding.
//!
//! Nodes are created by name through a backend-aware [`factory`], wired into
//! a [`SignalGraph`] with forward and feedback edges, and controlled through
//! [`ParameterSetter`](param::ParameterSetter)s bound per parameter.

use thiserror::Error;

/// Feedback-capable delay node.
pub mod delay;
/// Output sink of every graph.
pub mod destination;
/// Backend-aware node constructor.
pub mod factory;
/// Filter node exposing type, frequency, Q and gain.
pub mod filter;
/// Smoothed gain stage.
pub mod gain;
/// Core traits and ids shared by all graph nodes.
pub mod node;
/// Continuous/discrete parameters and their bound setters.
pub mod param;
/// The graph itself: topology, voices and frame rendering.
pub mod signal;

pub use factory::{NamingConvention, NodeFactory};
pub use node::{GraphNode, NodeHandle, NodeId, NodeKind, RenderCtx};
pub use param::{ParamError, ParameterSetter};
pub use signal::{EdgeKind, OutputTarget, SignalGraph};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0:?} is not part of the graph")]
    UnknownNode(NodeId),

    #[error("backend cannot create a node named `{0}`")]
    UnknownNodeKind(String),

    #[error("connecting {from:?} -> {to:?} would form a cycle; use a feedback edge")]
    CycleDetected { from: NodeId, to: NodeId },

    #[error("the destination cannot feed other nodes")]
    DestinationHasNoOutput,
}
