use crate::graph::node::{GraphNode, NodeKind, RenderCtx};

/// Sink of the graph. Sums everything routed to it and hands the mix to the
/// output device; nothing can be wired out of it.
#[derive(Debug, Default)]
pub struct DestinationNode;

impl GraphNode for DestinationNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Destination
    }

    #[inline]
    fn process(&mut self, input: f32, _ctx: &RenderCtx) -> f32 {
        input
    }
}
