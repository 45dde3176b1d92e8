use crate::graph::{
    node::{GraphNode, NodeKind, RenderCtx},
    param::{AudioParam, ParamSlot},
};

/// Scales its input by a smoothed `gain` parameter.
pub struct GainNode {
    gain: AudioParam,
}

impl GainNode {
    pub const DEFAULT_GAIN: f32 = 1.0;
    const RANGE: f32 = 1.0e4;

    pub fn new(sample_rate: f32) -> Self {
        Self {
            gain: AudioParam::new(Self::DEFAULT_GAIN, -Self::RANGE, Self::RANGE, sample_rate),
        }
    }

    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }
}

impl GraphNode for GainNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Gain
    }

    #[inline]
    fn process(&mut self, input: f32, _ctx: &RenderCtx) -> f32 {
        input * self.gain.next()
    }

    fn param_mut(&mut self, name: &str) -> Option<ParamSlot<'_>> {
        match name {
            "gain" => Some(ParamSlot::Continuous(&mut self.gain)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_assigned_gain() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let mut node = GainNode::new(48_000.0);
        match node.param_mut("gain") {
            Some(ParamSlot::Continuous(param)) => param.set_value(0.25),
            _ => panic!("gain should be continuous"),
        }

        let mut out = 0.0;
        for _ in 0..4_800 {
            out = node.process(1.0, &ctx);
        }
        assert!((out - 0.25).abs() < 1e-3, "got {out}");
    }
}
