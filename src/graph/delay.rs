use crate::{
    dsp::delay::DelayLine,
    graph::{
        node::{GraphNode, NodeKind, RenderCtx},
        param::{AudioParam, ParamSlot},
    },
};

/// Pure delay: output is the input from `delayTime` seconds ago.
///
/// Echo decay is not built in; it comes from wiring a gain back into the
/// node's input with a feedback edge.
pub struct DelayNode {
    delay_line: DelayLine,
    delay_time: AudioParam,
}

impl DelayNode {
    pub fn new(max_delay_seconds: f32, sample_rate: f32) -> Self {
        Self {
            delay_line: DelayLine::new(max_delay_seconds, sample_rate),
            delay_time: AudioParam::new(0.0, 0.0, max_delay_seconds, sample_rate),
        }
    }

    pub fn delay_time(&self) -> &AudioParam {
        &self.delay_time
    }
}

impl GraphNode for DelayNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Delay
    }

    #[inline]
    fn process(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        let delay_samples = self.delay_time.next() * ctx.sample_rate;
        self.delay_line.next_sample(input, delay_samples)
    }

    fn param_mut(&mut self, name: &str) -> Option<ParamSlot<'_>> {
        match name {
            "delayTime" => Some(ParamSlot::Continuous(&mut self.delay_time)),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.delay_line.reset();
    }
}
