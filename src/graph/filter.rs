use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::{
        node::{GraphNode, NodeKind, RenderCtx},
        param::{AudioParam, ParamSlot},
    },
};

/*
Filter Node
===========

Wraps the state-variable filter with the parameter surface of a classic
biquad: a discrete `type` plus continuous `frequency`, `Q` and `gain`.

  type:       one of the seven responses, picked by name
  frequency:  cutoff / center in Hz
  Q:          resonance; for shelves it is ignored
  gain:       boost or cut in dB, used by lowshelf and peaking

Parameters are smoothed once per sample and pushed into the filter, which
only recomputes its coefficients when something actually moved.
*/

pub struct FilterNode {
    filter: SVFilter,
    filter_type: FilterType,
    frequency: AudioParam,
    q: AudioParam,
    gain_db: AudioParam,
}

impl FilterNode {
    pub const DEFAULT_FREQUENCY: f32 = 350.0;
    pub const DEFAULT_Q: f32 = 1.0;

    pub fn new(sample_rate: f32) -> Self {
        let nyquist = sample_rate / 2.0;
        Self {
            filter: SVFilter::new(FilterType::LowPass),
            filter_type: FilterType::LowPass,
            frequency: AudioParam::new(Self::DEFAULT_FREQUENCY, 0.0, nyquist, sample_rate),
            q: AudioParam::new(Self::DEFAULT_Q, 0.0, 1_000.0, sample_rate),
            gain_db: AudioParam::new(0.0, -40.0, 40.0, sample_rate),
        }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn frequency(&self) -> &AudioParam {
        &self.frequency
    }

    pub fn q(&self) -> &AudioParam {
        &self.q
    }
}

impl GraphNode for FilterNode {
    fn kind(&self) -> NodeKind {
        NodeKind::BiquadFilter
    }

    #[inline]
    fn process(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        self.filter.set_filter_type(self.filter_type);
        self.filter.set_cutoff(self.frequency.next());
        self.filter.set_q(self.q.next());
        self.filter.set_gain_db(self.gain_db.next());
        self.filter.next_sample(input, ctx.sample_rate)
    }

    fn param_mut(&mut self, name: &str) -> Option<ParamSlot<'_>> {
        match name {
            "type" => Some(ParamSlot::Discrete(&mut self.filter_type)),
            "frequency" => Some(ParamSlot::Continuous(&mut self.frequency)),
            "Q" => Some(ParamSlot::Continuous(&mut self.q)),
            "gain" => Some(ParamSlot::Continuous(&mut self.gain_db)),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_is_assigned_by_name() {
        let mut node = FilterNode::new(48_000.0);
        match node.param_mut("type") {
            Some(ParamSlot::Discrete(attr)) => attr.assign("type", "highpass").unwrap(),
            _ => panic!("type should be discrete"),
        }
        assert_eq!(node.filter_type(), FilterType::HighPass);
    }

    #[test]
    fn highpass_blocks_dc() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let mut node = FilterNode::new(48_000.0);
        if let Some(ParamSlot::Discrete(attr)) = node.param_mut("type") {
            attr.assign("type", "highpass").unwrap();
        }
        let mut out = 1.0;
        for _ in 0..4_096 {
            out = node.process(1.0, &ctx);
        }
        assert!(out.abs() < 1e-3);
    }
}
