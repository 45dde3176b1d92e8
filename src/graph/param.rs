//! Parameter binding.
//!
//! Every node parameter is declared up front as either continuous (a smoothed
//! [`AudioParam`]) or discrete (an attribute assigned by name). A
//! [`ParameterSetter`] captures the node, the parameter name and that kind, so
//! callers can push plain numbers without knowing what sits behind them.

use thiserror::Error;

use crate::dsp::{FilterType, Waveform};
use crate::graph::{node::NodeId, SignalGraph};

/// Time constant of the one-pole smoother applied to continuous parameters.
pub const SMOOTHING_SECONDS: f32 = 0.005;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("node {node:?} has no parameter named `{name}`")]
    UnknownParam { node: NodeId, name: String },

    #[error("node {0:?} is not part of the graph")]
    UnknownNode(NodeId),

    #[error("index {index} is outside `{param}` (expected 0..{len})")]
    IndexOutOfRange {
        param: &'static str,
        index: f32,
        len: usize,
    },

    #[error("{value} is outside `{param}` (expected {min}..={max})")]
    OutOfRange {
        param: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("`{param}` cannot take non-finite value {value}")]
    NotFinite { param: &'static str, value: f32 },

    #[error("`{variant}` is not a variant of `{param}`")]
    UnknownVariant {
        param: &'static str,
        variant: &'static str,
    },

    #[error("`{0}` was bound with a different kind than the node exposes")]
    KindMismatch(&'static str),
}

/// Ordered names an enumerated parameter's numeric index selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumTable {
    pub param: &'static str,
    pub names: &'static [&'static str],
}

/// Wave shape table used by the voice factory.
pub const WAVE_SHAPES: EnumTable = EnumTable {
    param: "type",
    names: &Waveform::NAMES,
};

/// Filter response table used by the filter node's `type` parameter.
pub const FILTER_KINDS: EnumTable = EnumTable {
    param: "type",
    names: &FilterType::NAMES,
};

impl EnumTable {
    /// Resolves a control value to a variant name.
    ///
    /// The value is rounded to the nearest index. Anything outside the table
    /// is rejected rather than clamped or wrapped.
    pub fn lookup(&self, value: f32) -> Result<&'static str, ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite {
                param: self.param,
                value,
            });
        }

        let index = value.round();
        if index < 0.0 || index >= self.names.len() as f32 {
            return Err(ParamError::IndexOutOfRange {
                param: self.param,
                index: value,
                len: self.names.len(),
            });
        }

        Ok(self.names[index as usize])
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A smoothed, range-limited control value.
///
/// `value()` is the assigned target; `next()` glides the rendered value
/// towards it once per sample.
#[derive(Debug, Clone)]
pub struct AudioParam {
    target: f32,
    current: f32,
    min: f32,
    max: f32,
    coeff: f32,
}

impl AudioParam {
    pub fn new(default: f32, min: f32, max: f32, sample_rate: f32) -> Self {
        let default = default.clamp(min, max);
        Self {
            target: default,
            current: default,
            min,
            max,
            coeff: 1.0 - (-1.0 / (SMOOTHING_SECONDS * sample_rate)).exp(),
        }
    }

    pub fn value(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Assigns a new target; the rendered value follows smoothly.
    pub fn set_value(&mut self, value: f32) {
        self.target = value.clamp(self.min, self.max);
    }

    /// Assigns a new target and skips the glide.
    pub fn jump_to(&mut self, value: f32) {
        self.set_value(value);
        self.current = self.target;
    }

    #[inline]
    pub fn next(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.coeff;
        self.current
    }
}

/// An attribute that can only be assigned a named variant.
pub trait DiscreteAttr {
    fn assign(&mut self, param: &'static str, variant: &'static str) -> Result<(), ParamError>;
    fn variant(&self) -> &'static str;
}

impl DiscreteAttr for FilterType {
    fn assign(&mut self, param: &'static str, variant: &'static str) -> Result<(), ParamError> {
        *self = variant
            .parse()
            .map_err(|_| ParamError::UnknownVariant { param, variant })?;
        Ok(())
    }

    fn variant(&self) -> &'static str {
        self.name()
    }
}

impl DiscreteAttr for Waveform {
    fn assign(&mut self, param: &'static str, variant: &'static str) -> Result<(), ParamError> {
        *self = variant
            .parse()
            .map_err(|_| ParamError::UnknownVariant { param, variant })?;
        Ok(())
    }

    fn variant(&self) -> &'static str {
        self.name()
    }
}

/// How a parameter accepts values, fixed when the node kind is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Continuous,
    Discrete(EnumTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Mutable access to a live parameter inside a node.
pub enum ParamSlot<'a> {
    Continuous(&'a mut AudioParam),
    Discrete(&'a mut dyn DiscreteAttr),
}

/// A bound setter for one parameter of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSetter {
    node: NodeId,
    spec: ParamSpec,
}

impl ParameterSetter {
    pub(crate) fn new(node: NodeId, spec: ParamSpec) -> Self {
        Self { node, spec }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn kind(&self) -> ParamKind {
        self.spec.kind
    }

    /// Applies `value` to the bound parameter.
    ///
    /// Continuous parameters take the value as their new target; a value
    /// outside the parameter's range (the filter's `frequency` stops at
    /// Nyquist) is rejected. Discrete parameters treat it as an index into
    /// their enumeration table. Either way a rejected value leaves the
    /// previous one in place.
    pub fn set(&self, graph: &mut SignalGraph, value: f32) -> Result<(), ParamError> {
        let name = self.spec.name;
        match (self.spec.kind, graph.param_slot(self.node, name)?) {
            (ParamKind::Continuous, ParamSlot::Continuous(param)) => {
                if !value.is_finite() {
                    return Err(ParamError::NotFinite { param: name, value });
                }
                let (min, max) = param.range();
                if !(min..=max).contains(&value) {
                    return Err(ParamError::OutOfRange {
                        param: name,
                        value,
                        min,
                        max,
                    });
                }
                param.set_value(value);
                Ok(())
            }
            (ParamKind::Discrete(table), ParamSlot::Discrete(attr)) => {
                let variant = table.lookup(value)?;
                attr.assign(name, variant)
            }
            _ => Err(ParamError::KindMismatch(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_shape_index_zero_is_first_name() {
        assert_eq!(WAVE_SHAPES.lookup(0.0), Ok("sine"));
        assert_eq!(WAVE_SHAPES.lookup(3.0), Ok("triangle"));
    }

    #[test]
    fn filter_kind_index_three_is_fourth_name() {
        assert_eq!(FILTER_KINDS.lookup(3.0), Ok("lowshelf"));
        assert_eq!(FILTER_KINDS.lookup(6.0), Ok("allpass"));
    }

    #[test]
    fn lookup_rounds_to_nearest_index() {
        assert_eq!(FILTER_KINDS.lookup(1.4), Ok("highpass"));
        assert_eq!(FILTER_KINDS.lookup(1.6), Ok("bandpass"));
    }

    #[test]
    fn lookup_rejects_out_of_table() {
        assert!(matches!(
            WAVE_SHAPES.lookup(4.0),
            Err(ParamError::IndexOutOfRange { len: 4, .. })
        ));
        assert!(matches!(
            WAVE_SHAPES.lookup(-1.0),
            Err(ParamError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            WAVE_SHAPES.lookup(f32::NAN),
            Err(ParamError::NotFinite { .. })
        ));
    }

    #[test]
    fn audio_param_glides_to_target() {
        let mut param = AudioParam::new(0.0, 0.0, 1.0, 48_000.0);
        param.set_value(1.0);
        assert_eq!(param.value(), 1.0);

        let first = param.next();
        assert!(first > 0.0 && first < 0.1);
        for _ in 0..48_000 {
            param.next();
        }
        assert!((param.current() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn audio_param_clamps_and_jumps() {
        let mut param = AudioParam::new(0.5, 0.0, 1.0, 48_000.0);
        param.jump_to(3.0);
        assert_eq!(param.value(), 1.0);
        assert_eq!(param.current(), 1.0);
    }

    #[test]
    fn discrete_assign_parses_variant() {
        let mut kind = FilterType::LowPass;
        kind.assign("type", "notch").unwrap();
        assert_eq!(kind, FilterType::Notch);
        assert_eq!(kind.variant(), "notch");
        assert!(kind.assign("type", "comb").is_err());
        assert_eq!(kind, FilterType::Notch);
    }
}
