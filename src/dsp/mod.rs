//! Low-level DSP primitives used by the graph nodes and voices.
//!
//! These components are allocation-free once constructed and realtime-safe.
//! They stay focused on the signal-processing math; the graph layer handles
//! routing and parameter smoothing.

/// Fractional delay line backing the echo node.
pub mod delay;
/// State-variable filter with seven responses.
pub mod filter;
/// Phase-accumulator oscillator with four waveforms.
pub mod oscillator;

pub use filter::FilterType;
pub use oscillator::Waveform;
