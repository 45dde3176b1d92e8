//! Whole-instrument benchmarks.
//!
//! These drive the wired graph with the sequencer running, the way the
//! audio callback does.

mod synth;

pub use synth::bench_synth;
