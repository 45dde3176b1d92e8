//! Benchmarks for low-level DSP primitives.

mod delay;
mod filter;
mod oscillator;

pub use delay::bench_delay;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
