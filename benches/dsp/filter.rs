//! Benchmarks for the state-variable filter across its response types.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use filtr8::dsp::{filter::SVFilter, FilterType};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for filter_type in [
            FilterType::LowPass,
            FilterType::HighPass,
            FilterType::BandPass,
            FilterType::Peaking,
            FilterType::Notch,
        ] {
            let mut filter = SVFilter::new(filter_type);
            filter.set_cutoff(1_000.0);
            filter.set_q(2.0);
            filter.set_gain_db(6.0);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(filter_type.name(), size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), SAMPLE_RATE);
                })
            });
        }

        // Cutoff moves every block, so coefficients are recomputed
        let mut filter = SVFilter::lowpass(1_000.0);
        let mut buffer = input.clone();
        let mut sweep = 0u32;
        group.bench_with_input(BenchmarkId::new("lowpass_sweep", size), &size, |b, _| {
            b.iter(|| {
                sweep = sweep.wrapping_add(1);
                filter.set_cutoff(500.0 + (sweep % 100) as f32 * 20.0);
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
