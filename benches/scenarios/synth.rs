//! Benchmarks for the full step synth.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use filtr8::{
    graph::OutputTarget,
    runtime::{Control, StepSynth},
    SynthConfig,
};

use crate::BLOCK_SIZES;

fn synth(echo: bool) -> StepSynth {
    let mut synth = StepSynth::new(SynthConfig::new(), OutputTarget::new(48_000.0, 2))
        .expect("default synth builds");
    synth.set(Control::Power, 1.0).expect("power on");
    if echo {
        synth.set(Control::DelayTime, 0.25).expect("delay time");
        synth.set(Control::Feedback, 0.6).expect("feedback");
    }
    // past the first step so a voice is sounding
    synth.run_for(300.0);
    synth
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut dry = synth(false);
        group.bench_with_input(BenchmarkId::new("dry", size), &size, |b, _| {
            b.iter(|| {
                dry.render_block(black_box(&mut buffer));
            })
        });

        // Feedback loop active, with the filter swept between blocks
        let mut wet = synth(true);
        let mut sweep = 0u32;
        group.bench_with_input(BenchmarkId::new("echo_sweep", size), &size, |b, _| {
            b.iter(|| {
                sweep = sweep.wrapping_add(1);
                let cutoff = 400.0 + (sweep % 64) as f32 * 30.0;
                let _ = wet.set(Control::FilterFrequency, cutoff);
                wet.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
