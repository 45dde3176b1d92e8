//! Wiring between the synth, the audio device and the front end

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::{Producer, RingBuffer};
use tracing::info;

use filtr8::{
    runtime::{Control, OutputDevice, StepSynth},
    sequencing::StepHighlighter,
    SynthConfig,
};

use crate::ui::{HighlightEvent, UiApp};

/// Samples buffered for the scope between UI frames
const SCOPE_RING_SIZE: usize = 8192;
/// Highlight events buffered between UI frames
const STEP_RING_SIZE: usize = 64;
/// How often headless mode drains the highlight ring
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Forwards step highlights from the audio thread to the UI.
///
/// A full ring drops the event; the UI only cares about the latest step.
struct RingHighlighter {
    tx: Producer<HighlightEvent>,
}

impl StepHighlighter for RingHighlighter {
    fn clear(&mut self, step: usize) {
        let _ = self.tx.push(HighlightEvent::Clear(step));
    }

    fn set(&mut self, step: usize) {
        let _ = self.tx.push(HighlightEvent::Set(step));
    }
}

fn open(config: SynthConfig) -> EyreResult<(OutputDevice, StepSynth)> {
    let device = OutputDevice::open_default().wrap_err("cannot open audio output")?;
    let synth = StepSynth::new(config, device.target()).wrap_err("cannot build synth")?;
    Ok((device, synth))
}

/// Plays for `seconds` with no UI, then stops.
///
/// Highlights travel over the same ring as in the TUI and are logged here,
/// off the audio thread.
pub fn run_headless(config: SynthConfig, seconds: f64) -> EyreResult<()> {
    let (device, mut synth) = open(config)?;
    let (step_tx, mut step_rx) = RingBuffer::<HighlightEvent>::new(STEP_RING_SIZE);
    synth.set_highlighter(Box::new(RingHighlighter { tx: step_tx }));
    synth.set(Control::Power, 1.0)?;

    let synth = Arc::new(Mutex::new(synth));
    let stream = device.play(Arc::clone(&synth), |_| {})?;

    let length = Duration::try_from_secs_f64(seconds).wrap_err("invalid play length")?;
    let deadline = Instant::now() + length;
    loop {
        while let Ok(event) = step_rx.pop() {
            if let HighlightEvent::Set(step) = event {
                info!(step = step + 1, "step");
            }
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }

    synth
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set(Control::Power, 0.0)?;
    drop(stream);
    info!("done");
    Ok(())
}

/// Runs the terminal UI until the user quits.
pub fn run_tui(config: SynthConfig) -> EyreResult<()> {
    let (device, mut synth) = open(config)?;

    let (step_tx, step_rx) = RingBuffer::<HighlightEvent>::new(STEP_RING_SIZE);
    synth.set_highlighter(Box::new(RingHighlighter { tx: step_tx }));

    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
    let synth = Arc::new(Mutex::new(synth));
    let _stream = device.play(Arc::clone(&synth), move |block| {
        for &sample in block {
            if scope_tx.push(sample).is_err() {
                break;
            }
        }
    })?;

    let mut terminal = ratatui::init();
    let sample_rate = device.target().sample_rate;
    let result = UiApp::new(synth, scope_rx, step_rx, sample_rate).run(&mut terminal);
    ratatui::restore();
    result
}
