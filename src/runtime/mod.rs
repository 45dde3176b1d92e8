//! The playable instrument.
//!
//! [`StepSynth`] wires the graph, sequencer and voice factory together and
//! exposes every front-end control through [`StepSynth::set`].
//! [`OutputDevice`] streams it to the default audio output.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::{Arc, Mutex};
//! use filtr8::{runtime::{Control, OutputDevice, StepSynth}, SynthConfig};
//!
//! fn main() -> filtr8::Result<()> {
//!     let device = OutputDevice::open_default()?;
//!     let mut synth = StepSynth::new(SynthConfig::new(), device.target())?;
//!     synth.set(Control::Power, 1.0)?;
//!     let _stream = device.play(Arc::new(Mutex::new(synth)), |_| {})?;
//!     std::thread::sleep(std::time::Duration::from_secs(4));
//!     Ok(())
//! }
//! ```

pub mod controls;
pub mod output;
pub mod synth;

pub use controls::{control_specs, Control, ControlGroup, ControlSpec};
pub use output::OutputDevice;
pub use synth::{StepSynth, SynthNodes};
