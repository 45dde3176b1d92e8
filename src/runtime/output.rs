//! Audio output through the default cpal device.

use std::sync::{Arc, Mutex, PoisonError};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::{
    graph::OutputTarget,
    runtime::synth::StepSynth,
    Error, Result, MAX_BLOCK_SIZE,
};

/// The process-wide output device, opened once at startup and handed to the
/// synth as an [`OutputTarget`].
pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    /// Opens the host's default output.
    ///
    /// Fails with [`Error::UnsupportedBackend`] when there is no device, its
    /// configuration cannot be read, or it does not take `f32` samples.
    pub fn open_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::UnsupportedBackend("no default output device".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|err| Error::UnsupportedBackend(err.to_string()))?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(Error::UnsupportedBackend(format!(
                "device wants {:?} samples, only f32 is supported",
                config.sample_format()
            )));
        }

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            "output device opened"
        );
        Ok(Self { device, config })
    }

    pub fn target(&self) -> OutputTarget {
        OutputTarget::new(self.config.sample_rate().0 as f32, self.config.channels())
    }

    /// Starts streaming the synth to the device.
    ///
    /// Each callback renders mono blocks of up to `MAX_BLOCK_SIZE` frames,
    /// passes every block to `tap`, and copies it to all device channels.
    /// The stream stops when the returned handle is dropped.
    pub fn play<F>(&self, synth: Arc<Mutex<StepSynth>>, mut tap: F) -> Result<cpal::Stream>
    where
        F: FnMut(&[f32]) + Send + 'static,
    {
        let channels = self.config.channels() as usize;
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = self.device.build_output_stream(
            &self.config.clone().into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut synth = synth.lock().unwrap_or_else(PoisonError::into_inner);
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    synth.render_block(block);
                    tap(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;
        Ok(stream)
    }
}
