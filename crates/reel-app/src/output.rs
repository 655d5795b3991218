//! Audio sinks draining the shared output buffer.

use anyhow::Result;
use reel_audio::AudioOutputBuffer;
use reel_core::{AudioConfig, TimeMark};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::info;

/// Where buffered audio goes.
pub enum AudioOutput {
    #[cfg_attr(feature = "device", allow(dead_code))]
    Simulated(SimulatedOutput),
    #[cfg(feature = "device")]
    Device(reel_audio::CpalOutput),
}

impl AudioOutput {
    /// Open the default device when built with `device`, else simulate one.
    pub fn start(buffer: Arc<AudioOutputBuffer>, config: &AudioConfig) -> Result<Self> {
        #[cfg(feature = "device")]
        {
            let output = reel_audio::CpalOutput::start(buffer, config.device_buffer_frames)?;
            Ok(Self::Device(output))
        }
        #[cfg(not(feature = "device"))]
        {
            Ok(Self::Simulated(SimulatedOutput::start(buffer, config)?))
        }
    }
}

/// Consumer thread reading one device buffer per device period and
/// discarding it.
pub struct SimulatedOutput {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedOutput {
    #[cfg_attr(feature = "device", allow(dead_code))]
    pub fn start(buffer: Arc<AudioOutputBuffer>, config: &AudioConfig) -> Result<Self> {
        let frames = config.device_buffer_frames;
        let period = TimeMark::from_samples(frames as u64, config.sample_rate);
        let stop = Arc::new(AtomicBool::new(false));
        info!("Simulating audio output ({} frames every {})", frames, period);

        let handle = {
            let stop = Arc::clone(&stop);
            std::thread::Builder::new()
                .name("reel-audio-sim".into())
                .spawn(move || {
                    let mut chunk = vec![0.0f32; frames * buffer.channels() as usize];
                    let period = std::time::Duration::from_micros(period.ticks() as u64);
                    while !stop.load(Ordering::Acquire) {
                        buffer.read(&mut chunk);
                        std::thread::sleep(period);
                    }
                })?
        };

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for SimulatedOutput {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
