//! Default output device backed by cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use reel_core::{ReelError, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::output_buffer::AudioOutputBuffer;

/// A running output stream pulling from an [`AudioOutputBuffer`].
///
/// The stream stops when this value is dropped.
pub struct CpalOutput {
    stream: cpal::Stream,
}

impl CpalOutput {
    /// Open the default output device in the buffer's format and start it.
    pub fn start(buffer: Arc<AudioOutputBuffer>, device_buffer_frames: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ReelError::Audio("No audio output device available".into()))?;

        let config = cpal::StreamConfig {
            channels: buffer.channels(),
            sample_rate: cpal::SampleRate(buffer.sample_rate()),
            buffer_size: cpal::BufferSize::Fixed(device_buffer_frames as u32),
        };
        info!(
            "Opening audio output {} ({} Hz, {} ch, {} frames)",
            device.name().unwrap_or_else(|_| "unknown".into()),
            buffer.sample_rate(),
            buffer.channels(),
            device_buffer_frames
        );

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    buffer.read(data);
                },
                |err| error!("Audio output error: {}", err),
                None,
            )
            .map_err(|e| ReelError::Audio(format!("Failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| ReelError::Audio(format!("Failed to start output stream: {}", e)))?;
        Ok(Self { stream })
    }

    pub fn pause(&self) -> Result<()> {
        self.stream
            .pause()
            .map_err(|e| ReelError::Audio(format!("Failed to pause output stream: {}", e)))
    }

    pub fn resume(&self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| ReelError::Audio(format!("Failed to resume output stream: {}", e)))
    }
}
