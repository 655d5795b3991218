//! Reel Audio - Audio output side of playback
//!
//! Architecture:
//! - `AudioOutputBuffer`: mutex-guarded ring between the playback thread and the device callback
//! - `DriftCorrector`: moving-average A/V sync that picks how many samples each chunk should become
//! - `Resampler`: stretches a chunk to the corrected sample count and output rate
//! - `CpalOutput`: default output device pulling from the buffer (feature `cpal`)

#[cfg(feature = "cpal")]
pub mod device;
pub mod drift;
pub mod output_buffer;
pub mod resample;

#[cfg(feature = "cpal")]
pub use device::CpalOutput;
pub use drift::DriftCorrector;
pub use output_buffer::AudioOutputBuffer;
pub use resample::Resampler;
