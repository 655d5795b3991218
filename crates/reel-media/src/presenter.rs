//! Presenters convert decoded frames into output-ready resources.
//!
//! A presenter that cannot handle a frame returns `None`; the prefetch engine
//! drops that frame and keeps going.

use reel_core::{
    AudioChunk, AudioSamples, Frame, FramePayload, PixelFormat, PresentableFrame, VideoImage,
};
use smallvec::SmallVec;

/// Converts a decoded frame for the render or audio output stage.
pub trait Presenter: Send + Sync {
    fn prepare(&self, frame: Frame) -> Option<PresentableFrame>;
}

/// Passes through video frames in formats the renderer can display.
#[derive(Debug, Clone)]
pub struct VideoPresenter {
    accepted: SmallVec<[PixelFormat; 4]>,
}

impl VideoPresenter {
    /// Accept only the listed pixel formats.
    pub fn with_formats(formats: &[PixelFormat]) -> Self {
        Self {
            accepted: formats.iter().copied().collect(),
        }
    }

    pub fn accepts(&self, format: PixelFormat) -> bool {
        self.accepted.contains(&format)
    }
}

impl Default for VideoPresenter {
    fn default() -> Self {
        Self::with_formats(&[PixelFormat::Rgba8, PixelFormat::Yuv420P])
    }
}

impl Presenter for VideoPresenter {
    fn prepare(&self, frame: Frame) -> Option<PresentableFrame> {
        match frame.payload {
            FramePayload::Video(buffer) if self.accepts(buffer.format) => {
                Some(PresentableFrame::Video(VideoImage {
                    pts: frame.pts,
                    buffer,
                }))
            }
            _ => None,
        }
    }
}

/// Remixes audio to the output channel count.
///
/// Sample rate is left untouched; rate conversion happens in the resampler
/// together with drift correction.
#[derive(Debug, Clone, Copy)]
pub struct AudioPresenter {
    channels: u16,
}

impl AudioPresenter {
    pub fn new(channels: u16) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    fn remix(&self, samples: AudioSamples) -> AudioSamples {
        let (src, dst) = (samples.channels as usize, self.channels as usize);
        if src == dst {
            return samples;
        }

        let frames = samples.frames();
        let mut data = Vec::with_capacity(frames * dst);
        for frame in samples.data.chunks_exact(src) {
            if dst == 1 {
                data.push(frame.iter().sum::<f32>() / src as f32);
            } else {
                data.extend((0..dst).map(|c| frame[c % src]));
            }
        }
        AudioSamples::new(samples.sample_rate, self.channels, data)
    }
}

impl Default for AudioPresenter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Presenter for AudioPresenter {
    fn prepare(&self, frame: Frame) -> Option<PresentableFrame> {
        match frame.payload {
            FramePayload::Audio(samples)
                if samples.channels > 0 && samples.sample_rate > 0 && self.channels > 0 =>
            {
                Some(PresentableFrame::Audio(AudioChunk {
                    pts: frame.pts,
                    samples: self.remix(samples),
                }))
            }
            _ => None,
        }
    }
}
