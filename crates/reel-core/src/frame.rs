//! Frame types flowing from the decoder to the renderer.
//!
//! A [`Frame`] is what a decoding session emits. A [`PresentableFrame`] is
//! what a presenter hands back after converting it for the output stage.
//! Both are tagged variants so no stage needs to downcast.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::time::TimeMark;

/// Index of a stream inside a media source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamId(pub usize);

impl StreamId {
    /// Conventional video stream.
    pub const VIDEO: Self = Self(0);
    /// Conventional audio stream.
    pub const AUDIO: Self = Self(1);
}

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 8-bit grayscale
    Gray8,
    /// NV12 YUV format
    Nv12,
    /// YUV 4:2:0 planar
    Yuv420P,
}

impl PixelFormat {
    /// Number of planes for this format.
    pub fn plane_count(self) -> usize {
        match self {
            Self::Rgba8 | Self::Gray8 => 1,
            Self::Nv12 => 2,
            Self::Yuv420P => 3,
        }
    }

    /// Calculate total bytes needed for a frame of this format.
    pub fn frame_size(self, width: u32, height: u32) -> usize {
        let luma = (width * height) as usize;
        match self {
            Self::Rgba8 => luma * 4,
            Self::Gray8 => luma,
            Self::Nv12 => luma + luma / 2,
            Self::Yuv420P => luma + (width / 2 * height / 2) as usize * 2,
        }
    }
}

/// A plane of pixel data with stride information.
#[derive(Debug, Clone)]
pub struct FramePlane {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Bytes per row (may include padding)
    pub stride: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    bytes_per_pixel: usize,
}

impl FramePlane {
    /// Create a new frame plane with the given dimensions.
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize) -> Self {
        // Align stride to 64 bytes
        let min_stride = (width as usize) * bytes_per_pixel;
        let stride = (min_stride + 63) & !63;
        Self {
            data: vec![0u8; stride * height as usize],
            stride,
            width,
            height,
            bytes_per_pixel,
        }
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.bytes_per_pixel]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.bytes_per_pixel;
        &mut self.data[start..end]
    }
}

/// A video frame in CPU memory.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Pixel format
    pub format: PixelFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel data planes (1-3 depending on format)
    pub planes: SmallVec<[FramePlane; 3]>,
}

impl FrameBuffer {
    /// Create a new frame buffer with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let planes = match format {
            PixelFormat::Rgba8 => smallvec::smallvec![FramePlane::new(width, height, 4)],
            PixelFormat::Gray8 => smallvec::smallvec![FramePlane::new(width, height, 1)],
            PixelFormat::Nv12 => smallvec::smallvec![
                FramePlane::new(width, height, 1),         // Y
                FramePlane::new(width / 2, height / 2, 2), // UV interleaved
            ],
            PixelFormat::Yuv420P => smallvec::smallvec![
                FramePlane::new(width, height, 1),         // Y
                FramePlane::new(width / 2, height / 2, 1), // U
                FramePlane::new(width / 2, height / 2, 1), // V
            ],
        };

        Self {
            format,
            width,
            height,
            planes,
        }
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.planes.iter().map(|p| p.data.len()).sum()
    }

    /// Get the primary plane (plane 0).
    #[inline]
    pub fn primary_plane(&self) -> &FramePlane {
        &self.planes[0]
    }

    /// Get the primary plane mutably.
    #[inline]
    pub fn primary_plane_mut(&mut self) -> &mut FramePlane {
        &mut self.planes[0]
    }

    /// Create a test pattern frame (color bars), shifted by `phase` bars.
    pub fn test_pattern(width: u32, height: u32, phase: u32) -> Self {
        const COLORS: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];

        let mut frame = Self::new(width, height, PixelFormat::Rgba8);
        let plane = frame.primary_plane_mut();
        for y in 0..height {
            let row = plane.row_mut(y);
            for x in 0..width {
                let i = (x * 4) as usize;
                let bar = ((x * 8 / width.max(1) + phase) % 8) as usize;
                row[i..i + 4].copy_from_slice(&COLORS[bar]);
            }
        }
        frame
    }
}

/// Arc-wrapped frame buffer for shared ownership.
pub type SharedFrameBuffer = Arc<FrameBuffer>;

/// Interleaved `f32` PCM samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples, `frames() * channels` long.
    pub data: Vec<f32>,
}

impl AudioSamples {
    pub fn new(sample_rate: u32, channels: u16, data: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels,
            data,
        }
    }

    /// `frames` frames of silence.
    pub fn silence(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self::new(sample_rate, channels, vec![0.0; frames * channels as usize])
    }

    /// Number of audio frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.data.len() / self.channels as usize
        }
    }

    /// Playback duration at the native sample rate.
    pub fn duration(&self) -> TimeMark {
        TimeMark::from_samples(self.frames() as u64, self.sample_rate)
    }
}

/// Payload of a decoded frame.
#[derive(Debug, Clone)]
pub enum FramePayload {
    Video(SharedFrameBuffer),
    Audio(AudioSamples),
}

/// A decoder-native frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Presentation time
    pub pts: TimeMark,
    /// Stream this frame was decoded from
    pub stream: StreamId,
    pub payload: FramePayload,
}

impl Frame {
    pub fn video(pts: TimeMark, buffer: SharedFrameBuffer) -> Self {
        Self {
            pts,
            stream: StreamId::VIDEO,
            payload: FramePayload::Video(buffer),
        }
    }

    pub fn audio(pts: TimeMark, samples: AudioSamples) -> Self {
        Self {
            pts,
            stream: StreamId::AUDIO,
            payload: FramePayload::Audio(samples),
        }
    }

    /// Shift the presentation time by `offset`.
    pub fn rebased(mut self, offset: TimeMark) -> Self {
        self.pts += offset;
        self
    }
}

/// A video frame ready for display.
#[derive(Debug, Clone)]
pub struct VideoImage {
    pub pts: TimeMark,
    pub buffer: SharedFrameBuffer,
}

/// An audio buffer ready for the output stage.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub pts: TimeMark,
    pub samples: AudioSamples,
}

/// Presenter output, consumed by the renderer or the audio output.
#[derive(Debug, Clone)]
pub enum PresentableFrame {
    Video(VideoImage),
    Audio(AudioChunk),
}

impl PresentableFrame {
    /// Presentation time.
    pub fn pts(&self) -> TimeMark {
        match self {
            Self::Video(image) => image.pts,
            Self::Audio(chunk) => chunk.pts,
        }
    }

    /// Intrinsic duration. Video frames have none; their cadence is set by
    /// the playback clock.
    pub fn duration(&self) -> Option<TimeMark> {
        match self {
            Self::Video(_) => None,
            Self::Audio(chunk) => Some(chunk.samples.duration()),
        }
    }

    /// Shift the presentation time by `offset`.
    pub fn rebased(mut self, offset: TimeMark) -> Self {
        match &mut self {
            Self::Video(image) => image.pts += offset,
            Self::Audio(chunk) => chunk.pts += offset,
        }
        self
    }

    pub fn as_video(&self) -> Option<&VideoImage> {
        match self {
            Self::Video(image) => Some(image),
            Self::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioChunk> {
        match self {
            Self::Audio(chunk) => Some(chunk),
            Self::Video(_) => None,
        }
    }
}
