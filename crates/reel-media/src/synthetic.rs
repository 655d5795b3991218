//! Synthetic decoder producing generated media.
//!
//! Sources are registered by path. Video streams emit colour bars whose phase
//! follows the frame index; audio streams emit a sine tone in fixed-size
//! chunks. Pre-roll and pair-wise reordering mimic what real decoders do
//! after a seek (restart from an earlier keyframe, B-frame output order).

use reel_core::{
    AudioSamples, Frame, FrameBuffer, FrameRate, PixelFormat, ReelError, Result, StreamId,
    TimeMark,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::decoder::{Decoder, DecodingState, StreamInfo};

/// Generated video stream parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticVideo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub format: PixelFormat,
    /// Emit frames in swapped pairs (1, 0, 3, 2, ...).
    pub reorder: bool,
}

impl Default for SyntheticVideo {
    fn default() -> Self {
        Self {
            width: 64,
            height: 36,
            frame_rate: FrameRate::FPS_24,
            format: PixelFormat::Rgba8,
            reorder: false,
        }
    }
}

/// Generated audio stream parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticAudio {
    pub sample_rate: u32,
    pub channels: u16,
    /// Frames per decoded chunk.
    pub chunk_frames: usize,
    pub tone_hz: f32,
}

impl Default for SyntheticAudio {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            chunk_frames: 1024,
            tone_hz: 440.0,
        }
    }
}

/// A registered synthetic media file.
///
/// The video stream, when present, is stream 0 and the audio stream is the
/// next index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSource {
    pub length: TimeMark,
    pub video: Option<SyntheticVideo>,
    pub audio: Option<SyntheticAudio>,
    /// How far before the seek target decoding restarts.
    pub preroll: TimeMark,
}

impl SyntheticSource {
    /// Video and audio with default parameters.
    pub fn new(length: TimeMark) -> Self {
        Self {
            length,
            video: Some(SyntheticVideo::default()),
            audio: Some(SyntheticAudio::default()),
            preroll: TimeMark::ZERO,
        }
    }

    pub fn video_only(length: TimeMark) -> Self {
        Self {
            audio: None,
            ..Self::new(length)
        }
    }

    pub fn audio_only(length: TimeMark) -> Self {
        Self {
            video: None,
            ..Self::new(length)
        }
    }

    pub fn with_preroll(mut self, preroll: TimeMark) -> Self {
        self.preroll = preroll;
        self
    }

    pub fn with_video(mut self, video: SyntheticVideo) -> Self {
        self.video = Some(video);
        self
    }

    pub fn with_audio(mut self, audio: SyntheticAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    fn video_stream(&self) -> Option<StreamId> {
        self.video.map(|_| StreamId(0))
    }

    fn audio_stream(&self) -> Option<StreamId> {
        self.audio
            .map(|_| StreamId(if self.video.is_some() { 1 } else { 0 }))
    }
}

/// Decoder over registered synthetic sources.
#[derive(Debug, Default)]
pub struct SyntheticDecoder {
    sources: HashMap<String, SyntheticSource>,
    opened: AtomicUsize,
}

impl SyntheticDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under `path`.
    pub fn with_source(mut self, path: impl Into<String>, source: SyntheticSource) -> Self {
        self.sources.insert(path.into(), source);
        self
    }

    /// Number of `try_decode` calls so far, successful or not.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }
}

impl Decoder for SyntheticDecoder {
    fn try_decode(&self, path: &str) -> Result<Box<dyn DecodingState>> {
        self.opened.fetch_add(1, Ordering::Relaxed);
        let source = self
            .sources
            .get(path)
            .copied()
            .ok_or_else(|| ReelError::NotFound(format!("File not found: {}", path)))?;
        if source.video.is_none() && source.audio.is_none() {
            return Err(ReelError::Decoder(format!("{} has no streams", path)));
        }
        Ok(Box::new(SyntheticState::new(source)))
    }
}

/// Decode session over a [`SyntheticSource`].
pub struct SyntheticState {
    source: SyntheticSource,
    /// Video frames emitted since the last seek.
    video_emitted: i64,
    video_base: i64,
    /// Next audio chunk index.
    audio_chunk: u64,
}

impl SyntheticState {
    fn new(source: SyntheticSource) -> Self {
        Self {
            source,
            video_emitted: 0,
            video_base: 0,
            audio_chunk: 0,
        }
    }

    fn next_video(&mut self, video: SyntheticVideo) -> Option<Frame> {
        let k = self.video_emitted;
        let offset = if video.reorder { k ^ 1 } else { k };
        let index = self.video_base + offset;
        let pts = video.frame_rate.frame_time(index);
        if pts >= self.source.length {
            return None;
        }
        self.video_emitted += 1;

        let buffer = match video.format {
            PixelFormat::Rgba8 => FrameBuffer::test_pattern(video.width, video.height, index as u32),
            other => FrameBuffer::new(video.width, video.height, other),
        };
        Some(Frame {
            pts,
            stream: StreamId(0),
            payload: reel_core::FramePayload::Video(Arc::new(buffer)),
        })
    }

    fn next_audio(&mut self, audio: SyntheticAudio, stream: StreamId) -> Option<Frame> {
        let first = self.audio_chunk * audio.chunk_frames as u64;
        let pts = TimeMark::from_samples(first, audio.sample_rate);
        if pts >= self.source.length {
            return None;
        }
        self.audio_chunk += 1;

        let channels = audio.channels as usize;
        let step = 2.0 * std::f64::consts::PI * audio.tone_hz as f64 / audio.sample_rate as f64;
        let mut data = Vec::with_capacity(audio.chunk_frames * channels);
        for n in 0..audio.chunk_frames as u64 {
            let value = ((first + n) as f64 * step).sin() as f32 * 0.25;
            data.extend(std::iter::repeat(value).take(channels));
        }
        Some(Frame {
            pts,
            stream,
            payload: reel_core::FramePayload::Audio(AudioSamples::new(
                audio.sample_rate,
                audio.channels,
                data,
            )),
        })
    }
}

impl DecodingState for SyntheticState {
    fn seek(&mut self, t: TimeMark) {
        let target = (t - self.source.preroll).max(TimeMark::ZERO);

        if let Some(video) = self.source.video {
            let rate = video.frame_rate;
            // Frame at or before the target.
            self.video_base = target.ticks() * rate.numerator as i64
                / (TimeMark::TICKS_PER_SECOND * rate.denominator as i64);
            self.video_emitted = 0;
        }
        if let Some(audio) = self.source.audio {
            let sample = target.to_samples(audio.sample_rate);
            self.audio_chunk = sample / audio.chunk_frames as u64;
        }
    }

    fn peek_frame(&mut self, stream: StreamId) -> Option<Frame> {
        if Some(stream) == self.source.video_stream() {
            let video = self.source.video?;
            self.next_video(video)
        } else if Some(stream) == self.source.audio_stream() {
            let audio = self.source.audio?;
            self.next_audio(audio, stream)
        } else {
            None
        }
    }

    fn time_base(&self, stream: StreamId) -> TimeMark {
        match self.stream_info(stream) {
            Some(StreamInfo::Video { frame_rate, .. }) => frame_rate.frame_period(),
            Some(StreamInfo::Audio { sample_rate, .. }) => {
                let chunk = self.source.audio.map(|a| a.chunk_frames).unwrap_or(0);
                TimeMark::from_samples(chunk as u64, sample_rate)
            }
            None => TimeMark::ZERO,
        }
    }

    fn length(&self) -> TimeMark {
        self.source.length
    }

    fn width(&self) -> u32 {
        self.source.video.map(|v| v.width).unwrap_or(0)
    }

    fn height(&self) -> u32 {
        self.source.video.map(|v| v.height).unwrap_or(0)
    }

    fn stream_count(&self) -> usize {
        self.source.video.is_some() as usize + self.source.audio.is_some() as usize
    }

    fn stream_info(&self, stream: StreamId) -> Option<StreamInfo> {
        if Some(stream) == self.source.video_stream() {
            self.source.video.map(|v| StreamInfo::Video {
                width: v.width,
                height: v.height,
                frame_rate: v.frame_rate,
            })
        } else if Some(stream) == self.source.audio_stream() {
            self.source.audio.map(|a| StreamInfo::Audio {
                sample_rate: a.sample_rate,
                channels: a.channels,
            })
        } else {
            None
        }
    }
}
