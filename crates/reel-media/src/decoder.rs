//! Decoder interfaces.
//!
//! The concrete demuxer/codec stack lives behind these traits. The timeline
//! only ever talks to a [`DecodingState`].

use reel_core::{Frame, FrameRate, Result, StreamId, TimeMark};
use serde::{Deserialize, Serialize};

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Video,
    Audio,
}

/// Description of one stream in a decode session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StreamInfo {
    Video {
        width: u32,
        height: u32,
        frame_rate: FrameRate,
    },
    Audio {
        sample_rate: u32,
        channels: u16,
    },
}

impl StreamInfo {
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Video { .. } => StreamKind::Video,
            Self::Audio { .. } => StreamKind::Audio,
        }
    }
}

/// A live decode session for one media file.
///
/// Decoding is ordered and stateful per stream: `peek_frame` returns the next
/// frame of a stream after the last `seek`, or `None` once the stream ended.
pub trait DecodingState: Send {
    /// Reposition every stream at or before `t` (source time).
    fn seek(&mut self, t: TimeMark);

    /// Decode the next frame of `stream`.
    fn peek_frame(&mut self, stream: StreamId) -> Option<Frame>;

    /// Duration of one decoded unit of `stream` (frame period, audio chunk).
    fn time_base(&self, stream: StreamId) -> TimeMark;

    /// Total length of the media.
    fn length(&self) -> TimeMark;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Number of streams in the file.
    fn stream_count(&self) -> usize;

    fn stream_info(&self, stream: StreamId) -> Option<StreamInfo>;

    /// First stream of the given kind.
    fn find_stream(&self, kind: StreamKind) -> Option<StreamId> {
        (0..self.stream_count())
            .map(StreamId)
            .find(|&s| self.stream_info(s).map(|info| info.kind()) == Some(kind))
    }
}

/// Opens decode sessions.
pub trait Decoder: Send + Sync {
    /// Open `path`. Failure is fatal to that media reference only.
    fn try_decode(&self, path: &str) -> Result<Box<dyn DecodingState>>;
}

impl<D: Decoder + ?Sized> Decoder for std::sync::Arc<D> {
    fn try_decode(&self, path: &str) -> Result<Box<dyn DecodingState>> {
        (**self).try_decode(path)
    }
}
