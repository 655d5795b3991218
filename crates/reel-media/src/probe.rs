//! Media probing from an open decode session.

use reel_core::{FrameRate, StreamId, TimeMark};
use serde::{Deserialize, Serialize};

use crate::decoder::{DecodingState, StreamInfo};

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Duration
    pub duration: TimeMark,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
    /// Audio streams
    pub audio_streams: Vec<AudioStreamInfo>,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub stream: StreamId,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
}

/// Information about an audio stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub stream: StreamId,
    pub sample_rate: u32,
    pub channels: u16,
}

impl MediaProbe {
    /// Summarize the streams of an open session.
    pub fn from_session(path: impl Into<String>, state: &dyn DecodingState) -> Self {
        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();

        for index in 0..state.stream_count() {
            let stream = StreamId(index);
            match state.stream_info(stream) {
                Some(StreamInfo::Video {
                    width,
                    height,
                    frame_rate,
                }) => video_streams.push(VideoStreamInfo {
                    stream,
                    width,
                    height,
                    frame_rate,
                }),
                Some(StreamInfo::Audio {
                    sample_rate,
                    channels,
                }) => audio_streams.push(AudioStreamInfo {
                    stream,
                    sample_rate,
                    channels,
                }),
                None => {}
            }
        }

        Self {
            path: path.into(),
            duration: state.length(),
            video_streams,
            audio_streams,
        }
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Check if the file has audio.
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get the primary audio stream info.
    pub fn primary_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }
}
