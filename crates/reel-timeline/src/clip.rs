//! Clip types for the timeline.

use reel_core::TimeMark;
use reel_media::Media;
use std::sync::Arc;

/// A span of a media source.
///
/// `start` is the in-point inside the source; `length` is how much of it
/// plays. Placement on a track belongs to the owning `MediaObject`.
#[derive(Debug, Clone)]
pub struct MediaClip {
    media: Arc<Media>,
    start: TimeMark,
    length: TimeMark,
}

impl MediaClip {
    /// Create a clip starting at the beginning of `media`, with zero length.
    pub fn new(media: Arc<Media>) -> Self {
        Self {
            media,
            start: TimeMark::ZERO,
            length: TimeMark::ZERO,
        }
    }

    pub fn with_start(mut self, start: TimeMark) -> Self {
        self.set_start(start);
        self
    }

    pub fn with_length(mut self, length: TimeMark) -> Self {
        self.set_length(length);
        self
    }

    pub fn media(&self) -> &Arc<Media> {
        &self.media
    }

    /// Source in-point.
    pub fn start(&self) -> TimeMark {
        self.start
    }

    pub fn set_start(&mut self, start: TimeMark) {
        self.start = start.max(TimeMark::ZERO);
    }

    pub fn length(&self) -> TimeMark {
        self.length
    }

    /// Negative lengths are clamped to zero.
    pub fn set_length(&mut self, length: TimeMark) {
        self.length = length.max(TimeMark::ZERO);
    }

    /// Source out-point.
    pub fn end(&self) -> TimeMark {
        self.start + self.length
    }
}
