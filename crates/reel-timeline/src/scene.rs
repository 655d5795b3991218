//! Scenes: the fixed-track composition unit of a timeline.

use reel_core::TimeMark;

use crate::object::SharedMediaObject;
use crate::track::{Track, TrackKind};

/// A video track and an audio track played together.
#[derive(Debug, Clone)]
pub struct Scene {
    tracks: [Track; 2],
}

impl Scene {
    pub fn new() -> Self {
        Self {
            tracks: [Track::new(TrackKind::Video), Track::new(TrackKind::Audio)],
        }
    }

    /// Add an object to the track of the given kind.
    pub fn add(&mut self, kind: TrackKind, object: SharedMediaObject) {
        self.track_mut(kind).push(object);
    }

    pub fn track(&self, kind: TrackKind) -> &Track {
        &self.tracks[kind.index()]
    }

    pub fn track_mut(&mut self, kind: TrackKind) -> &mut Track {
        &mut self.tracks[kind.index()]
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Latest end over all tracks. Recomputed on every call.
    pub fn duration(&self) -> TimeMark {
        self.tracks
            .iter()
            .map(Track::end)
            .max()
            .unwrap_or(TimeMark::ZERO)
    }

    /// Active video object at scene-relative time `t`.
    pub fn peek_video_clip(&self, t: TimeMark) -> Option<SharedMediaObject> {
        self.track(TrackKind::Video).object_at(t)
    }

    /// Active audio object at scene-relative time `t`.
    pub fn peek_audio_clip(&self, t: TimeMark) -> Option<SharedMediaObject> {
        self.track(TrackKind::Audio).object_at(t)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
