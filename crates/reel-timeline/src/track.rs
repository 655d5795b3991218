//! Track types for the timeline.

use reel_core::TimeMark;
use serde::{Deserialize, Serialize};

use crate::object::SharedMediaObject;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    /// Conventional track index inside a scene.
    pub fn index(self) -> usize {
        match self {
            TrackKind::Video => 0,
            TrackKind::Audio => 1,
        }
    }
}

/// A lane of media objects.
///
/// Objects are expected not to overlap, but nothing enforces it; lookups
/// return the first match in insertion order.
#[derive(Debug, Clone)]
pub struct Track {
    kind: TrackKind,
    objects: Vec<SharedMediaObject>,
}

impl Track {
    /// Create a new empty track.
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            objects: Vec::new(),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Add an object to the end of the track.
    pub fn push(&mut self, object: SharedMediaObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SharedMediaObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// First object whose `[start, start + length]` contains `t`.
    ///
    /// A boundary instant shared by two neighbours resolves to the earlier one.
    pub fn object_at(&self, t: TimeMark) -> Option<SharedMediaObject> {
        self.objects
            .iter()
            .find(|object| object.lock().contains(t))
            .cloned()
    }

    /// Latest end of any object on the track.
    pub fn end(&self) -> TimeMark {
        self.objects
            .iter()
            .map(|object| object.lock().end())
            .max()
            .unwrap_or(TimeMark::ZERO)
    }
}
