//! Projects: the root owning a timeline and the decode sessions it plays.

use reel_core::{FrameRate, PlaybackConfig, ReelError, Result, StreamId, TimeMark};
use reel_media::{AudioPresenter, DecoderRegistry, Presenter, StreamKind, VideoPresenter};
use std::sync::Arc;
use tracing::info;

use crate::clip::MediaClip;
use crate::object::{MediaObject, SharedMediaObject};
use crate::scene::Scene;
use crate::timeline::TimeLine;
use crate::track::TrackKind;

/// A project: timeline, decode sessions and the presenters its objects use.
pub struct Project {
    /// Project name
    pub name: String,
    /// Nominal frame rate
    pub frame_rate: FrameRate,
    /// Prefetch depth given to new objects
    pub prefetch_depth: usize,
    timeline: TimeLine,
    registry: DecoderRegistry,
    video_presenter: Arc<dyn Presenter>,
    audio_presenter: Arc<dyn Presenter>,
}

impl Project {
    /// Create an empty project with default playback settings.
    pub fn new(name: impl Into<String>, registry: DecoderRegistry) -> Self {
        Self::from_config(name, registry, &PlaybackConfig::default())
    }

    /// Create an empty project for the given playback settings.
    pub fn from_config(
        name: impl Into<String>,
        registry: DecoderRegistry,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            name: name.into(),
            frame_rate: config.frame_rate,
            prefetch_depth: config.prefetch_depth,
            timeline: TimeLine::new(),
            registry,
            video_presenter: Arc::new(VideoPresenter::default()),
            audio_presenter: Arc::new(AudioPresenter::new(config.audio.channels)),
        }
    }

    /// Replace the presenter used for new objects of `kind`.
    pub fn with_presenter(mut self, kind: TrackKind, presenter: Arc<dyn Presenter>) -> Self {
        match kind {
            TrackKind::Video => self.video_presenter = presenter,
            TrackKind::Audio => self.audio_presenter = presenter,
        }
        self
    }

    pub fn timeline(&self) -> &TimeLine {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut TimeLine {
        &mut self.timeline
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Append an empty scene, returning its index.
    pub fn add_scene(&mut self) -> usize {
        self.timeline.push(Scene::new());
        self.timeline.scenes().len() - 1
    }

    /// Build an object for `clip` on a track of `kind`.
    ///
    /// The first stream of the matching kind is decoded. A source that fails
    /// to open produces an object that plays as a gap.
    pub fn new_object(&mut self, kind: TrackKind, clip: MediaClip) -> MediaObject {
        let (stream_kind, presenter) = match kind {
            TrackKind::Video => (StreamKind::Video, Arc::clone(&self.video_presenter)),
            TrackKind::Audio => (StreamKind::Audio, Arc::clone(&self.audio_presenter)),
        };
        let stream = self
            .registry
            .session(clip.media())
            .ok()
            .and_then(|session| {
                let session = session.lock();
                session.state().find_stream(stream_kind)
            })
            .unwrap_or(StreamId(kind.index()));

        MediaObject::new(&mut self.registry, clip, stream, presenter).with_depth(self.prefetch_depth)
    }

    /// Place `clip` at `at` on the `kind` track of scene `scene`.
    pub fn add_media_object(
        &mut self,
        scene: usize,
        kind: TrackKind,
        clip: MediaClip,
        at: TimeMark,
    ) -> Result<SharedMediaObject> {
        if scene >= self.timeline.scenes().len() {
            return Err(ReelError::Timeline(format!("No scene {}", scene)));
        }

        let object = self.new_object(kind, clip).placed_at(at);
        info!(
            "Placed {} ({:?}) at {} for {} in scene {}",
            object.clip().media(),
            kind,
            at,
            object.length(),
            scene
        );

        let shared = object.shared();
        if let Some(target) = self.timeline.scene_mut(scene) {
            target.add(kind, Arc::clone(&shared));
        }
        Ok(shared)
    }

    /// Total duration of the timeline.
    pub fn duration(&self) -> TimeMark {
        self.timeline.duration()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("frame_rate", &self.frame_rate)
            .field("scenes", &self.timeline.scenes().len())
            .field("sessions", &self.registry.len())
            .finish()
    }
}
