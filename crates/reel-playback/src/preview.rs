//! Preview synchronization: from a playback cursor to prepared frames.
//!
//! Video and audio keep separate cursors. The video cursor moves by one
//! nominal frame period per frame; the audio cursor moves by the duration of
//! each chunk it hands out, because audio is pulled whenever the output buffer
//! runs low rather than once per video frame.

use reel_core::{PresentableFrame, ReelError, Result, TimeMark};
use reel_timeline::{Project, SharedMediaObject, TrackKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Session-wide output settings, applied by the output stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPreset {
    /// Audio gain, 0.0 to 1.0.
    pub audio_volume: f32,
}

impl Default for PreviewPreset {
    fn default() -> Self {
        Self { audio_volume: 1.0 }
    }
}

/// An object active on one track, with the global time its scene starts at.
#[derive(Clone)]
struct ActiveClip {
    object: SharedMediaObject,
    scene_offset: TimeMark,
}

impl ActiveClip {
    fn is(&self, other: &ActiveClip) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }

    /// Global time of the object's clip-relative zero.
    fn origin(&self) -> TimeMark {
        self.scene_offset + self.object.lock().start()
    }
}

/// Live cursor over a project's timeline.
pub struct PreviewState {
    project: Arc<Project>,
    /// Video cursor.
    playing: TimeMark,
    /// Audio cursor.
    audio_playing: TimeMark,
    time_base: TimeMark,
    video_clip: Option<ActiveClip>,
    audio_clip: Option<ActiveClip>,
    preset: PreviewPreset,
}

impl PreviewState {
    /// Start a preview of `project` positioned at zero.
    ///
    /// Fails when the project's frame rate has no positive frame period or
    /// when the timeline is empty.
    pub fn new(project: Arc<Project>) -> Result<Self> {
        let time_base = project.frame_rate.frame_period();
        if time_base <= TimeMark::ZERO {
            return Err(ReelError::InvalidParameter(format!(
                "frame rate {}/{} has no usable frame period",
                project.frame_rate.numerator, project.frame_rate.denominator
            )));
        }
        let mut preview = Self {
            project,
            playing: TimeMark::ZERO,
            audio_playing: TimeMark::ZERO,
            time_base,
            video_clip: None,
            audio_clip: None,
            preset: PreviewPreset::default(),
        };
        preview.sync(TimeMark::ZERO)?;
        Ok(preview)
    }

    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    /// Video cursor.
    pub fn playing(&self) -> TimeMark {
        self.playing
    }

    /// Audio cursor.
    pub fn audio_playing(&self) -> TimeMark {
        self.audio_playing
    }

    /// Nominal frame period.
    pub fn time_base(&self) -> TimeMark {
        self.time_base
    }

    pub fn preset(&self) -> PreviewPreset {
        self.preset
    }

    pub fn update_preset(&mut self, preset: PreviewPreset) {
        self.preset = preset;
    }

    /// The video cursor moved past the end of the timeline.
    pub fn is_finished(&self) -> bool {
        self.playing > self.project.duration()
    }

    /// Active video object, if any.
    pub fn video_clip(&self) -> Option<SharedMediaObject> {
        self.video_clip.as_ref().map(|c| Arc::clone(&c.object))
    }

    /// Active audio object, if any.
    pub fn audio_clip(&self) -> Option<SharedMediaObject> {
        self.audio_clip.as_ref().map(|c| Arc::clone(&c.object))
    }

    fn peek_clip(&self, kind: TrackKind, t: TimeMark) -> Option<ActiveClip> {
        let found = self.project.timeline().scene_from_time(t)?;
        let object = found.scene.track(kind).object_at(t - found.offset)?;
        Some(ActiveClip {
            object,
            scene_offset: found.offset,
        })
    }

    /// Jump both cursors to `t` and seek the active clips to match.
    ///
    /// Fails when `t` lies outside the timeline.
    pub fn sync(&mut self, t: TimeMark) -> Result<()> {
        if self.project.timeline().scene_from_time(t).is_none() {
            return Err(ReelError::Timeline(format!(
                "No scene at {} (timeline length {})",
                t,
                self.project.duration()
            )));
        }

        self.video_clip = self.peek_clip(TrackKind::Video, t);
        self.audio_clip = self.peek_clip(TrackKind::Audio, t);
        for clip in self.video_clip.iter().chain(self.audio_clip.iter()) {
            let offset = t - clip.origin();
            let mut object = clip.object.lock();
            object.seek(offset);
        }

        self.playing = t;
        self.audio_playing = t;
        info!("Preview synced to {}", t);
        Ok(())
    }

    /// Advance the video cursor by one frame period and return the frame to
    /// show there, rebased to timeline time.
    ///
    /// `None` means nothing to show: a gap, an exhausted clip, or the end.
    pub fn next_video(&mut self) -> Option<PresentableFrame> {
        self.playing += self.time_base;
        let active = self.peek_clip(TrackKind::Video, self.playing);
        self.video_clip = switch_clip(self.video_clip.take(), active, "video", self.playing);
        pull(self.video_clip.as_ref()?, self.playing)
    }

    /// Return the audio chunk at the audio cursor, rebased to timeline time,
    /// and advance the cursor past it.
    ///
    /// With nothing to play the cursor still advances by one frame period so
    /// gaps are traversed.
    pub fn next_audio(&mut self) -> Option<PresentableFrame> {
        let t = self.audio_playing;
        let active = self.peek_clip(TrackKind::Audio, t);
        self.audio_clip = switch_clip(self.audio_clip.take(), active, "audio", t);

        let chunk = self.audio_clip.as_ref().and_then(|clip| pull(clip, t));
        let step = chunk
            .as_ref()
            .and_then(PresentableFrame::duration)
            .filter(|d| *d > TimeMark::ZERO)
            .unwrap_or(self.time_base);
        self.audio_playing += step;
        chunk
    }
}

/// Replace the active clip of a track. A new clip starts from its first frame.
fn switch_clip(
    current: Option<ActiveClip>,
    active: Option<ActiveClip>,
    track: &str,
    t: TimeMark,
) -> Option<ActiveClip> {
    match (current, active) {
        (Some(current), Some(active)) if current.is(&active) => Some(current),
        (_, Some(active)) => {
            let mut object = active.object.lock();
            info!("{} clip switch at {} to {}", track, t, object.clip().media());
            object.seek(TimeMark::ZERO);
            drop(object);
            Some(active)
        }
        (Some(_), None) => {
            debug!("{} gap at {}", track, t);
            None
        }
        (None, None) => None,
    }
}

/// Next frame of `clip` for global time `t`.
fn pull(clip: &ActiveClip, t: TimeMark) -> Option<PresentableFrame> {
    let mut object = clip.object.lock();
    let origin = clip.scene_offset + object.start();
    object.set_playing(t - origin);
    object.show_next().map(|frame| frame.rebased(origin))
}
