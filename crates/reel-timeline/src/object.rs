//! Media objects: a clip bound to one decoded stream, with a prefetch queue.
//!
//! Each object keeps up to `depth` presenter-prepared frames ahead of the
//! playback cursor so decoding happens in bursts instead of once per shown
//! frame. Frame times inside the object are relative to the clip: zero is the
//! clip's in-point in the source.

use parking_lot::Mutex;
use reel_core::{defaults, ObjectId, PresentableFrame, ReelError, Result, StreamId, TimeMark};
use reel_media::{DecoderRegistry, Presenter, SharedSession};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clip::MediaClip;

/// Object shared between the tracks that reference it.
pub type SharedMediaObject = Arc<Mutex<MediaObject>>;

/// A placed clip decoding one stream into a bounded frame queue.
pub struct MediaObject {
    id: ObjectId,
    clip: MediaClip,
    /// Placement on the track.
    start: TimeMark,
    stream: StreamId,
    /// `None` when the source failed to open; the object then never yields frames.
    session: Option<SharedSession>,
    presenter: Arc<dyn Presenter>,
    frames: VecDeque<PresentableFrame>,
    /// Pts of the queue front, or of the next expected frame when empty.
    ready_pts: TimeMark,
    /// Frames before this pts are stale.
    read_pts: TimeMark,
    /// Clip-relative position of the playback cursor.
    playing: TimeMark,
    depth: usize,
    /// Decoder exhausted or clip end reached since the last seek.
    ended: bool,
}

impl MediaObject {
    /// Bind `clip` to `stream` of its source, opening the decode session
    /// through `registry`.
    pub fn try_new(
        registry: &mut DecoderRegistry,
        clip: MediaClip,
        stream: StreamId,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self> {
        let session = registry.session(clip.media())?;
        if session.lock().state().stream_info(stream).is_none() {
            return Err(ReelError::NotFound(format!(
                "{} has no stream {}",
                clip.media(),
                stream.0
            )));
        }
        Ok(Self::with_session(clip, stream, Some(session), presenter))
    }

    /// Like [`MediaObject::try_new`], but a source that cannot be opened
    /// yields an object that behaves as a permanent gap.
    pub fn new(
        registry: &mut DecoderRegistry,
        clip: MediaClip,
        stream: StreamId,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        match Self::try_new(registry, clip.clone(), stream, Arc::clone(&presenter)) {
            Ok(object) => object,
            Err(e) => {
                warn!("{} will play as a gap: {}", clip.media(), e);
                Self::with_session(clip, stream, None, presenter)
            }
        }
    }

    fn with_session(
        clip: MediaClip,
        stream: StreamId,
        session: Option<SharedSession>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            clip,
            start: TimeMark::ZERO,
            stream,
            session,
            presenter,
            frames: VecDeque::with_capacity(defaults::PREFETCH_DEPTH),
            ready_pts: TimeMark::ZERO,
            read_pts: TimeMark::ZERO,
            playing: TimeMark::ZERO,
            depth: defaults::PREFETCH_DEPTH,
            ended: false,
        }
    }

    /// Place the object on its track at `start`.
    pub fn placed_at(mut self, start: TimeMark) -> Self {
        self.start = start.max(TimeMark::ZERO);
        self
    }

    /// Set the prefetch target depth (at least one frame).
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.max(1);
        self
    }

    /// Wrap into a shared handle.
    pub fn shared(self) -> SharedMediaObject {
        Arc::new(Mutex::new(self))
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn clip(&self) -> &MediaClip {
        &self.clip
    }

    #[inline]
    pub fn stream(&self) -> StreamId {
        self.stream
    }

    /// Placement on the track.
    #[inline]
    pub fn start(&self) -> TimeMark {
        self.start
    }

    #[inline]
    pub fn length(&self) -> TimeMark {
        self.clip.length()
    }

    /// End of the placement on the track.
    #[inline]
    pub fn end(&self) -> TimeMark {
        self.start + self.clip.length()
    }

    /// Whether `t` lies in `[start, start + length]`.
    #[inline]
    pub fn contains(&self, t: TimeMark) -> bool {
        t >= self.start && t <= self.end()
    }

    /// Whether the source was opened.
    pub fn is_available(&self) -> bool {
        self.session.is_some()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Pts of the next frame [`MediaObject::show_next`] returns.
    pub fn ready_pts(&self) -> TimeMark {
        self.ready_pts
    }

    pub fn read_pts(&self) -> TimeMark {
        self.read_pts
    }

    pub fn playing(&self) -> TimeMark {
        self.playing
    }

    /// Pts of every queued frame, front first.
    pub fn queued_pts(&self) -> Vec<TimeMark> {
        self.frames.iter().map(PresentableFrame::pts).collect()
    }

    pub fn queued_len(&self) -> usize {
        self.frames.len()
    }

    /// Nominal frame period of the decoded stream.
    pub fn time_base(&self) -> TimeMark {
        self.session
            .as_ref()
            .map(|s| s.lock().state().time_base(self.stream))
            .unwrap_or(TimeMark::ZERO)
    }

    /// Tell the object where the playback cursor is, relative to the clip.
    ///
    /// Queued frames superseded by a later frame at or before this position
    /// are skipped on the next [`MediaObject::show_next`].
    pub fn set_playing(&mut self, playing: TimeMark) {
        self.playing = playing;
    }

    /// Reposition to clip-relative time `t`, flushing the queue and refilling it.
    pub fn seek(&mut self, t: TimeMark) {
        let t = t.max(TimeMark::ZERO);
        self.frames.clear();
        self.read_pts = t;
        self.ready_pts = t;
        self.playing = t;
        self.ended = false;

        if let Some(session) = &self.session {
            session.lock().seek_for(self.id, self.clip.start() + t);
            info!(
                "Seek {} stream {} to {} (source {})",
                self.id,
                self.stream.0,
                t,
                self.clip.start() + t
            );
        }
        self.preload_next();
    }

    /// Pop the next prepared frame, refilling the queue when it runs dry.
    ///
    /// `None` means the clip is exhausted.
    pub fn show_next(&mut self) -> Option<PresentableFrame> {
        if self.frames.is_empty() {
            self.preload_next();
        }

        let mut skipped = 0;
        while self.frames.len() > 1 && self.frames[1].pts() <= self.playing {
            self.frames.pop_front();
            skipped += 1;
        }
        if skipped > 0 {
            debug!("{} skipped {} late frames", self.id, skipped);
        }

        let frame = self.frames.pop_front()?;
        self.ready_pts = self.front_pts();
        Some(frame)
    }

    fn front_pts(&self) -> TimeMark {
        self.frames
            .front()
            .map(PresentableFrame::pts)
            .unwrap_or(self.read_pts)
    }

    /// Pull frames until the queue reaches its depth, the decoder runs out,
    /// or the clip ends.
    fn preload_next(&mut self) {
        if self.ended {
            return;
        }
        let Some(session) = self.session.clone() else {
            return;
        };
        let mut session = session.lock();

        let in_point = self.clip.start();
        if !session.is_positioned_for(self.id) {
            // Another object moved the shared session.
            debug!("{} re-seeking shared session to {}", self.id, self.read_pts);
            session.seek_for(self.id, in_point + self.read_pts);
        }

        let (mut stale, mut rejected) = (0usize, 0usize);
        while self.frames.len() < self.depth {
            let Some(frame) = session.peek_frame(self.stream) else {
                self.ended = true;
                break;
            };
            let frame = frame.rebased(-in_point);
            if frame.pts < self.read_pts {
                stale += 1;
                continue;
            }
            if frame.pts > self.clip.length() {
                self.ended = true;
                break;
            }

            self.read_pts = frame.pts + TimeMark::from_ticks(1);
            match self.presenter.prepare(frame) {
                Some(prepared) => self.frames.push_back(prepared),
                None => rejected += 1,
            }
        }
        drop(session);

        if stale > 0 {
            debug!("{} discarded {} stale frames", self.id, stale);
        }
        if rejected > 0 {
            warn!("{} presenter rejected {} frames", self.id, rejected);
        }
        self.ready_pts = self.front_pts();
    }
}

impl std::fmt::Debug for MediaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaObject")
            .field("id", &self.id)
            .field("media", &self.clip.media().path())
            .field("stream", &self.stream)
            .field("start", &self.start)
            .field("length", &self.clip.length())
            .field("queued", &self.frames.len())
            .field("ready_pts", &self.ready_pts)
            .field("ended", &self.ended)
            .finish()
    }
}
