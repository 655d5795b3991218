//! The playback clock loop.
//!
//! Runs on its own thread. Each iteration applies pending commands, pulls the
//! next video frame, waits until the playing clock reaches its presentation
//! time while keeping the audio buffer fed, then hands the frame to the sink.

use crossbeam_channel::{Receiver, TryRecvError};
use reel_audio::{AudioOutputBuffer, DriftCorrector, Resampler};
use reel_core::{PlaybackConfig, PresentableFrame, Result, TimeMark, VideoImage};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::control::{Command, PlaybackControl, PlaybackStatus};
use crate::preview::{PreviewPreset, PreviewState};

/// Longest single sleep while waiting for a frame's presentation time.
const FEED_INTERVAL: TimeMark = TimeMark::from_millis(5);

/// Receives video frames at their presentation time.
pub trait VideoSink: Send {
    /// `image` is `None` when nothing is active at `pts`; show a blank.
    fn present(&mut self, pts: TimeMark, image: Option<VideoImage>);
}

/// Playback loop state, owned by the playback thread.
pub struct Player {
    preview: PreviewState,
    clock: Box<dyn Clock>,
    sink: Box<dyn VideoSink>,
    audio: Arc<AudioOutputBuffer>,
    drift: DriftCorrector,
    resampler: Resampler,
    commands: Receiver<Command>,
    status: Arc<PlaybackStatus>,
    /// Playing clock in timeline time.
    position: TimeMark,
    last_tick: TimeMark,
    paused: bool,
}

impl Player {
    /// Create a player and the handle controlling it.
    pub fn new(
        preview: PreviewState,
        config: &PlaybackConfig,
        audio: Arc<AudioOutputBuffer>,
        sink: Box<dyn VideoSink>,
    ) -> (Self, PlaybackControl) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let position = preview.playing();
        let status = Arc::new(PlaybackStatus::new(position, preview.preset().audio_volume));
        let clock: Box<dyn Clock> = Box::new(SystemClock::new());
        let last_tick = clock.now();

        let player = Self {
            drift: DriftCorrector::new(&config.sync, &config.audio),
            resampler: Resampler::new(audio.sample_rate()),
            preview,
            clock,
            sink,
            audio,
            commands: rx,
            status: Arc::clone(&status),
            position,
            last_tick,
            paused: false,
        };
        (player, PlaybackControl::new(tx, status))
    }

    /// Pace playback against `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.last_tick = clock.now();
        self.clock = clock;
        self
    }

    /// Run the loop on a new thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("reel-playback".into())
            .spawn(move || self.run())?;
        Ok(handle)
    }

    /// Run until stopped or every control handle is dropped.
    pub fn run(mut self) {
        info!("Playback started at {}", self.position);
        loop {
            if !self.apply_commands() {
                break;
            }
            if self.paused {
                if !self.wait_while_paused() {
                    break;
                }
                continue;
            }
            self.tick();
        }
        info!("Playback stopped at {}", self.position);
    }

    /// Apply queued commands. Returns `false` when the loop should exit.
    fn apply_commands(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    if !self.apply(command) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Block until a command arrives.
    fn wait_while_paused(&mut self) -> bool {
        match self.commands.recv() {
            Ok(command) => self.apply(command),
            Err(_) => false,
        }
    }

    fn apply(&mut self, command: Command) -> bool {
        debug!("Playback command {:?}", command);
        match command {
            Command::Stop => return false,
            Command::Pause => self.set_paused(true),
            Command::Continue => {
                self.last_tick = self.clock.now();
                self.set_paused(false);
            }
            Command::Seek(t) => self.seek(t),
            Command::SetVolume(volume) => {
                self.preview.update_preset(PreviewPreset {
                    audio_volume: volume,
                });
                self.status.set_volume(volume);
            }
        }
        true
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.status.set_paused(paused);
    }

    fn seek(&mut self, t: TimeMark) {
        if let Err(e) = self.preview.sync(t) {
            warn!("Ignoring seek: {}", e);
            return;
        }
        self.audio.clear();
        self.drift.reset();
        self.position = t;
        self.last_tick = self.clock.now();
        self.status.set_position(t);
        self.status.set_finished(false);
    }

    /// Accumulate wall-clock time into the playing clock.
    fn advance_clock(&mut self) {
        let now = self.clock.now();
        self.position += now - self.last_tick;
        self.last_tick = now;
    }

    /// Show one video frame at its presentation time.
    fn tick(&mut self) {
        let frame = self.preview.next_video();
        let target = self.preview.playing();

        loop {
            self.advance_clock();
            self.feed_audio();
            if self.position >= target {
                break;
            }
            self.clock.sleep((target - self.position).min(FEED_INTERVAL));
        }

        let image = match frame {
            Some(PresentableFrame::Video(image)) => Some(image),
            _ => None,
        };
        self.sink.present(target, image);
        self.status.set_position(target);

        let audio_clock = self.preview.audio_playing() - self.audio.buffered_duration();
        self.drift
            .set_diff((target - audio_clock).to_seconds_f64());

        if self.preview.is_finished() {
            info!("End of timeline at {}", target);
            self.status.set_finished(true);
            self.set_paused(true);
        }
    }

    /// Push audio while the output buffer is hungry. Gaps are filled with
    /// one frame period of silence.
    fn feed_audio(&mut self) {
        let channels = self.audio.channels();
        let volume = self.preview.preset().audio_volume;

        while self.audio.is_hungry() {
            match self.preview.next_audio() {
                Some(PresentableFrame::Audio(chunk)) if chunk.samples.channels == channels => {
                    let wanted = self.drift.wanted_samples(chunk.samples.frames());
                    let samples = self.resampler.process(&chunk.samples, wanted);
                    let written = self.audio.write(&samples.data, volume);
                    if written < samples.data.len() {
                        debug!(
                            "Audio buffer full, dropped {} samples",
                            samples.data.len() - written
                        );
                    }
                }
                Some(other) => {
                    warn!("Dropping audio chunk at {} with unexpected layout", other.pts());
                    self.write_silence();
                }
                None => self.write_silence(),
            }
        }
    }

    fn write_silence(&mut self) {
        let frames = self
            .preview
            .time_base()
            .to_samples(self.audio.sample_rate()) as usize;
        let silence = vec![0.0f32; frames.max(1) * self.audio.channels() as usize];
        self.audio.write(&silence, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use parking_lot::Mutex;
    use reel_media::{DecoderRegistry, Media, SyntheticDecoder, SyntheticSource};
    use reel_timeline::{MediaClip, Project, TrackKind};
    use std::time::{Duration, Instant};

    type Shown = Arc<Mutex<Vec<(TimeMark, bool)>>>;

    struct RecordingSink(Shown);

    impl VideoSink for RecordingSink {
        fn present(&mut self, pts: TimeMark, image: Option<VideoImage>) {
            self.0.lock().push((pts, image.is_some()));
        }
    }

    /// Video `[0,1s]`, gap, video `[1.5s,2s]`; audio `[0,2s]`.
    fn project() -> Arc<Project> {
        let decoder = SyntheticDecoder::new()
            .with_source("v.mp4", SyntheticSource::video_only(TimeMark::from_secs(10)))
            .with_source("a.wav", SyntheticSource::audio_only(TimeMark::from_secs(10)));
        let mut project = Project::new("Player", DecoderRegistry::new(decoder));
        let scene = project.add_scene();
        let clip = |path: &str, ms: i64| {
            MediaClip::new(Arc::new(Media::new(path))).with_length(TimeMark::from_millis(ms))
        };
        project
            .add_media_object(scene, TrackKind::Video, clip("v.mp4", 1000), TimeMark::ZERO)
            .unwrap();
        project
            .add_media_object(scene, TrackKind::Video, clip("v.mp4", 500), TimeMark::from_millis(1500))
            .unwrap();
        project
            .add_media_object(scene, TrackKind::Audio, clip("a.wav", 2000), TimeMark::ZERO)
            .unwrap();
        Arc::new(project)
    }

    fn start(shown: &Shown) -> (JoinHandle<()>, PlaybackControl, Arc<AudioOutputBuffer>) {
        let config = PlaybackConfig::default();
        let audio = Arc::new(AudioOutputBuffer::from_config(&config.audio));
        let preview = PreviewState::new(project()).unwrap();
        let (player, control) = Player::new(
            preview,
            &config,
            Arc::clone(&audio),
            Box::new(RecordingSink(Arc::clone(shown))),
        );
        let handle = player
            .with_clock(Box::new(ManualClock::new()))
            .spawn()
            .unwrap();
        (handle, control, audio)
    }

    fn wait_for(condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !condition() {
            assert!(Instant::now() < deadline, "timed out");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_plays_to_end_and_pauses() {
        let shown = Shown::default();
        let (handle, control, audio) = start(&shown);

        wait_for(|| control.status().is_finished());
        assert!(control.is_paused());
        assert!(control.position() > TimeMark::from_secs(2));
        assert!(audio.available_read() > 0);

        control.stop().unwrap();
        handle.join().unwrap();

        let shown = shown.lock();
        assert!(shown.windows(2).all(|w| w[0].0 < w[1].0));
        // Frames in both clips, blanks in the gap.
        let at = |ms: i64| {
            shown
                .iter()
                .find(|(pts, _)| *pts >= TimeMark::from_millis(ms))
                .map(|(_, has_image)| *has_image)
        };
        assert_eq!(at(500), Some(true));
        assert_eq!(at(1200), Some(false));
        assert_eq!(at(1700), Some(true));
    }

    #[test]
    fn test_seek_and_volume_commands() {
        let shown = Shown::default();
        let (handle, control, _audio) = start(&shown);

        wait_for(|| control.status().is_finished());
        control.set_volume(0.5).unwrap();
        control.seek(TimeMark::from_millis(1500)).unwrap();
        control.resume().unwrap();

        let restarts = || {
            let shown = shown.lock();
            shown.windows(2).filter(|w| w[1].0 < w[0].0).count()
        };
        // Finished is cleared by the seek, so it only reads true again after
        // the second run reaches the end.
        wait_for(|| restarts() == 1 && control.status().is_finished());
        assert_eq!(control.status().volume(), 0.5);
        control.stop().unwrap();
        handle.join().unwrap();

        assert_eq!(restarts(), 1);
        let first_after_seek = {
            let shown = shown.lock();
            let index = shown.windows(2).position(|w| w[1].0 < w[0].0).unwrap();
            shown[index + 1].0
        };
        assert!(first_after_seek > TimeMark::from_millis(1500));
    }

    #[test]
    fn test_seek_outside_timeline_is_ignored() {
        let shown = Shown::default();
        let (handle, control, _audio) = start(&shown);

        wait_for(|| control.status().is_finished());
        control.seek(TimeMark::from_secs(60)).unwrap();
        control.stop().unwrap();
        handle.join().unwrap();
        assert!(control.position() <= TimeMark::from_secs(3));
    }

    #[test]
    fn test_dropping_control_stops_loop() {
        let shown = Shown::default();
        let (handle, control, _audio) = start(&shown);
        wait_for(|| control.status().is_finished());
        drop(control);
        handle.join().unwrap();
    }
}
