//! Reel - headless timeline preview
//!
//! Plays the built-in demo project through the playback loop, logging shown
//! frames, and exercises the control surface from the main thread.

mod demo;
mod output;

use anyhow::{anyhow, Context, Result};
use reel_audio::AudioOutputBuffer;
use reel_core::{PlaybackConfig, TimeMark, VideoImage};
use reel_playback::{PlaybackControl, Player, PreviewState, VideoSink};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::output::AudioOutput;

/// Logs a summary of presented frames once per second of timeline.
#[derive(Default)]
struct FrameLogger {
    shown: u64,
    blank: u64,
    next_report: TimeMark,
}

impl VideoSink for FrameLogger {
    fn present(&mut self, pts: TimeMark, image: Option<VideoImage>) {
        match image {
            Some(_) => self.shown += 1,
            None => self.blank += 1,
        }
        if pts >= self.next_report {
            info!("{} shown {} frames, {} blank", pts, self.shown, self.blank);
            self.next_report = pts + TimeMark::from_secs(1);
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Reel starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => PlaybackConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => PlaybackConfig::default(),
    };

    let project = Arc::new(demo::build(&config)?);
    info!("Loaded {:?}, duration {}", project, project.duration());
    for probe in project.registry().probes() {
        info!(
            "Source {}: {} video, {} audio, length {}",
            probe.path,
            probe.video_streams.len(),
            probe.audio_streams.len(),
            probe.duration
        );
    }

    let audio = Arc::new(AudioOutputBuffer::from_config(&config.audio));
    let _output = AudioOutput::start(Arc::clone(&audio), &config.audio)?;

    let preview = PreviewState::new(Arc::clone(&project))?;
    let (player, control) =
        Player::new(preview, &config, Arc::clone(&audio), Box::new(FrameLogger::default()));
    let handle = player.spawn()?;

    drive(&control)?;

    control.stop()?;
    handle
        .join()
        .map_err(|_| anyhow!("Playback thread panicked"))?;
    info!("Reel finished at {}", control.position());
    Ok(())
}

/// Pause, resume, seek and change volume, then play to the end.
fn drive(control: &PlaybackControl) -> Result<()> {
    std::thread::sleep(Duration::from_secs(1));
    control.pause()?;
    info!("Paused at {}", control.position());
    std::thread::sleep(Duration::from_millis(500));

    control.resume()?;
    control.seek(TimeMark::from_millis(3_500))?;
    control.set_volume(0.5)?;

    let deadline = Instant::now() + Duration::from_secs(30);
    while !control.status().is_finished() {
        if Instant::now() > deadline {
            return Err(anyhow!("Playback did not reach the end"));
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    Ok(())
}
