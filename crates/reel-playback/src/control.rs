//! Cross-thread control of a running player.
//!
//! The UI never touches the timeline or decode sessions directly; it sends
//! commands that the playback thread applies between loop iterations.

use crossbeam_channel::Sender;
use reel_core::{ReelError, Result, TimeMark};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;

/// Commands sent from the controlling thread to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Jump to a global timeline position.
    Seek(TimeMark),
    Pause,
    Continue,
    Stop,
    /// Output gain, 0.0 to 1.0.
    SetVolume(f32),
}

/// State published by the player for other threads to read.
#[derive(Debug, Default)]
pub struct PlaybackStatus {
    position: AtomicI64,
    paused: AtomicBool,
    finished: AtomicBool,
    /// `f32` bits.
    volume: AtomicU32,
}

impl PlaybackStatus {
    pub(crate) fn new(position: TimeMark, volume: f32) -> Self {
        Self {
            position: AtomicI64::new(position.ticks()),
            paused: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            volume: AtomicU32::new(volume.to_bits()),
        }
    }

    /// Presentation time of the last shown frame.
    pub fn position(&self) -> TimeMark {
        TimeMark::from_ticks(self.position.load(Ordering::Acquire))
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Playback reached the end of the timeline.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Acquire))
    }

    pub(crate) fn set_position(&self, position: TimeMark) {
        self.position.store(position.ticks(), Ordering::Release);
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    pub(crate) fn set_finished(&self, finished: bool) {
        self.finished.store(finished, Ordering::Release);
    }

    pub(crate) fn set_volume(&self, volume: f32) {
        self.volume.store(volume.to_bits(), Ordering::Release);
    }
}

/// Cloneable handle to a player running on another thread.
#[derive(Debug, Clone)]
pub struct PlaybackControl {
    commands: Sender<Command>,
    status: Arc<PlaybackStatus>,
}

impl PlaybackControl {
    pub(crate) fn new(commands: Sender<Command>, status: Arc<PlaybackStatus>) -> Self {
        Self { commands, status }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| ReelError::Internal("Playback thread has stopped".into()))
    }

    /// Jump to `t`; the queues of the active clips are flushed and refilled.
    pub fn seek(&self, t: TimeMark) -> Result<()> {
        self.send(Command::Seek(t))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    /// Resume after a pause.
    pub fn resume(&self) -> Result<()> {
        self.send(Command::Continue)
    }

    /// Ask the loop to exit at its next iteration.
    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    /// Set the output volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(Command::SetVolume(volume.clamp(0.0, 1.0)))
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn position(&self) -> TimeMark {
        self.status.position()
    }

    pub fn is_paused(&self) -> bool {
        self.status.is_paused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_are_delivered_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let control = PlaybackControl::new(tx, Arc::new(PlaybackStatus::new(TimeMark::ZERO, 1.0)));

        control.seek(TimeMark::from_secs(3)).unwrap();
        control.set_volume(1.5).unwrap();
        control.pause().unwrap();

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![Command::Seek(TimeMark::from_secs(3)), Command::SetVolume(1.0), Command::Pause]
        );
    }

    #[test]
    fn test_send_after_player_gone_fails() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let control = PlaybackControl::new(tx, Arc::new(PlaybackStatus::default()));
        assert!(matches!(control.stop(), Err(ReelError::Internal(_))));
    }

    #[test]
    fn test_status_roundtrip() {
        let status = PlaybackStatus::new(TimeMark::from_secs(1), 0.5);
        assert_eq!(status.position(), TimeMark::from_secs(1));
        assert_eq!(status.volume(), 0.5);
        status.set_paused(true);
        status.set_position(TimeMark::from_secs(2));
        assert!(status.is_paused());
        assert_eq!(status.position(), TimeMark::from_secs(2));
    }
}
