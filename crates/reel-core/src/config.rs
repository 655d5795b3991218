//! Playback configuration.
//!
//! Loaded from JSON. Missing fields fall back to defaults; unknown fields are
//! rejected so typos do not silently keep a default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::defaults;
use crate::error::{ReelError, Result};
use crate::time::FrameRate;

/// Audio output format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Frames pulled by the device per callback.
    pub device_buffer_frames: usize,
    /// Capacity of the shared output buffer, in frames.
    pub output_buffer_frames: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            device_buffer_frames: defaults::DEVICE_BUFFER_FRAMES,
            output_buffer_frames: defaults::OUTPUT_BUFFER_FRAMES,
        }
    }
}

/// Tuning of the audio/video drift correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Differences at or beyond this many seconds reset the averaging.
    pub no_sync_threshold_secs: f64,
    /// Number of measurements that dominate the running average.
    pub average_window: u32,
    /// Maximum speed change applied to audio, in percent of nominal.
    pub max_correction_percent: u32,
    /// Smallest averaged difference that triggers a correction. Derived
    /// from the device buffer size when unset.
    pub min_correction_secs: Option<f64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            no_sync_threshold_secs: 10.0,
            average_window: 20,
            max_correction_percent: 10,
            min_correction_secs: None,
        }
    }
}

impl SyncConfig {
    /// Correction threshold for the given output, in seconds.
    ///
    /// Two device buffers of 16-bit samples, expressed as playback time.
    pub fn min_correction_for(&self, audio: &AudioConfig) -> f64 {
        self.min_correction_secs.unwrap_or_else(|| {
            let bytes_per_sec = audio.sample_rate as f64 * audio.channels as f64 * 2.0;
            2.0 * audio.device_buffer_frames as f64 / bytes_per_sec
        })
    }
}

/// Top-level playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Nominal frame rate of the preview.
    pub frame_rate: FrameRate,
    /// Prepared frames queued ahead per media object.
    pub prefetch_depth: usize,
    pub audio: AudioConfig,
    pub sync: SyncConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::FPS_24,
            prefetch_depth: defaults::PREFETCH_DEPTH,
            audio: AudioConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl PlaybackConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| ReelError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ReelError::Config(format!("Failed to serialize configuration: {}", e)))
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_valid() {
            return Err(ReelError::Config(format!(
                "frame rate {}/{} is not valid",
                self.frame_rate.numerator, self.frame_rate.denominator
            )));
        }
        if self.prefetch_depth == 0 {
            return Err(ReelError::Config("prefetch_depth must be at least 1".into()));
        }
        if self.audio.sample_rate == 0 || self.audio.channels == 0 {
            return Err(ReelError::Config(
                "audio sample_rate and channels must be non-zero".into(),
            ));
        }
        if self.audio.output_buffer_frames < self.audio.device_buffer_frames {
            return Err(ReelError::Config(
                "output_buffer_frames must hold at least one device buffer".into(),
            ));
        }
        if self.sync.max_correction_percent >= 100 {
            return Err(ReelError::Config(
                "max_correction_percent must be below 100".into(),
            ));
        }
        if self.sync.average_window == 0 {
            return Err(ReelError::Config("average_window must be at least 1".into()));
        }
        if self.sync.no_sync_threshold_secs <= 0.0 {
            return Err(ReelError::Config(
                "no_sync_threshold_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
