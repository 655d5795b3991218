//! Audio/video drift correction.
//!
//! The playback loop reports the difference between the video clock and the
//! audio clock each time a frame is shown. Differences are folded into an
//! exponential moving average; once enough measurements exist and the average
//! exceeds the threshold, each audio chunk is stretched or squeezed by up to
//! `max_correction_percent` so audio drifts back in line with video.

use reel_core::{AudioConfig, SyncConfig};
use tracing::debug;

/// Moving-average A/V sync controller.
#[derive(Debug, Clone)]
pub struct DriftCorrector {
    /// Latest `video - audio` difference, in seconds.
    diff: f64,
    /// Decayed sum of differences.
    cum: f64,
    coef: f64,
    count: u32,
    average_window: u32,
    /// Smallest averaged difference worth correcting, in seconds.
    threshold: f64,
    /// Differences at or above this reset the average.
    no_sync: f64,
    max_percent: u32,
    sample_rate: u32,
}

impl DriftCorrector {
    pub fn new(sync: &SyncConfig, audio: &AudioConfig) -> Self {
        let window = sync.average_window.max(1);
        Self {
            diff: 0.0,
            cum: 0.0,
            // Weight of a measurement decays to 1% after `window` updates.
            coef: (0.01f64.ln() / window as f64).exp(),
            count: 0,
            average_window: window,
            threshold: sync.min_correction_for(audio),
            no_sync: sync.no_sync_threshold_secs,
            max_percent: sync.max_correction_percent.min(99),
            sample_rate: audio.sample_rate,
        }
    }

    /// Record the current `video - audio` clock difference in seconds.
    pub fn set_diff(&mut self, diff: f64) {
        self.diff = diff;
    }

    pub fn diff(&self) -> f64 {
        self.diff
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Current averaged difference, or `None` while still warming up.
    pub fn average(&self) -> Option<f64> {
        (self.count >= self.average_window).then(|| self.cum * (1.0 - self.coef))
    }

    /// Forget all measurements.
    pub fn reset(&mut self) {
        self.diff = 0.0;
        self.cum = 0.0;
        self.count = 0;
    }

    /// Number of samples (per channel) a chunk of `nominal` samples should be
    /// resampled to. Called once per audio chunk.
    ///
    /// Audio lagging video (positive difference) yields fewer samples, so the
    /// chunk plays out faster.
    pub fn wanted_samples(&mut self, nominal: usize) -> usize {
        let diff = self.diff;
        if !diff.is_finite() || diff.abs() >= self.no_sync {
            if self.count > 0 {
                debug!("A/V difference {:.3}s beyond sync range, resetting average", diff);
            }
            self.count = 0;
            self.cum = 0.0;
            return nominal;
        }

        self.cum = diff + self.coef * self.cum;
        if self.count < self.average_window {
            self.count += 1;
            return nominal;
        }

        let avg = self.cum * (1.0 - self.coef);
        if avg.abs() < self.threshold {
            return nominal;
        }

        let wanted = nominal as i64 - (diff * self.sample_rate as f64) as i64;
        let min = (nominal * (100 - self.max_percent as usize) / 100) as i64;
        let max = (nominal * (100 + self.max_percent as usize) / 100) as i64;
        wanted.clamp(min, max) as usize
    }
}
