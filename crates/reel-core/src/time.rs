//! Time representation for frame-accurate playback
//!
//! All positions, durations and clocks are integer ticks with a fixed base.
//! There is no floating point in the timeline model; conversions to seconds
//! exist only for device and UI interop.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A point in time or a duration, in ticks.
///
/// Signed so that differences (clock drift, clip-relative offsets) can be
/// expressed; timeline positions are non-negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeMark(i64);

impl TimeMark {
    /// Number of ticks in one second.
    pub const TICKS_PER_SECOND: i64 = 1_000_000;

    /// Zero time constant.
    pub const ZERO: Self = Self(0);

    /// Largest representable time.
    pub const MAX: Self = Self(i64::MAX);

    /// Create a time from raw ticks.
    #[inline]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Raw tick count.
    #[inline]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Create a time from whole seconds.
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * Self::TICKS_PER_SECOND)
    }

    /// Create a time from milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis * (Self::TICKS_PER_SECOND / 1000))
    }

    /// Create a time from seconds as a float.
    /// Note: May introduce small precision errors.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        Self((seconds * Self::TICKS_PER_SECOND as f64).round() as i64)
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        self.0 as f64 / Self::TICKS_PER_SECOND as f64
    }

    /// Duration of `samples` audio frames at `sample_rate`.
    pub fn from_samples(samples: u64, sample_rate: u32) -> Self {
        if sample_rate == 0 {
            return Self::ZERO;
        }
        let ticks = samples as i128 * Self::TICKS_PER_SECOND as i128 / sample_rate as i128;
        Self(ticks as i64)
    }

    /// Number of whole audio frames that fit in this duration at `sample_rate`.
    pub fn to_samples(self, sample_rate: u32) -> u64 {
        if self.0 <= 0 {
            return 0;
        }
        (self.0 as i128 * sample_rate as i128 / Self::TICKS_PER_SECOND as i128) as u64
    }

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Get the absolute value of this time.
    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Saturating subtraction that never goes below zero.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self((self.0 - rhs.0).max(0))
    }
}

impl Add for TimeMark {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for TimeMark {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for TimeMark {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for TimeMark {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for TimeMark {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<i64> for TimeMark {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i64> for TimeMark {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self(self.0 / rhs)
    }
}

impl fmt::Display for TimeMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total_ms = self.0.unsigned_abs() / (Self::TICKS_PER_SECOND as u64 / 1000);
        let ms = total_ms % 1000;
        let secs = total_ms / 1000;
        write!(
            f,
            "{}{:02}:{:02}:{:02}.{:03}",
            sign,
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            ms
        )
    }
}

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Check that both terms are non-zero.
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Nominal duration of a single frame, truncated to whole ticks.
    pub fn frame_period(self) -> TimeMark {
        if !self.is_valid() {
            return TimeMark::ZERO;
        }
        let period = Rational64::new(
            TimeMark::TICKS_PER_SECOND * self.denominator as i64,
            self.numerator as i64,
        );
        TimeMark::from_ticks(period.to_integer())
    }

    /// Time of frame `index` counted from zero, without accumulating truncation.
    pub fn frame_time(self, index: i64) -> TimeMark {
        if !self.is_valid() {
            return TimeMark::ZERO;
        }
        let t = Rational64::new(
            index * TimeMark::TICKS_PER_SECOND * self.denominator as i64,
            self.numerator as i64,
        );
        TimeMark::from_ticks(t.to_integer())
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
