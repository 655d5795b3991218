//! Reel Core - Foundation types for the playback engine
//!
//! This crate provides the fundamental types used throughout Reel:
//! - Time representation (TimeMark, FrameRate)
//! - Decoded and presentable frames
//! - Object identifiers
//! - Playback configuration

pub mod config;
pub mod error;
pub mod frame;
pub mod id;
pub mod time;

pub use config::{AudioConfig, PlaybackConfig, SyncConfig};
pub use error::{ReelError, Result};
pub use frame::{
    AudioChunk, AudioSamples, Frame, FrameBuffer, FramePayload, FramePlane, PixelFormat,
    PresentableFrame, SharedFrameBuffer, StreamId, VideoImage,
};
pub use id::ObjectId;
pub use time::{FrameRate, TimeMark};

/// Defaults shared by the prefetch engine and the playback loop.
pub mod defaults {
    /// Target number of prepared frames queued per media object.
    pub const PREFETCH_DEPTH: usize = 30;

    /// Audio frames per device callback.
    pub const DEVICE_BUFFER_FRAMES: usize = 1024;

    /// Capacity of the shared audio output buffer, in frames.
    pub const OUTPUT_BUFFER_FRAMES: usize = 8192;
}
