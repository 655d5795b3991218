//! Reel Playback - Preview synchronization and the playback clock loop
//!
//! - `PreviewState`: maps the playback cursor to active clips and pulls their frames
//! - `Player`: wall-clock loop pacing video, feeding audio, correcting drift
//! - `PlaybackControl`: thread-safe handle for seek, pause, volume and stop

pub mod clock;
pub mod control;
pub mod player;
pub mod preview;

pub use clock::{Clock, ManualClock, SystemClock};
pub use control::{Command, PlaybackControl, PlaybackStatus};
pub use player::{Player, VideoSink};
pub use preview::{PreviewPreset, PreviewState};
