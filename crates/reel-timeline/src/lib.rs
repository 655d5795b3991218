//! Reel Timeline - Timeline data model
//!
//! Implements the structure played back by the preview:
//! - Projects owning a timeline of scenes
//! - Scenes with a fixed set of tracks (video, audio)
//! - Tracks holding media objects
//! - Media objects prefetching prepared frames from a shared decode session

pub mod clip;
pub mod object;
pub mod project;
pub mod scene;
pub mod timeline;
pub mod track;

pub use clip::MediaClip;
pub use object::{MediaObject, SharedMediaObject};
pub use project::Project;
pub use scene::Scene;
pub use timeline::{SceneRef, TimeLine};
pub use track::{Track, TrackKind};
