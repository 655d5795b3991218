//! Reel Media - decode sessions and presenters
//!
//! This crate handles:
//! - The decoder interfaces consumed by the timeline (`Decoder`, `DecodingState`)
//! - Memoized decode sessions, one per source file (`DecoderRegistry`)
//! - Conversion of decoded frames for the output stage (`Presenter`)
//! - A synthetic in-process decoder for previews without real media
//! - Stream summaries of open sessions (`MediaProbe`)

pub mod decoder;
pub mod media;
pub mod presenter;
pub mod probe;
pub mod registry;
pub mod synthetic;

pub use decoder::{Decoder, DecodingState, StreamInfo, StreamKind};
pub use media::Media;
pub use presenter::{AudioPresenter, Presenter, VideoPresenter};
pub use probe::{AudioStreamInfo, MediaProbe, VideoStreamInfo};
pub use registry::{DecoderRegistry, DecodingSession, SharedSession};
pub use synthetic::{SyntheticAudio, SyntheticDecoder, SyntheticSource, SyntheticVideo};
