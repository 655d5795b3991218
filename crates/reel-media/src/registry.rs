//! Decode session registry.
//!
//! Every media object referencing the same file shares one decode session.
//! The registry is owned by whoever builds the project and passed explicitly
//! to each object; there is no global instance.

use parking_lot::Mutex;
use reel_core::{Frame, ObjectId, ReelError, Result, StreamId, TimeMark};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::decoder::{Decoder, DecodingState};
use crate::media::Media;
use crate::probe::MediaProbe;

/// A decode session plus the identity of the object that last positioned it.
///
/// Several objects may pull from the same session. Each seek records its
/// owner, so an object can tell when another one moved the shared read
/// position and re-seek before decoding.
pub struct DecodingSession {
    state: Box<dyn DecodingState>,
    positioned_for: Option<ObjectId>,
}

impl DecodingSession {
    pub fn new(state: Box<dyn DecodingState>) -> Self {
        Self {
            state,
            positioned_for: None,
        }
    }

    /// Seek on behalf of `owner`.
    pub fn seek_for(&mut self, owner: ObjectId, t: TimeMark) {
        self.state.seek(t);
        self.positioned_for = Some(owner);
    }

    /// Whether the read position still belongs to `owner`.
    pub fn is_positioned_for(&self, owner: ObjectId) -> bool {
        self.positioned_for == Some(owner)
    }

    pub fn peek_frame(&mut self, stream: StreamId) -> Option<Frame> {
        self.state.peek_frame(stream)
    }

    pub fn state(&self) -> &dyn DecodingState {
        self.state.as_ref()
    }
}

impl std::fmt::Debug for DecodingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodingSession")
            .field("positioned_for", &self.positioned_for)
            .field("streams", &self.state.stream_count())
            .field("length", &self.state.length())
            .finish()
    }
}

/// Session shared by every object decoding the same file.
pub type SharedSession = Arc<Mutex<DecodingSession>>;

/// Memoizes decode sessions by source path.
pub struct DecoderRegistry {
    decoder: Box<dyn Decoder>,
    sessions: HashMap<String, SharedSession>,
    failures: HashMap<String, String>,
}

impl DecoderRegistry {
    /// Create a registry opening sessions with `decoder`.
    pub fn new(decoder: impl Decoder + 'static) -> Self {
        Self {
            decoder: Box::new(decoder),
            sessions: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    /// Get the session for `media`, opening it on first use.
    ///
    /// A source that failed to open is remembered and fails again without
    /// another attempt.
    pub fn session(&mut self, media: &Media) -> Result<SharedSession> {
        let path = media.path();
        if let Some(session) = self.sessions.get(path) {
            return Ok(Arc::clone(session));
        }
        if let Some(reason) = self.failures.get(path) {
            return Err(ReelError::Decoder(reason.clone()));
        }

        match self.decoder.try_decode(path) {
            Ok(state) => {
                info!(
                    "Opened decode session for {} ({} streams, length {})",
                    path,
                    state.stream_count(),
                    state.length()
                );
                let session = Arc::new(Mutex::new(DecodingSession::new(state)));
                self.sessions.insert(path.to_string(), Arc::clone(&session));
                Ok(session)
            }
            Err(e) => {
                warn!("Failed to open {}: {}", path, e);
                let reason = format!("{}: {}", path, e);
                self.failures.insert(path.to_string(), reason.clone());
                Err(ReelError::Decoder(reason))
            }
        }
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Whether a session for `path` is open.
    pub fn contains(&self, path: &str) -> bool {
        self.sessions.contains_key(path)
    }

    /// Stream summary of an open session.
    pub fn probe(&self, path: &str) -> Option<MediaProbe> {
        let session = self.sessions.get(path)?;
        let session = session.lock();
        Some(MediaProbe::from_session(path, session.state()))
    }

    /// Stream summaries of every open session, ordered by path.
    pub fn probes(&self) -> Vec<MediaProbe> {
        let mut paths: Vec<&String> = self.sessions.keys().collect();
        paths.sort();
        paths.into_iter().filter_map(|path| self.probe(path)).collect()
    }
}
