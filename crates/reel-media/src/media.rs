//! Media source references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A media source, identified by its path.
///
/// Shared as `Arc<Media>` between every clip that references it; decode
/// sessions are memoized by this path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Media {
    path: String,
}

impl Media {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the source file.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
