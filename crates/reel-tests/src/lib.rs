//! Integration test crate for Reel.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the reel crates to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod audio;

#[cfg(test)]
mod playback;
