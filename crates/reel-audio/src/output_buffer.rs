//! Shared ring buffer between the playback thread and the audio device.
//!
//! The playback thread writes resampled, volume-scaled samples; the device
//! callback reads fixed-size chunks. Both sides go through one mutex, held
//! only for the duration of a copy.

use parking_lot::Mutex;
use reel_core::{AudioConfig, TimeMark};

struct Ring {
    data: Box<[f32]>,
    read_pos: usize,
    len: usize,
}

impl Ring {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn free(&self) -> usize {
        self.capacity() - self.len
    }
}

/// Interleaved `f32` ring sized in frames of the output format.
pub struct AudioOutputBuffer {
    ring: Mutex<Ring>,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutputBuffer {
    /// Create a buffer holding `capacity_frames` frames.
    pub fn new(capacity_frames: usize, sample_rate: u32, channels: u16) -> Self {
        let capacity = capacity_frames.max(1) * channels.max(1) as usize;
        Self {
            ring: Mutex::new(Ring {
                data: vec![0.0f32; capacity].into_boxed_slice(),
                read_pos: 0,
                len: 0,
            }),
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.output_buffer_frames, config.sample_rate, config.channels)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Capacity in samples.
    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }

    /// Number of samples available for reading.
    pub fn available_read(&self) -> usize {
        self.ring.lock().len
    }

    /// Number of samples that can be written.
    pub fn available_write(&self) -> usize {
        self.ring.lock().free()
    }

    /// Less than half full: the producer should decode more audio.
    pub fn is_hungry(&self) -> bool {
        let ring = self.ring.lock();
        ring.len * 2 < ring.capacity()
    }

    /// Playback time of the buffered samples.
    pub fn buffered_duration(&self) -> TimeMark {
        let frames = self.available_read() / self.channels as usize;
        TimeMark::from_samples(frames as u64, self.sample_rate)
    }

    /// Write whole frames scaled by `volume`. Returns samples written.
    pub fn write(&self, samples: &[f32], volume: f32) -> usize {
        let channels = self.channels as usize;
        let mut ring = self.ring.lock();
        let count = samples.len().min(ring.free()) / channels * channels;
        if count == 0 {
            return 0;
        }

        let capacity = ring.capacity();
        let write_pos = (ring.read_pos + ring.len) % capacity;
        let first = (capacity - write_pos).min(count);

        let (head, tail) = samples[..count].split_at(first);
        for (dst, src) in ring.data[write_pos..write_pos + first].iter_mut().zip(head) {
            *dst = src * volume;
        }
        for (dst, src) in ring.data[..tail.len()].iter_mut().zip(tail) {
            *dst = src * volume;
        }

        ring.len += count;
        count
    }

    /// Fill `output`, padding with silence once the buffer runs dry.
    /// Returns samples taken from the buffer.
    pub fn read(&self, output: &mut [f32]) -> usize {
        let mut ring = self.ring.lock();
        let count = output.len().min(ring.len);

        let capacity = ring.capacity();
        let read_pos = ring.read_pos;
        let first = (capacity - read_pos).min(count);
        output[..first].copy_from_slice(&ring.data[read_pos..read_pos + first]);
        output[first..count].copy_from_slice(&ring.data[..count - first]);
        output[count..].fill(0.0);

        ring.read_pos = (read_pos + count) % capacity;
        ring.len -= count;
        count
    }

    /// Drop everything buffered.
    pub fn clear(&self) {
        let mut ring = self.ring.lock();
        ring.read_pos = 0;
        ring.len = 0;
    }
}
