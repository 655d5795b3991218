//! Linear resampling of interleaved audio.

use reel_core::AudioSamples;

/// Stretches chunks to a requested length and converts to the output rate.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    output_rate: u32,
}

impl Resampler {
    pub fn new(output_rate: u32) -> Self {
        Self { output_rate }
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Output frame count for `frames` input frames at `input_rate`.
    pub fn output_frames(&self, frames: usize, input_rate: u32) -> usize {
        if input_rate == 0 {
            return 0;
        }
        (frames as u64 * self.output_rate as u64 / input_rate as u64) as usize
    }

    /// Resample `input` so that it spans `wanted` frames at the input rate,
    /// then convert to the output rate.
    ///
    /// `wanted` comes from the drift corrector; pass `input.frames()` for a
    /// plain rate conversion.
    pub fn process(&self, input: &AudioSamples, wanted: usize) -> AudioSamples {
        let channels = input.channels.max(1) as usize;
        let in_frames = input.frames();
        let out_frames = self.output_frames(wanted, input.sample_rate);

        if in_frames == 0 || out_frames == 0 {
            return AudioSamples::new(self.output_rate, input.channels, Vec::new());
        }
        if out_frames == in_frames {
            return AudioSamples::new(self.output_rate, input.channels, input.data.clone());
        }

        let step = in_frames as f64 / out_frames as f64;
        let last = in_frames - 1;
        let mut data = Vec::with_capacity(out_frames * channels);
        for i in 0..out_frames {
            let pos = i as f64 * step;
            let index = (pos as usize).min(last);
            let next = (index + 1).min(last);
            let frac = (pos - index as f64) as f32;

            let a = &input.data[index * channels..(index + 1) * channels];
            let b = &input.data[next * channels..(next + 1) * channels];
            data.extend(a.iter().zip(b).map(|(&x, &y)| x + (y - x) * frac));
        }

        AudioSamples::new(self.output_rate, input.channels, data)
    }
}
