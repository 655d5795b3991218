//! Integration tests for the audio output path.

use reel_audio::{AudioOutputBuffer, DriftCorrector, Resampler};
use reel_core::{AudioConfig, AudioSamples, SyncConfig};

// ── Drift correction ───────────────────────────────────────────

/// Play `steps` chunks of `nominal` samples with audio starting `initial`
/// seconds behind video, applying each correction to the clock difference.
fn simulate(initial: f64, steps: usize, nominal: usize) -> (f64, Vec<usize>) {
    let audio = AudioConfig::default();
    let mut corrector = DriftCorrector::new(&SyncConfig::default(), &audio);
    let rate = audio.sample_rate as f64;

    let mut diff = initial;
    let mut history = Vec::with_capacity(steps);
    for _ in 0..steps {
        corrector.set_diff(diff);
        let wanted = corrector.wanted_samples(nominal);
        // Playing fewer samples than the content covers moves audio ahead.
        diff -= (nominal as f64 - wanted as f64) / rate;
        history.push(wanted);
    }
    (diff, history)
}

#[test]
fn drift_converges_below_threshold() {
    let threshold = SyncConfig::default().min_correction_for(&AudioConfig::default());
    for initial in [0.2, -0.2, 0.05, -0.5] {
        let (remaining, _) = simulate(initial, 400, 1024);
        assert!(
            remaining.abs() < threshold,
            "initial {} left {} (threshold {})",
            initial,
            remaining,
            threshold
        );
    }
}

#[test]
fn drift_correction_never_exceeds_ten_percent() {
    let (_, history) = simulate(3.0, 200, 1000);
    assert!(history.iter().all(|&w| (900..=1100).contains(&w)));
    assert!(history.iter().any(|&w| w == 900));
}

#[test]
fn audio_behind_plays_fewer_samples() {
    let (_, history) = simulate(0.1, 40, 1024);
    assert!(history.iter().all(|&w| w <= 1024));
    assert!(history.iter().any(|&w| w < 1024));
}

#[test]
fn gap_beyond_no_sync_is_left_alone() {
    let (remaining, history) = simulate(20.0, 100, 1024);
    assert_eq!(remaining, 20.0);
    assert!(history.iter().all(|&w| w == 1024));
}

// ── Output path ────────────────────────────────────────────────

#[test]
fn corrected_chunks_land_in_output_buffer() {
    let config = AudioConfig::default();
    let buffer = AudioOutputBuffer::from_config(&config);
    let resampler = Resampler::new(config.sample_rate);
    let mut corrector = DriftCorrector::new(&SyncConfig::default(), &config);
    corrector.set_diff(0.5);

    let chunk = AudioSamples::new(44_100, 2, vec![0.25; 2 * 1024]);
    let mut written = 0;
    while buffer.is_hungry() {
        let wanted = corrector.wanted_samples(chunk.frames());
        let out = resampler.process(&chunk, wanted);
        assert_eq!(out.sample_rate, config.sample_rate);
        written += buffer.write(&out.data, 0.5);
    }
    assert_eq!(buffer.available_read(), written);

    let mut device = vec![0.0f32; config.device_buffer_frames * 2];
    buffer.read(&mut device);
    assert!(device.iter().all(|&s| (s - 0.125).abs() < 1e-6));
}
