//! Built-in demo project over synthetic media.

use anyhow::Result;
use reel_core::{PlaybackConfig, TimeMark};
use reel_media::{DecoderRegistry, Media, SyntheticDecoder, SyntheticSource};
use reel_timeline::{MediaClip, Project, TrackKind};
use std::sync::Arc;

/// Two video clips with a one second gap between them, over ten seconds of score.
pub fn build(config: &PlaybackConfig) -> Result<Project> {
    let decoder = SyntheticDecoder::new()
        .with_source("demo/intro.mp4", SyntheticSource::video_only(TimeMark::from_secs(5)))
        .with_source("demo/feature.mp4", SyntheticSource::new(TimeMark::from_secs(1_200)))
        .with_source("demo/score.wav", SyntheticSource::audio_only(TimeMark::from_secs(15)));
    let mut project = Project::from_config("Demo", DecoderRegistry::new(decoder), config);
    let scene = project.add_scene();

    let clip = |path: &str| MediaClip::new(Arc::new(Media::new(path)));

    project.add_media_object(
        scene,
        TrackKind::Video,
        clip("demo/intro.mp4").with_length(TimeMark::from_secs(2)),
        TimeMark::ZERO,
    )?;
    project.add_media_object(
        scene,
        TrackKind::Video,
        clip("demo/feature.mp4")
            .with_start(TimeMark::from_secs(1_000))
            .with_length(TimeMark::from_secs(10)),
        TimeMark::from_secs(3),
    )?;
    project.add_media_object(
        scene,
        TrackKind::Audio,
        clip("demo/score.wav").with_length(TimeMark::from_secs(10)),
        TimeMark::ZERO,
    )?;

    Ok(project)
}
