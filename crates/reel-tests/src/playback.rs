//! Integration tests for preview synchronization.
//!
//! Builds projects over synthetic media and drives `PreviewState` the way the
//! playback loop does.

use reel_core::{PresentableFrame, TimeMark};
use reel_media::{DecoderRegistry, Media, SyntheticDecoder, SyntheticSource};
use reel_playback::PreviewState;
use reel_timeline::{MediaClip, Project, TrackKind};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

fn ms(value: i64) -> TimeMark {
    TimeMark::from_millis(value)
}

fn decoder() -> SyntheticDecoder {
    SyntheticDecoder::new()
        .with_source("video.mp4", SyntheticSource::video_only(TimeMark::from_secs(30)))
        .with_source("audio.wav", SyntheticSource::audio_only(TimeMark::from_secs(30)))
        .with_source("both.mp4", SyntheticSource::new(TimeMark::from_secs(30)))
}

fn clip(path: &str, length_ms: i64) -> MediaClip {
    MediaClip::new(Arc::new(Media::new(path))).with_length(ms(length_ms))
}

fn drain_video(preview: &mut PreviewState) -> Vec<PresentableFrame> {
    std::iter::from_fn(|| preview.next_video()).collect()
}

fn drain_audio(preview: &mut PreviewState) -> Vec<PresentableFrame> {
    std::iter::from_fn(|| preview.next_audio()).collect()
}

// ── End to end ─────────────────────────────────────────────────

#[test]
fn video_and_audio_clips_terminate_at_their_ends() {
    let mut project = Project::new("E2E", DecoderRegistry::new(decoder()));
    let scene = project.add_scene();
    project
        .add_media_object(scene, TrackKind::Video, clip("video.mp4", 2_000), TimeMark::ZERO)
        .unwrap();
    project
        .add_media_object(scene, TrackKind::Audio, clip("audio.wav", 1_000), TimeMark::ZERO)
        .unwrap();

    let mut preview = PreviewState::new(Arc::new(project)).unwrap();
    assert!(preview.video_clip().is_some());
    assert!(preview.audio_clip().is_some());

    let period = preview.time_base();
    let video = drain_video(&mut preview);
    assert_eq!(video.len() as i64, ms(2_000).ticks() / period.ticks());
    assert!(preview.playing() > ms(2_000));
    assert!(video.iter().all(|f| f.as_video().is_some()));

    let audio = drain_audio(&mut preview);
    assert!(!audio.is_empty());
    assert!(audio.iter().all(|f| f.pts() <= ms(1_000)));
    let covered: TimeMark = audio
        .iter()
        .filter_map(PresentableFrame::duration)
        .fold(TimeMark::ZERO, |acc, d| acc + d);
    assert!(covered >= ms(1_000));
    assert!(preview.audio_playing() > ms(1_000));
}

#[test]
fn shared_source_feeds_both_streams_in_order() {
    let mut project = Project::new("Shared", DecoderRegistry::new(decoder()));
    let scene = project.add_scene();
    project
        .add_media_object(scene, TrackKind::Video, clip("both.mp4", 3_000), TimeMark::ZERO)
        .unwrap();
    project
        .add_media_object(scene, TrackKind::Audio, clip("both.mp4", 3_000), TimeMark::ZERO)
        .unwrap();
    assert_eq!(project.registry().len(), 1);

    let mut preview = PreviewState::new(Arc::new(project)).unwrap();
    let mut video = Vec::new();
    let mut audio = Vec::new();
    // Interleave the way the loop does: a few audio chunks per video frame.
    while preview.playing() < ms(3_000) {
        if let Some(frame) = preview.next_video() {
            video.push(frame.pts());
        }
        while preview.audio_playing() <= preview.playing() {
            if let Some(chunk) = preview.next_audio() {
                audio.push(chunk.pts());
            }
        }
    }

    assert!(video.windows(2).all(|w| w[0] < w[1]));
    assert!(audio.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(audio[0], TimeMark::ZERO);
    assert!(*video.last().unwrap() >= ms(2_900));
    assert!(*audio.last().unwrap() >= ms(2_900));
}

// ── Clip switching ─────────────────────────────────────────────

#[test]
fn switch_across_scenes_starts_new_clip_from_zero() {
    let mut project = Project::new("Scenes", DecoderRegistry::new(decoder()));
    let first = project.add_scene();
    let second = project.add_scene();
    project
        .add_media_object(first, TrackKind::Video, clip("video.mp4", 3_000), TimeMark::ZERO)
        .unwrap();
    project
        .add_media_object(
            second,
            TrackKind::Video,
            clip("video.mp4", 10_000).with_start(TimeMark::from_secs(20)),
            TimeMark::ZERO,
        )
        .unwrap();

    let mut preview = PreviewState::new(Arc::new(project)).unwrap();
    let frames = drain_video(&mut preview);
    let pts: Vec<TimeMark> = frames.iter().map(PresentableFrame::pts).collect();

    // The outgoing clip's last frame and the incoming clip's first frame may
    // share the cut instant.
    assert!(pts.windows(2).all(|w| w[0] <= w[1]));
    let first_after = pts.iter().find(|&&p| p > ms(3_000)).copied().unwrap();
    // Second scene begins at 3s; its clip is entered at its in-point.
    assert!(first_after <= ms(3_000) + preview.time_base());
    assert!(preview.playing() > ms(13_000));
}

#[test]
fn broken_source_plays_as_gap() {
    let mut project = Project::new("Broken", DecoderRegistry::new(decoder()));
    let scene = project.add_scene();
    project
        .add_media_object(scene, TrackKind::Video, clip("video.mp4", 1_000), TimeMark::ZERO)
        .unwrap();
    project
        .add_media_object(scene, TrackKind::Video, clip("missing.mp4", 1_000), ms(1_000))
        .unwrap();
    project
        .add_media_object(scene, TrackKind::Video, clip("video.mp4", 1_000), ms(2_000))
        .unwrap();

    let mut preview = PreviewState::new(Arc::new(project)).unwrap();
    let mut shown = Vec::new();
    while preview.playing() <= ms(3_000) {
        let frame = preview.next_video();
        shown.push((preview.playing(), frame.is_some()));
    }

    let in_range = |from: i64, to: i64| {
        shown
            .iter()
            .filter(move |(t, _)| *t > ms(from) && *t < ms(to))
            .map(|(_, has_frame)| *has_frame)
    };
    assert!(in_range(0, 1_000).all(|f| f));
    assert!(in_range(1_050, 1_950).all(|f| !f));
    assert!(in_range(2_050, 3_000).all(|f| f));
}

#[test]
fn repeated_sync_is_stable() {
    let mut project = Project::new("Sync", DecoderRegistry::new(decoder()));
    let scene = project.add_scene();
    project
        .add_media_object(scene, TrackKind::Video, clip("both.mp4", 10_000), TimeMark::ZERO)
        .unwrap();
    project
        .add_media_object(scene, TrackKind::Audio, clip("both.mp4", 10_000), TimeMark::ZERO)
        .unwrap();
    let mut preview = PreviewState::new(Arc::new(project)).unwrap();

    let snapshot = |preview: &PreviewState| {
        let video = preview.video_clip().unwrap();
        let audio = preview.audio_clip().unwrap();
        let video_pts = video.lock().queued_pts();
        let audio_pts = audio.lock().queued_pts();
        (video_pts, audio_pts)
    };

    preview.sync(ms(6_000)).unwrap();
    let first = snapshot(&preview);
    preview.sync(ms(6_000)).unwrap();
    assert_eq!(snapshot(&preview), first);
}
