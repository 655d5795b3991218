//! Integration tests for the timeline subsystem.
//!
//! Exercises clip selection and the prefetch engine over synthetic media
//! opened through a shared decoder registry.

use proptest::prelude::*;
use reel_core::{PixelFormat, TimeMark};
use reel_media::{DecoderRegistry, Media, SyntheticDecoder, SyntheticSource, SyntheticVideo};
use reel_timeline::{MediaClip, Project, SharedMediaObject, TrackKind};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

fn ms(value: i64) -> TimeMark {
    TimeMark::from_millis(value)
}

fn decoder() -> SyntheticDecoder {
    SyntheticDecoder::new()
        .with_source("camera.mp4", SyntheticSource::new(TimeMark::from_secs(60)))
        .with_source(
            "preroll.mp4",
            SyntheticSource::video_only(TimeMark::from_secs(60)).with_preroll(ms(700)),
        )
        .with_source(
            "reordered.mp4",
            SyntheticSource::video_only(TimeMark::from_secs(60)).with_video(SyntheticVideo {
                reorder: true,
                ..Default::default()
            }),
        )
}

fn clip(path: &str, length_ms: i64) -> MediaClip {
    MediaClip::new(Arc::new(Media::new(path))).with_length(ms(length_ms))
}

/// Video clips `[0,2s]` and `[3s,13s]` in a single scene.
fn gap_project() -> (Project, SharedMediaObject, SharedMediaObject) {
    let mut project = Project::new("Gap", DecoderRegistry::new(decoder()));
    let scene = project.add_scene();
    let first = project
        .add_media_object(scene, TrackKind::Video, clip("camera.mp4", 2_000), TimeMark::ZERO)
        .unwrap();
    let second = project
        .add_media_object(scene, TrackKind::Video, clip("camera.mp4", 10_000), ms(3_000))
        .unwrap();
    (project, first, second)
}

fn single_object(path: &str) -> SharedMediaObject {
    let mut project = Project::new("Single", DecoderRegistry::new(decoder()));
    let scene = project.add_scene();
    project
        .add_media_object(scene, TrackKind::Video, clip(path, 30_000), TimeMark::ZERO)
        .unwrap()
}

// ── Clip selection ─────────────────────────────────────────────

#[test]
fn clip_lookup_respects_boundaries_and_gaps() {
    let (project, first, second) = gap_project();
    let scene = project.timeline().scene_from_time(ms(2_000)).unwrap().scene;

    let at = |t: TimeMark| scene.peek_video_clip(t);
    assert!(Arc::ptr_eq(&at(ms(2_000)).unwrap(), &first));
    assert!(at(ms(2_500)).is_none());
    assert!(Arc::ptr_eq(&at(ms(5_000)).unwrap(), &second));
    assert!(Arc::ptr_eq(&at(ms(3_000)).unwrap(), &second));
}

#[test]
fn every_instant_of_a_clip_selects_it() {
    let (project, _, second) = gap_project();
    let scene = &project.timeline().scenes()[0];
    for t in (3_000..=13_000).step_by(250) {
        let found = scene.peek_video_clip(ms(t)).unwrap();
        assert!(Arc::ptr_eq(&found, &second), "t = {}ms", t);
    }
}

#[test]
fn scenes_chain_by_cumulative_duration() {
    let mut project = Project::new("Scenes", DecoderRegistry::new(decoder()));
    for length in [2_000, 4_000, 1_000] {
        let scene = project.add_scene();
        project
            .add_media_object(scene, TrackKind::Video, clip("camera.mp4", length), TimeMark::ZERO)
            .unwrap();
    }
    let timeline = project.timeline();
    assert_eq!(timeline.duration(), ms(7_000));

    let third = timeline.scene_from_time(ms(6_500)).unwrap();
    assert_eq!(third.index, 2);
    assert_eq!(third.offset, ms(6_000));
    assert!(timeline.scene_from_time(ms(7_001)).is_none());
}

#[test]
fn objects_on_one_source_share_a_session() {
    let (project, _, _) = gap_project();
    assert_eq!(project.registry().len(), 1);
    assert!(project.registry().contains("camera.mp4"));
}

// ── Prefetch engine ────────────────────────────────────────────

#[test]
fn seek_then_show_never_goes_backwards() {
    for path in ["camera.mp4", "preroll.mp4", "reordered.mp4"] {
        let object = single_object(path);
        let mut object = object.lock();
        let target = ms(12_345);
        object.seek(target);

        let mut last = target;
        let mut count = 0;
        while let Some(frame) = object.show_next() {
            assert!(frame.pts() >= target, "{}: {} before seek target", path, frame.pts());
            assert!(frame.pts() >= last);
            last = frame.pts();
            count += 1;
        }
        assert!(count > 0, "{} produced no frames", path);
    }
}

#[test]
fn ready_pts_tracks_queue_front() {
    let object = single_object("camera.mp4");
    let mut object = object.lock();
    object.seek(TimeMark::from_secs(1));
    for _ in 0..40 {
        let front = object.queued_pts().first().copied();
        if let Some(front) = front {
            assert_eq!(object.ready_pts(), front);
        }
        object.show_next();
    }
}

#[test]
fn rejected_formats_do_not_stall_prefetch() {
    let decoder = SyntheticDecoder::new().with_source(
        "yuv.mp4",
        SyntheticSource::video_only(TimeMark::from_secs(2)).with_video(SyntheticVideo {
            format: PixelFormat::Nv12,
            ..Default::default()
        }),
    );
    let mut project = Project::new("Formats", DecoderRegistry::new(decoder));
    let scene = project.add_scene();
    let object = project
        .add_media_object(scene, TrackKind::Video, clip("yuv.mp4", 2_000), TimeMark::ZERO)
        .unwrap();

    let mut object = object.lock();
    object.seek(TimeMark::ZERO);
    assert!(object.show_next().is_none());
}

proptest! {
    #[test]
    fn prop_queue_is_ordered_after_any_seek(target in 0i64..29_000, path in prop::sample::select(vec!["camera.mp4", "preroll.mp4", "reordered.mp4"])) {
        let object = single_object(path);
        let mut object = object.lock();
        object.seek(ms(target));

        let queued = object.queued_pts();
        prop_assert!(queued.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(queued.iter().all(|&p| p >= ms(target)));
    }
}
