//! Benchmarks for clip selection.
//!
//! Run with: cargo bench -p reel-timeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reel_core::TimeMark;
use reel_media::{DecoderRegistry, Media, SyntheticDecoder, SyntheticSource};
use reel_timeline::{MediaClip, Project, TrackKind};
use std::sync::Arc;

/// `scenes` scenes of `clips` back-to-back one second clips each.
fn project(scenes: usize, clips: usize) -> Project {
    let decoder = SyntheticDecoder::new()
        .with_source("bench.mp4", SyntheticSource::video_only(TimeMark::from_secs(3600)));
    let mut project = Project::new("Bench", DecoderRegistry::new(decoder));
    for _ in 0..scenes {
        let scene = project.add_scene();
        for i in 0..clips {
            let clip = MediaClip::new(Arc::new(Media::new("bench.mp4")))
                .with_length(TimeMark::from_secs(1));
            project
                .add_media_object(scene, TrackKind::Video, clip, TimeMark::from_secs(i as i64))
                .ok();
        }
    }
    project
}

fn bench_scene_from_time(c: &mut Criterion) {
    let project = project(20, 10);
    let t = project.duration() - TimeMark::from_millis(500);

    c.bench_function("scene_from_time_last_of_20", |bencher| {
        bencher.iter(|| project.timeline().scene_from_time(black_box(t)).map(|s| s.index));
    });
}

fn bench_clip_lookup(c: &mut Criterion) {
    let project = project(1, 50);
    let scene = &project.timeline().scenes()[0];

    c.bench_function("peek_video_clip_last_of_50", |bencher| {
        bencher.iter(|| scene.peek_video_clip(black_box(TimeMark::from_millis(49_500))).is_some());
    });
}

criterion_group!(benches, bench_scene_from_time, bench_clip_lookup);
criterion_main!(benches);
