//! The timeline: scenes played back to back.

use reel_core::TimeMark;

use crate::scene::Scene;

/// Ordered scenes. Scene order is playback order.
#[derive(Debug, Clone, Default)]
pub struct TimeLine {
    scenes: Vec<Scene>,
}

/// A scene resolved from a global time.
#[derive(Debug, Clone, Copy)]
pub struct SceneRef<'a> {
    /// Position in the timeline.
    pub index: usize,
    /// Global time at which the scene begins.
    pub offset: TimeMark,
    pub scene: &'a Scene,
}

impl TimeLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene_mut(&mut self, index: usize) -> Option<&mut Scene> {
        self.scenes.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Sum of scene durations.
    pub fn duration(&self) -> TimeMark {
        self.scenes
            .iter()
            .fold(TimeMark::ZERO, |acc, scene| acc + scene.duration())
    }

    /// Scene whose interval `[offset, offset + duration)` contains `t`.
    ///
    /// The end of the timeline belongs to the last scene so the final frame
    /// stays reachable. Times past the end or before zero resolve to `None`.
    pub fn scene_from_time(&self, t: TimeMark) -> Option<SceneRef<'_>> {
        if t < TimeMark::ZERO {
            return None;
        }

        let mut offset = TimeMark::ZERO;
        let mut last = None;
        for (index, scene) in self.scenes.iter().enumerate() {
            let duration = scene.duration();
            if t < offset + duration {
                return Some(SceneRef { index, offset, scene });
            }
            if !duration.is_zero() {
                last = Some(SceneRef { index, offset, scene });
            }
            offset += duration;
        }

        last.filter(|_| t == offset)
    }
}
