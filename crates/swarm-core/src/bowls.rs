use glam::Vec3;

use crate::math::{approach, ease_out_cubic};
use crate::render::{InstanceTransform, MeshGroup, RenderSink};
use crate::shapes::Mode;

/// Per-frame progress change.
pub const BOWL_RATE: f32 = 0.03;
/// Start height above the anchor for the fly-in.
pub const BOWL_DROP_HEIGHT: f32 = 300.0;
/// Resting offset below the anchor.
pub const BOWL_SINK: f32 = 10.0;
pub const BOWL_HOVER: f32 = 5.0;

/// Fly-in/out of the serving bowls at the `Dining` cluster anchors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BowlAnimator {
    progress: f32,
}

impl BowlAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn eased(&self) -> f32 {
        ease_out_cubic(self.progress)
    }

    pub fn is_visible(&self) -> bool {
        self.progress > 0.01
    }

    /// Move progress one frame toward 1 in `Dining`, toward 0 otherwise.
    pub fn update(&mut self, mode: Mode) {
        let delta = if mode == Mode::Dining { BOWL_RATE } else { -BOWL_RATE };
        self.progress = (self.progress + delta).clamp(0.0, 1.0);
    }

    pub fn submit<S: RenderSink + ?Sized>(&self, anchors: &[Vec3], time: f32, sink: &mut S) {
        if !self.is_visible() {
            sink.set_group_visible(MeshGroup::Bowls, false);
            return;
        }
        sink.set_group_visible(MeshGroup::Bowls, true);

        let ease = self.eased();
        for (i, a) in anchors.iter().enumerate() {
            let y = approach(a.y + BOWL_DROP_HEIGHT, a.y - BOWL_SINK, ease) + (time * 2.0 + i as f32).sin() * BOWL_HOVER;
            sink.set_instance_transform(MeshGroup::Bowls, i, &InstanceTransform::at(Vec3::new(a.x, y, a.z), ease));
        }
    }
}
