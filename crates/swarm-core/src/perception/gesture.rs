use super::landmarks::{hand, Landmark};

/// Fires once on each false → true transition; held `true` stays quiet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RisingEdge {
    latched: bool,
}

impl RisingEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current level; returns `true` only on the rising edge.
    pub fn update(&mut self, level: bool) -> bool {
        if level && !self.latched {
            self.latched = true;
            true
        } else {
            if !level {
                self.latched = false;
            }
            false
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

/// Middle fingertip curled below its PIP joint (image y grows downward).
pub fn is_fist(landmarks: &[Landmark]) -> bool {
    match (landmarks.get(hand::MIDDLE_TIP), landmarks.get(hand::MIDDLE_PIP)) {
        (Some(tip), Some(pip)) => tip.y > pip.y,
        _ => false,
    }
}

/// Thumb and index tips closer than `max_distance` in normalized image space.
pub fn is_pinch(landmarks: &[Landmark], max_distance: f32) -> bool {
    match (landmarks.get(hand::THUMB_TIP), landmarks.get(hand::INDEX_TIP)) {
        (Some(thumb), Some(index)) => (thumb.x - index.x).hypot(thumb.y - index.y) < max_distance,
        _ => false,
    }
}
