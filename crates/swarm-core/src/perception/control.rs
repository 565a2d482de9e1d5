use glam::Vec2;

use super::face::{gaze_from_blendshapes, jaw_open, Gaze};
use super::gesture::{is_fist, is_pinch, RisingEdge};
use super::landmarks::{hand, Category, Landmark};
use crate::config::PerceptionConfig;
use crate::math::approach;

/// Control signals derived from hand and face tracking.
///
/// Only fresh detections change this state; between detections (and after a
/// failed one) the previous values stay in force.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlState {
    /// Smoothed cursor in screen pixels.
    pub cursor: Vec2,
    /// Cursor in normalized device coordinates, y up.
    pub pointer_ndc: Vec2,
    pub fist: bool,
    /// `true` only on the frame a fist closes.
    pub fist_pressed: bool,
    pub pinch: bool,
    pub gaze: Gaze,
    pub mouth_open: f32,
    pub last_detection_ms: Option<f64>,
    pub hand_present: bool,
    viewport: Vec2,
    fist_edge: RisingEdge,
}

impl ControlState {
    pub fn new(width: f32, height: f32) -> Self {
        let viewport = Vec2::new(width.max(1.0), height.max(1.0));
        let cursor = viewport * 0.5;
        Self {
            cursor,
            pointer_ndc: to_ndc(cursor, viewport),
            fist: false,
            fist_pressed: false,
            pinch: false,
            gaze: Gaze::default(),
            mouth_open: 0.0,
            last_detection_ms: None,
            hand_present: false,
            viewport,
            fist_edge: RisingEdge::new(),
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self.pointer_ndc = to_ndc(self.cursor, self.viewport);
    }

    /// Clears per-frame edges. Called once at the top of every frame.
    pub fn begin_frame(&mut self) {
        self.fist_pressed = false;
    }

    /// Fold in a fresh hand detection (`None` when no hand was found).
    ///
    /// A lost hand counts as an open hand: `fist` and `pinch` drop and the
    /// fist latch releases, so the next fist after re-acquiring presses again.
    pub fn apply_hand(&mut self, hand_landmarks: Option<&[Landmark]>, config: &PerceptionConfig, now_ms: f64) {
        self.last_detection_ms = Some(now_ms);
        let Some(lm) = hand_landmarks else {
            self.hand_present = false;
            self.fist = false;
            self.pinch = false;
            self.fist_edge.update(false);
            return;
        };

        self.hand_present = true;
        if let Some(knuckle) = lm.get(hand::MIDDLE_MCP) {
            let target = Vec2::new((1.0 - knuckle.x) * self.viewport.x, knuckle.y * self.viewport.y);
            self.cursor = self.cursor.lerp(target, config.cursor_smoothing);
            self.pointer_ndc = to_ndc(self.cursor, self.viewport);
        }

        self.fist = is_fist(lm);
        self.fist_pressed = self.fist_edge.update(self.fist);
        self.pinch = is_pinch(lm, config.pinch_distance);
    }

    /// Fold in fresh face blendshapes.
    pub fn apply_face(&mut self, shapes: &[Category], config: &PerceptionConfig) {
        self.gaze = gaze_from_blendshapes(shapes, config.gaze_offset_scale, config.gaze_rotation_scale);
        if let Some(jaw) = jaw_open(shapes) {
            self.mouth_open = approach(self.mouth_open, jaw, config.jaw_smoothing);
        }
    }

    /// Mouse/touch fallback. Ignored while a hand is tracked.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        if self.hand_present {
            return false;
        }
        self.cursor = Vec2::new(x, y);
        self.pointer_ndc = to_ndc(self.cursor, self.viewport);
        true
    }
}

fn to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(cursor.x / viewport.x * 2.0 - 1.0, -(cursor.y / viewport.y) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_at(x: f32, y: f32) -> Vec<Landmark> {
        let mut lm = vec![Landmark::default(); hand::COUNT];
        lm[hand::MIDDLE_MCP] = Landmark::new(x, y, 0.0);
        lm
    }

    #[test]
    fn test_cursor_mirrored_and_smoothed() {
        let config = PerceptionConfig::default();
        let mut control = ControlState::new(1000.0, 500.0);
        control.cursor = Vec2::ZERO;

        control.apply_hand(Some(&hand_at(0.25, 0.5)), &config, 0.0);
        // target (750, 250), 30% of the way from the origin
        assert!((control.cursor.x - 225.0).abs() < 1e-3);
        assert!((control.cursor.y - 75.0).abs() < 1e-3);
        assert!(control.hand_present);
    }

    #[test]
    fn test_centered_cursor_is_ndc_origin() {
        let control = ControlState::new(800.0, 600.0);
        assert!(control.pointer_ndc.length() < 1e-6);
    }

    #[test]
    fn test_ndc_corners() {
        let mut control = ControlState::new(800.0, 600.0);
        control.pointer_moved(0.0, 0.0);
        assert_eq!(control.pointer_ndc, Vec2::new(-1.0, 1.0));
        control.pointer_moved(800.0, 600.0);
        assert_eq!(control.pointer_ndc, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_mouse_ignored_while_hand_tracked() {
        let config = PerceptionConfig::default();
        let mut control = ControlState::new(800.0, 600.0);
        control.apply_hand(Some(&hand_at(0.5, 0.5)), &config, 0.0);
        let before = control.cursor;
        assert!(!control.pointer_moved(10.0, 10.0));
        assert_eq!(control.cursor, before);

        control.apply_hand(None, &config, 60.0);
        assert!(control.pointer_moved(10.0, 10.0));
        assert_eq!(control.cursor, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_fist_pressed_only_on_closing_frame() {
        let config = PerceptionConfig::default();
        let mut control = ControlState::new(800.0, 600.0);
        let mut fist = hand_at(0.5, 0.5);
        fist[hand::MIDDLE_PIP].y = 0.4;
        fist[hand::MIDDLE_TIP].y = 0.6;

        control.begin_frame();
        control.apply_hand(Some(&fist), &config, 0.0);
        assert!(control.fist && control.fist_pressed);

        control.begin_frame();
        control.apply_hand(Some(&fist), &config, 60.0);
        assert!(control.fist && !control.fist_pressed);
    }

    #[test]
    fn test_lost_hand_releases_fist() {
        let config = PerceptionConfig::default();
        let mut control = ControlState::new(800.0, 600.0);
        let mut fist = hand_at(0.5, 0.5);
        fist[hand::MIDDLE_PIP].y = 0.4;
        fist[hand::MIDDLE_TIP].y = 0.6;

        control.begin_frame();
        control.apply_hand(Some(&fist), &config, 0.0);
        assert!(control.fist_pressed);
        assert!(control.fist_edge.is_latched());

        control.begin_frame();
        control.apply_hand(None, &config, 60.0);
        assert!(!control.fist && !control.pinch && !control.hand_present);
        assert!(!control.fist_edge.is_latched());

        control.begin_frame();
        control.apply_hand(Some(&fist), &config, 120.0);
        assert!(control.fist_pressed, "re-acquired fist presses again");
    }

    #[test]
    fn test_jaw_low_pass() {
        let config = PerceptionConfig::default();
        let mut control = ControlState::new(800.0, 600.0);
        control.apply_face(&[Category::new("jawOpen", 1.0)], &config);
        assert!((control.mouth_open - 0.3).abs() < 1e-6);
    }
}
