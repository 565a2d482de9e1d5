//! Webcam landmarks → control signals.
//!
//! Two external detectors (hand and face) are polled at a throttled rate and
//! their results folded into a [`ControlState`] the rest of the stage reads.

pub mod control;
pub mod face;
pub mod gesture;
pub mod landmarks;
pub mod slot;
pub mod throttle;

pub use control::ControlState;
pub use face::Gaze;
pub use gesture::RisingEdge;
pub use landmarks::{Category, DetectionResult, Landmark, LandmarkDetector, PerceptionError};
pub use slot::{DetectorSlot, MountTicket};
pub use throttle::{Poll, ThrottledDetector};

use crate::config::PerceptionConfig;

/// Hand + face detectors and the control state they drive.
///
/// Both slots are always mounted and unmounted together, so one
/// [`MountTicket`] covers both attaches.
pub struct PerceptionAdapter<D: LandmarkDetector> {
    pub config: PerceptionConfig,
    pub control: ControlState,
    hand: ThrottledDetector<D>,
    face: ThrottledDetector<D>,
}

impl<D: LandmarkDetector> PerceptionAdapter<D> {
    pub fn new(config: PerceptionConfig, width: f32, height: f32) -> Self {
        Self {
            hand: ThrottledDetector::new(config.hand_interval_ms),
            face: ThrottledDetector::new(config.face_interval_ms),
            control: ControlState::new(width, height),
            config,
        }
    }

    pub fn mount(&mut self) -> MountTicket {
        let ticket = self.hand.mount();
        let face_ticket = self.face.mount();
        debug_assert_eq!(ticket, face_ticket);
        ticket
    }

    pub fn attach_hand(&mut self, ticket: MountTicket, detector: D) -> bool {
        self.hand.attach(ticket, detector)
    }

    pub fn attach_face(&mut self, ticket: MountTicket, detector: D) -> bool {
        self.face.attach(ticket, detector)
    }

    pub fn unmount(&mut self) {
        self.hand.unmount();
        self.face.unmount();
    }

    pub fn is_ready(&self) -> bool {
        self.hand.is_ready() && self.face.is_ready()
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.config.hand_interval_ms = interval_ms;
        self.config.face_interval_ms = interval_ms;
        self.hand.set_interval(interval_ms);
        self.face.set_interval(interval_ms);
    }

    /// Poll both detectors. Control state only changes on fresh results.
    pub fn poll(&mut self, frame: &D::Frame, now_ms: f64) {
        self.control.begin_frame();

        if let Some(Poll::Fresh(result)) = self.hand.poll(frame, now_ms) {
            self.control.apply_hand(result.first_hand(), &self.config, now_ms);
        }
        if let Some(Poll::Fresh(result)) = self.face.poll(frame, now_ms) {
            if let Some(shapes) = result.first_blendshapes() {
                self.control.apply_face(shapes, &self.config);
            }
        }
    }

    /// Mouse fallback; see [`ControlState::pointer_moved`].
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        self.control.pointer_moved(x, y)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.control.set_viewport(width, height);
    }
}
