#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use swarm_core::audio::{AudioSink, Cue};
use swarm_core::perception::landmarks::hand;
use swarm_core::perception::{Category, DetectionResult, Landmark, LandmarkDetector, PerceptionError};

/// Scripted detector. Counters are shared so tests can inspect them after
/// the detector has been moved into a slot.
#[derive(Clone, Default)]
pub struct MockDetector {
    pub result: Rc<RefCell<DetectionResult>>,
    pub fail: Rc<Cell<bool>>,
    pub calls: Rc<Cell<u32>>,
    pub closed: Rc<Cell<u32>>,
}

impl MockDetector {
    pub fn returning(result: DetectionResult) -> Self {
        let mock = Self::default();
        *mock.result.borrow_mut() = result;
        mock
    }
}

impl LandmarkDetector for MockDetector {
    type Frame = ();

    fn detect_for_video(&mut self, _frame: &(), _timestamp_ms: f64) -> Result<DetectionResult, PerceptionError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(PerceptionError::Inference("mock failure".into()));
        }
        Ok(self.result.borrow().clone())
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

/// One hand with the middle knuckle at `(x, y)`; `fist` curls the middle finger.
pub fn hand_result(x: f32, y: f32, fist: bool) -> DetectionResult {
    let mut lm = vec![Landmark::new(0.5, 0.5, 0.0); hand::COUNT];
    lm[hand::MIDDLE_MCP] = Landmark::new(x, y, 0.0);
    lm[hand::MIDDLE_PIP] = Landmark::new(x, y - 0.05, 0.0);
    lm[hand::MIDDLE_TIP] = Landmark::new(x, if fist { y + 0.05 } else { y - 0.15 }, 0.0);
    DetectionResult {
        landmarks: vec![lm],
        blendshapes: Vec::new(),
    }
}

pub fn face_result(shapes: &[(&str, f32)]) -> DetectionResult {
    DetectionResult {
        landmarks: vec![vec![Landmark::default(); 478]],
        blendshapes: vec![shapes.iter().map(|(n, s)| Category::new(*n, *s)).collect()],
    }
}

/// Audio sink whose log outlives the boxed sink handed to a stage.
#[derive(Clone, Default)]
pub struct SharedAudio(pub Rc<RefCell<Vec<Cue>>>);

impl SharedAudio {
    pub fn count(&self, cue: Cue) -> usize {
        self.0.borrow().iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for SharedAudio {
    fn play(&mut self, cue: Cue) {
        self.0.borrow_mut().push(cue);
    }
}
