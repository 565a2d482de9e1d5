use thiserror::Error;

/// Hand landmark indices (MediaPipe 21-point hand model).
pub mod hand {
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    /// Middle-finger knuckle; the cursor follows this point.
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const COUNT: usize = 21;
}

/// Normalized landmark: x and y in `[0, 1]` image space (y down), z relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Named blendshape score.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub name: String,
    pub score: f32,
}

impl Category {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// One detector invocation: per detected hand/face, its landmarks, and for
/// faces optionally the blendshape scores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    pub landmarks: Vec<Vec<Landmark>>,
    pub blendshapes: Vec<Vec<Category>>,
}

impl DetectionResult {
    /// Landmarks of the first detection, if it carries a full hand.
    pub fn first_hand(&self) -> Option<&[Landmark]> {
        self.landmarks
            .first()
            .filter(|lm| lm.len() >= hand::COUNT)
            .map(Vec::as_slice)
    }

    pub fn first_blendshapes(&self) -> Option<&[Category]> {
        self.blendshapes.first().map(Vec::as_slice)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerceptionError {
    #[error("landmark inference failed: {0}")]
    Inference(String),

    #[error("detector is not available")]
    Unavailable,
}

/// External landmark detector (hand or face).
///
/// Implementations wrap an expensive native or JS object; `close` releases
/// it and must be safe to call more than once.
pub trait LandmarkDetector {
    type Frame: ?Sized;

    fn detect_for_video(&mut self, frame: &Self::Frame, timestamp_ms: f64) -> Result<DetectionResult, PerceptionError>;

    fn close(&mut self);
}
