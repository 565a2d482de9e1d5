//! Webcam-driven particle swarm engine for the Aftermath stage.
//!
//! Platform independent: the browser bridge lives in `swarm-wasm`, native
//! tests drive everything here with mock detectors and CPU buffers.

pub mod audio;
pub mod bowls;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod forces;
pub mod math;
pub mod particle;
pub mod perception;
pub mod render;
pub mod shapes;
pub mod solver;
pub mod stage;
pub mod transition;

pub use config::{CameraConfig, CutsceneConfig, PerceptionConfig, StageConfig, SwarmConfig};
pub use error::SwarmError;
pub use render::{InstanceBuffers, MeshGroup, RenderSink};
pub use shapes::Mode;
pub use stage::AftermathStage;
