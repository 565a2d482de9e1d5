//! JS objects behind the core's detector and audio traits.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlVideoElement;

use swarm_core::audio::{AudioSink, Cue};
use swarm_core::perception::{Category, DetectionResult, Landmark, LandmarkDetector, PerceptionError};

/// A MediaPipe `HandLandmarker` or `FaceLandmarker` created on the JS side.
pub struct JsDetector {
    handle: JsValue,
    closed: bool,
}

impl JsDetector {
    pub fn new(handle: JsValue) -> Self {
        Self { handle, closed: false }
    }

    fn method(&self, name: &str) -> Result<Function, PerceptionError> {
        Reflect::get(&self.handle, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or(PerceptionError::Unavailable)
    }
}

impl LandmarkDetector for JsDetector {
    type Frame = HtmlVideoElement;

    fn detect_for_video(&mut self, frame: &HtmlVideoElement, timestamp_ms: f64) -> Result<DetectionResult, PerceptionError> {
        if self.closed {
            return Err(PerceptionError::Unavailable);
        }
        let detect = self.method("detectForVideo")?;
        let raw = detect
            .call2(&self.handle, frame, &JsValue::from_f64(timestamp_ms))
            .map_err(|e| PerceptionError::Inference(describe(&e)))?;
        Ok(parse_result(&raw))
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self.method("close") {
            Ok(close) => {
                if let Err(e) = close.call0(&self.handle) {
                    log::warn!("detector close failed: {}", describe(&e));
                }
            }
            Err(_) => log::warn!("detector has no close()"),
        }
    }
}

/// Forwards cue names to a JS callback, e.g. `(name) => audio.playSFX(name)`.
pub struct JsAudio {
    callback: Function,
}

impl JsAudio {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl AudioSink for JsAudio {
    fn play(&mut self, cue: Cue) {
        if let Err(e) = self.callback.call1(&JsValue::NULL, &JsValue::from_str(cue.as_str())) {
            log::warn!("audio cue {} failed: {}", cue.as_str(), describe(&e));
        }
    }
}

fn field(obj: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn number(obj: &JsValue, key: &str) -> f32 {
    field(obj, key).and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
}

fn array(value: JsValue) -> Option<Array> {
    value.dyn_into::<Array>().ok()
}

/// `{ landmarks | faceLandmarks: {x,y,z}[][], faceBlendshapes?: {categories}[] }`
fn parse_result(raw: &JsValue) -> DetectionResult {
    let landmarks = field(raw, "landmarks")
        .or_else(|| field(raw, "faceLandmarks"))
        .and_then(array)
        .map(|sets| {
            sets.iter()
                .filter_map(array)
                .map(|points| {
                    points
                        .iter()
                        .map(|p| Landmark::new(number(&p, "x"), number(&p, "y"), number(&p, "z")))
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    let blendshapes = field(raw, "faceBlendshapes")
        .and_then(array)
        .map(|faces| {
            faces
                .iter()
                .filter_map(|face| field(&face, "categories").and_then(array))
                .map(|categories| {
                    categories
                        .iter()
                        .filter_map(|c| {
                            let name = field(&c, "categoryName")?.as_string()?;
                            Some(Category::new(name, number(&c, "score")))
                        })
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    DetectionResult { landmarks, blendshapes }
}

pub fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| field(err, "message").and_then(|m| m.as_string()))
        .unwrap_or_else(|| format!("{err:?}"))
}
