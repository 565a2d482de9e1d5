//! Face blendshape → gaze and jaw signals.

use glam::Vec2;

use super::landmarks::Category;

pub const JAW_OPEN: &str = "jawOpen";

/// Eye offset (scene units, camera space) and eyeball rotation (radians, x then y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gaze {
    pub offset: Vec2,
    pub rotation: Vec2,
}

fn score(shapes: &[Category], name: &str) -> Option<f32> {
    shapes
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.score.clamp(0.0, 1.0))
}

/// `(in, out, up, down)` for one eye, or `None` when the eye reports nothing.
fn eye_scores(shapes: &[Category], side: &str) -> Option<[f32; 4]> {
    let names = ["eyeLookIn", "eyeLookOut", "eyeLookUp", "eyeLookDown"];
    let raw = names.map(|n| score(shapes, &format!("{n}{side}")));
    if raw.iter().all(Option::is_none) {
        return None;
    }
    Some(raw.map(|s| s.unwrap_or(0.0)))
}

/// Gaze from `eyeLook*` blendshapes, averaged over whichever eyes reported.
///
/// Differences are scaled into bounded ranges: offset by `offset_scale`,
/// rotation by `rotation_scale`.
pub fn gaze_from_blendshapes(shapes: &[Category], offset_scale: f32, rotation_scale: f32) -> Gaze {
    let eyes: Vec<[f32; 4]> = ["Left", "Right"]
        .iter()
        .filter_map(|side| eye_scores(shapes, side))
        .collect();
    if eyes.is_empty() {
        return Gaze::default();
    }

    let n = eyes.len() as f32;
    let [look_in, look_out, up, down] = eyes.iter().fold([0.0f32; 4], |mut acc, e| {
        for k in 0..4 {
            acc[k] += e[k] / n;
        }
        acc
    });

    Gaze {
        offset: Vec2::new((look_out - look_in) * offset_scale, (up - down) * offset_scale),
        rotation: Vec2::new((down - up) * rotation_scale, (look_in - look_out) * rotation_scale),
    }
}

/// Raw `jawOpen` score in `[0, 1]`, or `None` if the face did not report it.
pub fn jaw_open(shapes: &[Category]) -> Option<f32> {
    score(shapes, JAW_OPEN)
}
