use glam::Vec3;

/// Pointer (hand cursor or mouse) projected into the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerParams {
    pub active: bool,
    pub position: Vec3,
    pub strength: f32,
    pub radius: f32,
}

impl Default for PointerParams {
    fn default() -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            strength: 3.0,
            radius: 160.0,
        }
    }
}

impl PointerParams {
    pub fn at(position: Vec3, strength: f32, radius: f32) -> Self {
        Self {
            active: true,
            position,
            strength,
            radius,
        }
    }
}

/// Velocity kick pushing a particle away from the pointer.
///
/// Linear falloff `(1 - d / radius) * strength`, reaching zero at the edge of
/// the radius so there is no jump when a particle crosses it. A particle
/// sitting exactly on the pointer has no defined direction and gets nothing.
pub fn repulsion(pos: Vec3, params: &PointerParams) -> Vec3 {
    if !params.active || params.radius <= 0.0 {
        return Vec3::ZERO;
    }

    let away = pos - params.position;
    let dist = away.length();
    if dist >= params.radius || dist < 1e-6 {
        return Vec3::ZERO;
    }

    let falloff = (1.0 - dist / params.radius) * params.strength;
    away / dist * falloff
}
