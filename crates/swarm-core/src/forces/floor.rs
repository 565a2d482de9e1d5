use glam::Vec3;

/// Gravity and a bouncy floor plane, used by the `Drop` mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorParams {
    pub gravity: f32,
    pub floor_y: f32,
    pub restitution: f32,
    /// Horizontal velocity multiplier applied on each bounce.
    pub drag: f32,
    /// Below this vertical speed a particle touching the floor comes to rest.
    pub rest_speed: f32,
}

/// Apply gravity, then resolve floor contact for a particle that is already
/// below the floor. Vertical velocity is reflected with `restitution`.
///
/// Returns `true` when a bounce happened this call.
pub fn gravity_and_bounce(pos: &mut Vec3, vel: &mut Vec3, params: &FloorParams, dt: f32) -> bool {
    vel.y -= params.gravity * dt;

    let mut bounced = false;
    if pos.y < params.floor_y {
        pos.y = params.floor_y;
        vel.y *= -params.restitution;
        vel.x *= params.drag;
        vel.z *= params.drag;
        bounced = true;
    }

    if vel.y.abs() < params.rest_speed && pos.y <= params.floor_y + 1.0 {
        vel.y = 0.0;
        pos.y = params.floor_y;
    }

    bounced
}
