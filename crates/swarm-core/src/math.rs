/// Cubic ease-out on `[0, 1]`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Move `current` a fraction `t` of the way toward `target`.
#[inline]
pub fn approach(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}

/// Frame-rate independent damping: `factor` is the per-frame multiplier.
#[inline]
pub fn damp(factor: f32, dt: f32) -> f32 {
    if dt == 1.0 {
        factor
    } else {
        factor.powf(dt)
    }
}
