use glam::Vec3;

/// Decaying scalar that drives the radial burst.
///
/// While above `threshold` the integrator swaps spring seeking for an
/// outward impulse; the envelope shrinks geometrically every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    pub magnitude: f32,
    pub threshold: f32,
    pub decay: f32,
}

impl Explosion {
    pub fn new(threshold: f32, decay: f32) -> Self {
        Self {
            magnitude: 0.0,
            threshold,
            decay,
        }
    }

    pub fn trigger(&mut self, magnitude: f32) {
        self.magnitude = self.magnitude.max(magnitude);
    }

    pub fn is_active(&self) -> bool {
        self.magnitude > self.threshold
    }

    /// Advance the envelope by one frame.
    pub fn decay(&mut self) {
        if self.magnitude > 0.0 {
            self.magnitude *= self.decay;
        }
    }
}

/// Outward velocity impulse from the origin.
///
/// The `+ 0.1` keeps particles at the origin finite; they receive no push.
#[inline]
pub fn radial_impulse(pos: Vec3, magnitude: f32, gain: f32) -> Vec3 {
    let len = pos.length() + 0.1;
    pos / len * (magnitude * gain)
}
