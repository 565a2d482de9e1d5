//! Orbiting scene camera and pointer unprojection.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::config::CameraConfig;
use crate::render::CameraPose;

pub struct OrbitCamera {
    pub config: CameraConfig,
    pub position: Vec3,
    aspect: f32,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.start,
            config,
            aspect: sanitize_aspect(aspect),
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    /// Ease toward the orbit point for `time`; the pointer's x nudges the yaw.
    pub fn update(&mut self, time: f32, pointer_ndc: Vec2) {
        let c = &self.config;
        let r = c.orbit_radius + (time * 0.5).sin() * c.orbit_sway;
        let angle = time * c.orbit_rate + pointer_ndc.x * c.pointer_yaw;
        let target_x = r * angle.cos();
        let target_z = r * angle.sin();
        self.position.x += (target_x - self.position.x) * c.follow;
        self.position.z += (target_z - self.position.z) * c.follow;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.config.fov_y_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Camera-local to world; objects "stuck to the viewport" compose with this.
    pub fn world_from_camera(&self) -> Mat4 {
        self.view().inverse()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            view: self.view(),
            projection: self.projection(),
        }
    }

    /// Cast the pointer through the screen and hit the `z = 0` plane.
    ///
    /// Returns `None` when the ray runs parallel to the plane.
    pub fn pointer_on_plane(&self, pointer_ndc: Vec2) -> Option<Vec3> {
        let inv = (self.projection() * self.view()).inverse();
        let clip = inv * pointer_ndc.extend(0.5).extend(1.0);
        if clip.w.abs() < f32::EPSILON {
            return None;
        }
        let on_screen = clip.xyz() / clip.w;
        let dir = (on_screen - self.position).normalize_or_zero();
        if dir.z.abs() < 1e-6 {
            return None;
        }
        let distance = -self.position.z / dir.z;
        let hit = self.position + dir * distance;
        hit.is_finite().then_some(hit)
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pointer_hits_origin_region() {
        let cam = OrbitCamera::new(CameraConfig::default(), 16.0 / 9.0);
        let hit = cam.pointer_on_plane(Vec2::ZERO).unwrap();
        assert!(hit.z.abs() < 1e-2);
        // Camera sits at y = 50 looking at the origin, so the center ray lands near it.
        assert!(hit.x.abs() < 1.0 && hit.y.abs() < 1.0, "hit {hit:?}");
    }

    #[test]
    fn test_orbit_converges_toward_ring() {
        let mut cam = OrbitCamera::new(CameraConfig::default(), 1.0);
        for frame in 0..400 {
            cam.update(frame as f32 * 0.01, Vec2::ZERO);
        }
        let flat = Vec2::new(cam.position.x, cam.position.z).length();
        assert!(flat > 480.0 && flat < 620.0, "radius {flat}");
        assert_eq!(cam.position.y, 50.0);
    }

    #[test]
    fn test_world_from_camera_maps_forward() {
        let cam = OrbitCamera::new(CameraConfig::default(), 1.0);
        let ahead = cam.world_from_camera().transform_point3(Vec3::new(0.0, 0.0, -100.0));
        let toward_origin = (Vec3::ZERO - cam.position).normalize();
        let got = (ahead - cam.position).normalize();
        assert!(got.abs_diff_eq(toward_origin, 1e-4));
    }

    #[test]
    fn test_bad_aspect_sanitized() {
        let cam = OrbitCamera::new(CameraConfig::default(), 0.0);
        assert!(cam.projection().is_finite());
    }
}
