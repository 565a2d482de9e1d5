use glam::Vec3;

use crate::error::SwarmError;

/// Tuning for the particle swarm: counts, shape extents and force constants.
///
/// All values are in scene units and per-frame rates (one display frame at
/// `dt == 1.0`).
#[derive(Clone, Debug, PartialEq)]
pub struct SwarmConfig {
    pub particle_count: usize,
    /// Every `carrier_stride`-th particle renders as an icon billboard.
    pub carrier_stride: usize,
    pub anchor_count: usize,

    pub chaos_radius: f32,
    pub drop_radius: f32,
    pub anchor_radius: f32,
    pub cluster_jitter: f32,
    pub cluster_height: f32,
    pub heart_scale: f32,
    pub heart_lift: f32,
    pub glyph_scale: f32,
    pub glyph_stride: usize,
    pub glyph_threshold: u8,

    pub spring: f32,
    pub friction: f32,
    pub drop_friction: f32,
    pub gravity: f32,
    pub floor_y: f32,
    pub restitution: f32,
    pub floor_drag: f32,
    pub rest_speed: f32,
    pub drop_spring: f32,

    pub repel_radius: f32,
    pub repel_strength: f32,

    pub explosion_threshold: f32,
    pub explosion_gain: f32,
    pub explosion_decay: f32,
    pub explosion_burst: f32,

    pub base_scale: f32,
    pub breath_amplitude: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particle_count: 1500,
            carrier_stride: 40,
            anchor_count: 30,

            chaos_radius: 600.0,
            drop_radius: 600.0,
            anchor_radius: 350.0,
            cluster_jitter: 35.0,
            cluster_height: 20.0,
            heart_scale: 10.0,
            heart_lift: 40.0,
            glyph_scale: 1.5,
            glyph_stride: 2,
            glyph_threshold: 128,

            spring: 0.02,
            friction: 0.93,
            drop_friction: 0.99,
            gravity: 2.0,
            floor_y: -250.0,
            restitution: 0.7,
            floor_drag: 0.95,
            rest_speed: 0.5,
            drop_spring: 0.0005,

            repel_radius: 160.0,
            repel_strength: 3.0,

            explosion_threshold: 5.0,
            explosion_gain: 0.8,
            explosion_decay: 0.95,
            explosion_burst: 200.0,

            base_scale: 6.0,
            breath_amplitude: 3.0,
        }
    }
}

impl SwarmConfig {
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.particle_count == 0 {
            return Err(SwarmError::InvalidConfig("particle_count must be > 0"));
        }
        if self.carrier_stride == 0 {
            return Err(SwarmError::InvalidConfig("carrier_stride must be > 0"));
        }
        if self.glyph_stride == 0 {
            return Err(SwarmError::InvalidConfig("glyph_stride must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.friction) || !(0.0..=1.0).contains(&self.drop_friction) {
            return Err(SwarmError::InvalidConfig("friction must be within [0, 1]"));
        }
        if self.repel_radius <= 0.0 {
            return Err(SwarmError::InvalidConfig("repel_radius must be positive"));
        }
        Ok(())
    }
}

/// Landmark polling and control-signal smoothing.
#[derive(Clone, Debug, PartialEq)]
pub struct PerceptionConfig {
    pub hand_interval_ms: f64,
    pub face_interval_ms: f64,
    /// Low-pass factor applied to the cursor each fresh detection.
    pub cursor_smoothing: f32,
    pub jaw_smoothing: f32,
    pub pinch_distance: f32,
    pub gaze_offset_scale: f32,
    pub gaze_rotation_scale: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            hand_interval_ms: 60.0,
            face_interval_ms: 60.0,
            cursor_smoothing: 0.3,
            jaw_smoothing: 0.3,
            pinch_distance: 0.1,
            gaze_offset_scale: 60.0,
            gaze_rotation_scale: 0.5,
        }
    }
}

/// Physics of the two camera-attached eyes and their tethers.
#[derive(Clone, Debug, PartialEq)]
pub struct CutsceneConfig {
    pub eye_start: [Vec3; 2],
    /// Rest point of each eye in camera space (x, y); depth is `rest_depth`.
    pub eye_anchor: [[f32; 2]; 2],
    pub rest_depth: f32,
    pub idle_spring: f32,
    pub idle_gravity: f32,
    pub idle_floor: f32,
    pub idle_restitution: f32,
    pub idle_damping: f32,
    pub idle_relax: f32,

    pub fall_gravity: f32,
    pub fall_floor: f32,
    pub fall_restitution: f32,
    pub stretch_per_speed: f32,
    pub max_stretch: f32,
    pub squash: [f32; 2],
    pub lateral_kick: f32,
    pub lateral_damping: f32,
    pub fall_relax: f32,
    pub impact_cue_speed: f32,
    pub fall_frames: u32,

    pub tether_top: f32,
    pub tether_thin_length: f32,
    pub tether_min_width: f32,
    pub tether_snap: f32,

    pub fly_speed: f32,
    pub fly_wobble: f32,
    pub fly_spin: f32,
    pub fly_relax: f32,
    pub exit_depth: f32,
}

impl Default for CutsceneConfig {
    fn default() -> Self {
        Self {
            eye_start: [Vec3::new(-50.0, 50.0, -200.0), Vec3::new(50.0, 50.0, -200.0)],
            eye_anchor: [[-50.0, 80.0], [50.0, 80.0]],
            rest_depth: -250.0,
            idle_spring: 0.05,
            idle_gravity: 2.0,
            idle_floor: -150.0,
            idle_restitution: 0.5,
            idle_damping: 0.90,
            idle_relax: 0.2,

            fall_gravity: 1.8,
            fall_floor: -250.0,
            fall_restitution: 0.75,
            stretch_per_speed: 0.04,
            max_stretch: 0.8,
            squash: [1.4, 0.5],
            lateral_kick: 10.0,
            lateral_damping: 0.98,
            fall_relax: 0.15,
            impact_cue_speed: 10.0,
            fall_frames: 90,

            tether_top: 400.0,
            tether_thin_length: 800.0,
            tether_min_width: 0.2,
            tether_snap: 900.0,

            fly_speed: 30.0,
            fly_wobble: 5.0,
            fly_spin: 0.3,
            fly_relax: 0.1,
            exit_depth: 150.0,
        }
    }
}

/// Orbiting perspective camera.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub start: Vec3,
    pub orbit_radius: f32,
    pub orbit_sway: f32,
    pub orbit_rate: f32,
    pub pointer_yaw: f32,
    pub follow: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 3000.0,
            start: Vec3::new(0.0, 50.0, 600.0),
            orbit_radius: 550.0,
            orbit_sway: 50.0,
            orbit_rate: 0.2,
            pointer_yaw: 0.5,
            follow: 0.05,
        }
    }
}

/// Everything a stage needs at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    pub swarm: SwarmConfig,
    pub perception: PerceptionConfig,
    pub cutscene: CutsceneConfig,
    pub camera: CameraConfig,
    /// `#rrggbb` colors for ornamental particles; empty uses the built-in palette.
    pub palette: Vec<String>,
    /// Number of food icons the host can draw on carrier billboards.
    pub icon_count: usize,
    /// Fixed seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            swarm: SwarmConfig::default(),
            perception: PerceptionConfig::default(),
            cutscene: CutsceneConfig::default(),
            camera: CameraConfig::default(),
            palette: Vec::new(),
            icon_count: 0,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_particles_rejected() {
        let config = SwarmConfig {
            particle_count: 0,
            ..SwarmConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_carrier_stride_rejected() {
        let config = SwarmConfig {
            carrier_stride: 0,
            ..SwarmConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
