//! Target configurations the swarm morphs between.
//!
//! All five point clouds are generated once at stage start and never change
//! afterwards; the integrator only reads them.
pub mod generators;
pub mod glyph;

use glam::Vec3;
use rand::Rng;

use crate::config::SwarmConfig;
use generators::{cluster_anchors, clustered_packing, disk_scatter, heart, volumetric_fill};
use glyph::{sample_glyph, LumaBitmap};

/// Text the glyph mode spells out.
pub const GLYPH_TEXT: &str = "GIO";

/// Named target configuration.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Mode {
    Chaos  = 0, // Volumetric cloud
    Drop   = 1, // Splattered on the floor, gravity driven
    Dining = 2, // Piles around the bowls
    Heart  = 3,
    Glyph  = 4, // Rasterized text
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Chaos, Mode::Drop, Mode::Dining, Mode::Heart, Mode::Glyph];

    /// Next mode in the cycle, wrapping back to `Chaos`.
    pub fn next(self) -> Mode {
        Mode::ALL[(self as usize + 1) % Mode::ALL.len()]
    }

    pub fn from_u8(value: u8) -> Option<Mode> {
        Mode::ALL.get(value as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Chaos => "CHAOS",
            Mode::Drop => "DROP",
            Mode::Dining => "DINING",
            Mode::Heart => "HEART",
            Mode::Glyph => "GIO",
        }
    }
}

/// Precomputed targets for every mode plus the Dining cluster anchors.
pub struct TargetSet {
    targets: [Vec<Vec3>; 5],
    pub anchors: Vec<Vec3>,
}

impl TargetSet {
    #[inline]
    pub fn get(&self, mode: Mode) -> &[Vec3] {
        &self.targets[mode as usize]
    }

    pub fn particle_count(&self) -> usize {
        self.targets[0].len()
    }
}

/// Build every target configuration for `config.particle_count` particles.
///
/// `glyph` is the rasterized [`GLYPH_TEXT`]; a blank bitmap is allowed and
/// collapses the glyph mode to the origin.
pub fn generate<R: Rng + ?Sized>(config: &SwarmConfig, glyph: &LumaBitmap, rng: &mut R) -> TargetSet {
    let n = config.particle_count;

    let chaos = volumetric_fill(n, config.chaos_radius, rng);
    let drop = disk_scatter(n, config.drop_radius, config.floor_y, rng);
    let anchors = cluster_anchors(config.anchor_count, config.anchor_radius, rng);
    let dining = clustered_packing(n, &anchors, config.cluster_jitter, config.cluster_height, rng);
    let heart = heart(n, config.heart_scale, config.heart_lift, rng);
    let glyph = sample_glyph(
        n,
        glyph,
        config.glyph_stride,
        config.glyph_threshold,
        config.glyph_scale,
        rng,
    );

    log::debug!("generated {} targets per mode, {} anchors", n, anchors.len());

    TargetSet {
        targets: [chaos, drop, dining, heart, glyph],
        anchors,
    }
}
