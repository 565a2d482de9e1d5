//! Procedural point-cloud generators, one per swarm mode.
//!
//! Each takes a particle count plus an RNG and returns exactly `count`
//! points. Units are scene units (the camera orbits at ~550).

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Uniform point inside a ball of `radius`.
///
/// Uses `cbrt(u)` radial scaling so density is uniform through the volume
/// rather than piling up near the center.
pub fn random_in_ball<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Uniform volumetric fill of a ball.
pub fn volumetric_fill<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count).map(|_| random_in_ball(rng, radius)).collect()
}

/// Uniform scatter over a horizontal disk at height `y`.
pub fn disk_scatter<R: Rng + ?Sized>(count: usize, radius: f32, y: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let angle = rng.gen::<f32>() * TAU;
            let r = rng.gen::<f32>().sqrt() * radius;
            Vec3::new(angle.cos() * r, y, angle.sin() * r)
        })
        .collect()
}

/// Pick `count` cluster anchors uniformly inside a ball.
pub fn cluster_anchors<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> Vec<Vec3> {
    volumetric_fill(count, radius, rng)
}

/// Round-robin particles over `anchors`, scattered in a small flat disk
/// (`jitter` radius) and lifted up to `height` above each anchor.
///
/// With no anchors every particle sits at the origin.
pub fn clustered_packing<R: Rng + ?Sized>(
    count: usize,
    anchors: &[Vec3],
    jitter: f32,
    height: f32,
    rng: &mut R,
) -> Vec<Vec3> {
    if anchors.is_empty() {
        return vec![Vec3::ZERO; count];
    }
    (0..count)
        .map(|i| {
            let center = anchors[i % anchors.len()];
            let r = rng.gen::<f32>() * jitter;
            let theta = rng.gen::<f32>() * TAU;
            Vec3::new(
                center.x + r * theta.cos(),
                center.y + rng.gen::<f32>() * height,
                center.z + r * theta.sin(),
            )
        })
        .collect()
}

/// Classic heart curve at parameter `t` (unscaled, roughly 32 wide).
pub fn heart_curve(t: f32) -> (f32, f32) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x, y)
}

/// Heart outline thickened with random offsets and a little depth.
pub fn heart<R: Rng + ?Sized>(count: usize, scale: f32, lift: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let t = rng.gen::<f32>() * TAU;
            let (x, y) = heart_curve(t);
            let thickness = 8.0 + rng.gen::<f32>() * 8.0;
            Vec3::new(
                x * scale + (rng.gen::<f32>() - 0.5) * thickness,
                y * scale + (rng.gen::<f32>() - 0.5) * thickness + lift,
                (rng.gen::<f32>() - 0.5) * 40.0,
            )
        })
        .collect()
}
