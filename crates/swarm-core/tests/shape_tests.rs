use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use swarm_core::config::SwarmConfig;
use swarm_core::shapes::generators::{heart, heart_curve, volumetric_fill};
use swarm_core::shapes::glyph::LumaBitmap;
use swarm_core::shapes::{generate, Mode};

/// "GIO"-ish stand-in: a bright bar in the middle of a 600x300 bitmap.
fn bar_bitmap() -> LumaBitmap {
    let (w, h) = (600, 300);
    let mut data = vec![0u8; w * h];
    for y in 120..180 {
        for x in 100..500 {
            data[y * w + x] = 255;
        }
    }
    LumaBitmap::new(w, h, data).unwrap()
}

#[test]
fn test_every_mode_has_one_finite_target_per_particle() {
    let config = SwarmConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let targets = generate(&config, &bar_bitmap(), &mut rng);

    for mode in Mode::ALL {
        let points = targets.get(mode);
        assert_eq!(points.len(), config.particle_count, "{} has wrong length", mode.name());
        for (i, p) in points.iter().enumerate() {
            assert!(p.is_finite(), "{} target {} not finite: {:?}", mode.name(), i, p);
        }
    }
    assert_eq!(targets.anchors.len(), config.anchor_count);
}

#[test]
fn test_volumetric_mean_radius() {
    let mut rng = StdRng::seed_from_u64(7);
    let points = volumetric_fill(5000, 600.0, &mut rng);
    let mean = points.iter().map(|p| p.length()).sum::<f32>() / points.len() as f32;
    // uniform ball: E[r] = 3/4 R
    assert!((mean - 450.0).abs() < 12.0, "mean radius {} (expected ~450)", mean);
}

#[test]
fn test_heart_curve_landmarks() {
    let (x, y) = heart_curve(0.0);
    assert!(x.abs() < 1e-5);
    assert!((y - 5.0).abs() < 1e-4, "top notch at y={}", y);

    let (x, y) = heart_curve(std::f32::consts::PI);
    assert!(x.abs() < 1e-4);
    assert!((y + 17.0).abs() < 1e-4, "bottom tip at y={}", y);
}

#[test]
fn test_heart_depth_jitter_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    for p in heart(1000, 10.0, 40.0, &mut rng) {
        assert!(p.z.abs() <= 20.0, "depth {} out of range", p.z);
    }
}

#[test]
fn test_glyph_mode_lands_on_bright_pixels() {
    let config = SwarmConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    let targets = generate(&config, &bar_bitmap(), &mut rng);

    // bar spans x in [100, 500), y in [120, 180): centered and scaled by 1.5
    for p in targets.get(Mode::Glyph) {
        assert!(p.x >= -200.0 * 1.5 - 1e-3 && p.x < 200.0 * 1.5, "x {}", p.x);
        assert!(p.y > -30.0 * 1.5 - 1e-3 && p.y <= 30.0 * 1.5 + 1e-3, "y {}", p.y);
        assert!(p.z.abs() <= 5.0);
    }
}

#[test]
fn test_blank_glyph_collapses_to_origin() {
    let config = SwarmConfig {
        particle_count: 100,
        ..SwarmConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let targets = generate(&config, &LumaBitmap::blank(600, 300), &mut rng);
    assert!(targets.get(Mode::Glyph).iter().all(|p| *p == Vec3::ZERO));
}

#[test]
fn test_zero_anchors_dining_at_origin() {
    let config = SwarmConfig {
        particle_count: 50,
        anchor_count: 0,
        ..SwarmConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let targets = generate(&config, &LumaBitmap::blank(4, 4), &mut rng);
    assert_eq!(targets.get(Mode::Dining).len(), 50);
    assert!(targets.get(Mode::Dining).iter().all(|p| *p == Vec3::ZERO));
}

#[test]
fn test_mode_cycle_wraps() {
    let mut mode = Mode::Chaos;
    let mut seen = Vec::new();
    for _ in 0..5 {
        seen.push(mode);
        mode = mode.next();
    }
    assert_eq!(seen, Mode::ALL.to_vec());
    assert_eq!(mode, Mode::Chaos);
}
