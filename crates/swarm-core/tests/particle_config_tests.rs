use rand::rngs::StdRng;
use rand::SeedableRng;
use swarm_core::color::{build_palette, Rgb};
use swarm_core::config::{StageConfig, SwarmConfig};
use swarm_core::particle::{role_for, ParticleSet, Role};

#[test]
fn test_default_constants() {
    let c = SwarmConfig::default();
    assert_eq!(c.particle_count, 1500);
    assert_eq!(c.carrier_stride, 40);
    assert_eq!(c.anchor_count, 30);
    assert_eq!(c.spring, 0.02);
    assert_eq!(c.friction, 0.93);
    assert_eq!(c.drop_friction, 0.99);
    assert_eq!(c.restitution, 0.7);
    assert_eq!(c.explosion_threshold, 5.0);
}

#[test]
fn test_friction_out_of_range_rejected() {
    let c = SwarmConfig {
        friction: 1.5,
        ..SwarmConfig::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn test_every_kth_particle_is_a_carrier() {
    let set = ParticleSet::new(1500, 40);
    let carriers: Vec<usize> = set.carriers().collect();
    assert_eq!(carriers.len(), 38);
    assert!(carriers.iter().all(|i| i % 40 == 0));
    assert_eq!(role_for(80, 40), Role::Carrier);
    assert_eq!(role_for(81, 40), Role::Ornamental);
}

#[test]
fn test_paint_colors_ornamentals_only() {
    let mut set = ParticleSet::new(100, 10);
    let palette = build_palette(&["#22c55e"]).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    set.paint(&palette, 6, &mut rng);

    for i in 0..100 {
        match set.role[i] {
            Role::Carrier => {
                assert_eq!(set.color[i], Rgb::WHITE);
                assert!(set.icon[i].map_or(false, |icon| icon < 6));
            }
            Role::Ornamental => {
                assert_ne!(set.color[i], Rgb::WHITE);
                assert_eq!(set.icon[i], None);
            }
        }
    }
}

#[test]
fn test_no_icons_leaves_carriers_blank() {
    let mut set = ParticleSet::new(50, 5);
    let mut rng = StdRng::seed_from_u64(4);
    set.paint(&build_palette::<&str>(&[]).unwrap(), 0, &mut rng);
    assert!(set.icon.iter().all(Option::is_none));
}

#[test]
fn test_stage_config_defaults_are_consistent() {
    let c = StageConfig::default();
    assert!(c.swarm.validate().is_ok());
    assert_eq!(c.perception.hand_interval_ms, 60.0);
    assert_eq!(c.cutscene.fall_frames, 90);
    assert_eq!(c.camera.fov_y_degrees, 60.0);
    assert!(c.seed.is_none());
}
