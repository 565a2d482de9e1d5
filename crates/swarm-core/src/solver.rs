use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SwarmConfig;
use crate::forces::explosion::radial_impulse;
use crate::forces::floor::{gravity_and_bounce, FloorParams};
use crate::forces::pointer::{repulsion, PointerParams};
use crate::math::damp;
use crate::particle::{ParticleSet, Role};
use crate::render::{InstanceTransform, MeshGroup, RenderSink};
use crate::shapes::{Mode, TargetSet};

/// Constants the per-particle update needs, snapshotted once per step.
#[derive(Clone, Copy, Debug)]
struct StepParams {
    dt: f32,
    spring: f32,
    drop_spring: f32,
    friction: f32,
    exploding: bool,
    explosion: f32,
    explosion_gain: f32,
    falling: bool,
    floor: FloorParams,
}

pub struct Solver {
    pub particles: ParticleSet,
    pub config: SwarmConfig,
    targets: TargetSet,
}

impl Solver {
    /// Start every particle on its `Chaos` target, at rest.
    pub fn new(config: SwarmConfig, targets: TargetSet) -> Self {
        let mut particles = ParticleSet::new(targets.particle_count(), config.carrier_stride);
        particles.place(targets.get(Mode::Chaos));
        Self {
            particles,
            config,
            targets,
        }
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    /// Advance every particle by `dt` frames toward `mode`'s targets.
    ///
    /// Per particle, in order: explosion impulse (replaces the spring and
    /// skips repulsion) or the `Drop` gravity/floor model or plain spring
    /// seeking; then pointer repulsion; then damping; then integration.
    pub fn step(&mut self, dt: f32, mode: Mode, pointer: &PointerParams, explosion: f32) {
        if dt <= 0.0 {
            return;
        }

        let c = &self.config;
        let falling = mode == Mode::Drop;
        let params = StepParams {
            dt,
            spring: c.spring,
            drop_spring: c.drop_spring,
            friction: damp(if falling { c.drop_friction } else { c.friction }, dt),
            exploding: explosion > c.explosion_threshold,
            explosion,
            explosion_gain: c.explosion_gain,
            falling,
            floor: FloorParams {
                gravity: c.gravity,
                floor_y: c.floor_y,
                restitution: c.restitution,
                drag: c.floor_drag,
                rest_speed: c.rest_speed,
            },
        };
        let targets = self.targets.get(mode);
        let pointer = *pointer;

        #[cfg(feature = "parallel")]
        {
            self.particles
                .position
                .par_iter_mut()
                .zip(self.particles.velocity.par_iter_mut())
                .zip(targets.par_iter())
                .for_each(|((pos, vel), target)| {
                    integrate_particle(pos, vel, *target, &pointer, &params);
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for ((pos, vel), target) in self
                .particles
                .position
                .iter_mut()
                .zip(self.particles.velocity.iter_mut())
                .zip(targets)
            {
                integrate_particle(pos, vel, *target, &pointer, &params);
            }
        }
    }

    /// Write every particle's transform into `sink`.
    ///
    /// Ornamentals breathe: uniform scale `base + sin(i + time) * amplitude`.
    /// Carriers only move their billboard.
    pub fn submit<S: RenderSink + ?Sized>(&self, time: f32, sink: &mut S) {
        let base = self.config.base_scale;
        let amplitude = self.config.breath_amplitude;
        for i in 0..self.particles.count {
            let pos = self.particles.position[i];
            match self.particles.role[i] {
                Role::Ornamental => {
                    let s = base + (i as f32 + time).sin() * amplitude;
                    sink.set_instance_transform(MeshGroup::Particles, i, &InstanceTransform::at(pos, s));
                }
                Role::Carrier => sink.set_billboard(i, pos),
            }
        }
    }

    /// Push static per-particle state: palette colors and hidden carrier slots.
    pub fn submit_static<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for i in 0..self.particles.count {
            match self.particles.role[i] {
                Role::Ornamental => sink.set_instance_color(MeshGroup::Particles, i, self.particles.color[i]),
                Role::Carrier => {
                    sink.set_instance_transform(MeshGroup::Particles, i, &InstanceTransform::HIDDEN);
                    sink.set_instance_visible(MeshGroup::Particles, i, false);
                }
            }
        }
    }
}

#[inline]
fn integrate_particle(pos: &mut Vec3, vel: &mut Vec3, target: Vec3, pointer: &PointerParams, p: &StepParams) {
    let dt = p.dt;

    if p.exploding {
        *vel += radial_impulse(*pos, p.explosion, p.explosion_gain) * dt;
    } else {
        if p.falling {
            gravity_and_bounce(pos, vel, &p.floor, dt);
            // Vertical is left to the bounce; only drift toward the splat footprint.
            vel.x += (target.x - pos.x) * p.drop_spring * dt;
            vel.z += (target.z - pos.z) * p.drop_spring * dt;
        } else {
            *vel += (target - *pos) * p.spring * dt;
        }
        *vel += repulsion(*pos, pointer) * dt;
    }

    *vel *= p.friction;
    *pos += *vel * dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::generate;
    use crate::shapes::glyph::LumaBitmap;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_solver(count: usize) -> Solver {
        let config = SwarmConfig {
            particle_count: count,
            anchor_count: 3,
            ..SwarmConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let targets = generate(&config, &LumaBitmap::blank(8, 8), &mut rng);
        Solver::new(config, targets)
    }

    #[test]
    fn test_starts_on_chaos_targets() {
        let solver = small_solver(20);
        for i in 0..20 {
            assert_eq!(solver.particles.position[i], solver.targets().get(Mode::Chaos)[i]);
            assert_eq!(solver.particles.velocity[i], Vec3::ZERO);
        }
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut solver = small_solver(5);
        let before = solver.particles.position.clone();
        solver.step(0.0, Mode::Heart, &PointerParams::default(), 0.0);
        assert_eq!(before, solver.particles.position);
    }

    #[test]
    fn test_spring_moves_toward_new_mode() {
        let mut solver = small_solver(10);
        let heart = solver.targets().get(Mode::Heart).to_vec();
        let before: f32 = (0..10).map(|i| solver.particles.position[i].distance(heart[i])).sum();
        for _ in 0..60 {
            solver.step(1.0, Mode::Heart, &PointerParams::default(), 0.0);
        }
        let after: f32 = (0..10).map(|i| solver.particles.position[i].distance(heart[i])).sum();
        assert!(after < before * 0.5, "before {before}, after {after}");
    }

    #[test]
    fn test_submit_skips_scale_for_carriers() {
        use crate::render::InstanceBuffers;
        let solver = small_solver(41);
        let mut buffers = InstanceBuffers::new(41, 0, 0);
        solver.submit_static(&mut buffers);
        solver.submit(0.0, &mut buffers);
        assert!(!buffers.is_visible(MeshGroup::Particles, 0));
        assert!(!buffers.is_visible(MeshGroup::Particles, 40));
        assert!(buffers.is_visible(MeshGroup::Particles, 1));
        let p0 = solver.particles.position[0];
        assert_eq!(buffers.billboards[0], p0.to_array());
        let t1 = buffers.transform(MeshGroup::Particles, 1).unwrap();
        let expected = 6.0 + (1.0f32).sin() * 3.0;
        assert!((t1.scale.x - expected).abs() < 1e-3);
    }
}
