//! The "eyes" cutscene that ends the stage.
//!
//! Two eye bodies hang from tethers in camera-local space. On trigger they
//! drop, bounce on a floor, snap their tethers and then fly at the camera;
//! once the first eye passes the camera the stage-advance signal fires.
//! Phases only move forward: `Idle → Falling → Bouncing → Flying`.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::Rng;

use crate::audio::{AudioSink, Cue};
use crate::config::CutsceneConfig;
use crate::math::approach;
use crate::perception::Gaze;
use crate::render::{InstanceTransform, MeshGroup, RenderSink};

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle     = 0,
    Falling  = 1,
    Bouncing = 2,
    Flying   = 3,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Falling => "falling",
            Phase::Bouncing => "bouncing",
            Phase::Flying => "flying",
        }
    }
}

/// One eye: camera-local position and velocity, squash/stretch, orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// x is shared by x and z; y is the vertical stretch.
    pub scale: Vec2,
    /// Euler angles (XYZ order), radians.
    pub rotation: Vec3,
    pub anchor: Vec2,
}

impl EyeBody {
    pub fn new(position: Vec3, anchor: Vec2) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            scale: Vec2::ONE,
            rotation: Vec3::ZERO,
            anchor,
        }
    }

    fn relax_scale(&mut self, rate: f32) {
        self.scale.x = approach(self.scale.x, 1.0, rate);
        self.scale.y = approach(self.scale.y, 1.0, rate);
    }

    pub fn transform(&self) -> InstanceTransform {
        InstanceTransform::new(
            self.position,
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            Vec3::new(self.scale.x, self.scale.y, self.scale.x),
        )
    }
}

/// A unit-height cylinder stretched from a fixed top point down to an eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tether {
    pub start: Vec3,
    pub end: Vec3,
    pub length: f32,
    pub width: f32,
    pub snapped: bool,
}

impl Tether {
    fn new(start: Vec3, end: Vec3) -> Self {
        let mut tether = Self {
            start,
            end,
            length: 0.0,
            width: 1.0,
            snapped: false,
        };
        tether.span(end, 1.0, 0.0);
        tether
    }

    fn span(&mut self, end: Vec3, width: f32, slack: f32) {
        self.end = end;
        self.length = self.start.distance(end) + slack;
        self.width = width;
    }

    pub fn transform(&self) -> InstanceTransform {
        let dir = (self.end - self.start).normalize_or_zero();
        let rotation = if dir == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(Vec3::Y, dir)
        };
        InstanceTransform::new(
            (self.start + self.end) * 0.5,
            rotation,
            Vec3::new(self.width, self.length, self.width),
        )
    }
}

pub struct Cutscene {
    pub config: CutsceneConfig,
    phase: Phase,
    counter: u32,
    eyes: [EyeBody; 2],
    tethers: [Tether; 2],
    advanced: bool,
}

impl Cutscene {
    pub fn new(config: CutsceneConfig) -> Self {
        let eyes = [0, 1].map(|i| EyeBody::new(config.eye_start[i], Vec2::from(config.eye_anchor[i])));
        let tethers = [0, 1].map(|i| Tether::new(tether_top(&config, &eyes[i]), eyes[i].position));
        Self {
            config,
            phase: Phase::Idle,
            counter: 0,
            eyes,
            tethers,
            advanced: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn eyes(&self) -> &[EyeBody; 2] {
        &self.eyes
    }

    pub fn tethers(&self) -> &[Tether; 2] {
        &self.tethers
    }

    /// Whether the stage-advance signal has already fired.
    pub fn has_advanced(&self) -> bool {
        self.advanced
    }

    /// Start the fall. Only honoured from `Idle`; returns whether it started,
    /// in which case the caller owes the swarm its explosion.
    pub fn trigger<A: AudioSink + ?Sized>(&mut self, audio: &mut A) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.enter(Phase::Falling);
        audio.play(Cue::Explosion);
        true
    }

    /// Advance one frame. Returns `true` on the single frame the stage should advance.
    pub fn update<R: Rng + ?Sized, A: AudioSink + ?Sized>(&mut self, gaze: &Gaze, rng: &mut R, audio: &mut A) -> bool {
        if self.phase == Phase::Idle {
            self.update_idle(gaze);
            return false;
        }

        self.counter += 1;

        if matches!(self.phase, Phase::Falling | Phase::Bouncing) {
            self.update_falling(rng, audio);
            if self.counter > self.config.fall_frames {
                self.enter(Phase::Flying);
            }
        }

        if self.phase == Phase::Flying {
            return self.update_flying();
        }
        false
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("cutscene {} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
        self.counter = 0;
    }

    fn update_idle(&mut self, gaze: &Gaze) {
        let c = &self.config;
        for (eye, tether) in self.eyes.iter_mut().zip(self.tethers.iter_mut()) {
            let goal = Vec3::new(eye.anchor.x + gaze.offset.x, eye.anchor.y + gaze.offset.y, c.rest_depth);
            eye.velocity += (goal - eye.position) * c.idle_spring;
            eye.velocity.y -= c.idle_gravity;

            if eye.position.y < c.idle_floor {
                eye.position.y = c.idle_floor;
                eye.velocity.y *= -c.idle_restitution;
            }

            eye.velocity *= c.idle_damping;
            eye.position += eye.velocity;
            eye.relax_scale(c.idle_relax);
            eye.rotation.x = gaze.rotation.x;
            eye.rotation.y = gaze.rotation.y;

            tether.span(eye.position, 1.0, 5.0);
        }
    }

    fn update_falling<R: Rng + ?Sized, A: AudioSink + ?Sized>(&mut self, rng: &mut R, audio: &mut A) {
        let c = &self.config;
        let mut touched = false;

        for (i, (eye, tether)) in self.eyes.iter_mut().zip(self.tethers.iter_mut()).enumerate() {
            eye.velocity.y -= c.fall_gravity;
            eye.position.y += eye.velocity.y;

            let speed = eye.velocity.y.abs();
            eye.scale.y = 1.0 + (speed * c.stretch_per_speed).min(c.max_stretch);
            eye.scale.x = 1.0 / eye.scale.y.sqrt();

            if eye.position.y < c.fall_floor {
                eye.position.y = c.fall_floor;
                eye.velocity.y *= -c.fall_restitution;
                eye.scale = Vec2::from(c.squash);
                eye.velocity.x += (rng.gen::<f32>() - 0.5) * c.lateral_kick;
                touched = true;
                if i == 0 && speed > c.impact_cue_speed {
                    audio.play(Cue::Catch);
                }
            }

            eye.position.x += eye.velocity.x;
            eye.velocity.x *= c.lateral_damping;
            eye.relax_scale(c.fall_relax);

            if !tether.snapped {
                let d = tether.start.distance(eye.position);
                if d > c.tether_snap {
                    log::debug!("tether {i} snapped at {d:.0}");
                    tether.snapped = true;
                } else {
                    tether.span(eye.position, (1.0 - d / c.tether_thin_length).max(c.tether_min_width), 0.0);
                }
            }
        }

        if touched && self.phase == Phase::Falling {
            // Keep the running frame count; only the phase label changes.
            log::info!("cutscene falling -> bouncing");
            self.phase = Phase::Bouncing;
        }
    }

    fn update_flying(&mut self) -> bool {
        let c = &self.config;
        let wobble = (self.counter as f32 * 0.5).sin() * c.fly_wobble;
        for eye in &mut self.eyes {
            eye.position.z += c.fly_speed;
            eye.position.y += wobble;
            eye.relax_scale(c.fly_relax);
            eye.rotation.z += c.fly_spin;
        }

        if self.eyes[0].position.z > c.exit_depth && !self.advanced {
            self.advanced = true;
            log::info!("cutscene finished after eye passed the camera");
            return true;
        }
        false
    }

    /// Push eyes and tethers, composed with the camera's world transform.
    pub fn submit<S: RenderSink + ?Sized>(&self, world_from_camera: &Mat4, sink: &mut S) {
        for (i, (eye, tether)) in self.eyes.iter().zip(&self.tethers).enumerate() {
            sink.set_instance_transform(MeshGroup::Eyes, i, &eye.transform().in_frame(world_from_camera));
            if tether.snapped {
                sink.set_instance_visible(MeshGroup::Tethers, i, false);
            } else {
                sink.set_instance_visible(MeshGroup::Tethers, i, true);
                sink.set_instance_transform(MeshGroup::Tethers, i, &tether.transform().in_frame(world_from_camera));
            }
        }
    }
}

fn tether_top(config: &CutsceneConfig, eye: &EyeBody) -> Vec3 {
    Vec3::new(eye.anchor.x, config.tether_top, config.rest_depth)
}
