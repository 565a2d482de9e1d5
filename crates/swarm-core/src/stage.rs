//! The Aftermath stage: one object owning everything a frame touches.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{AudioSink, Cue, SilentAudio};
use crate::bowls::BowlAnimator;
use crate::camera::OrbitCamera;
use crate::color::build_palette;
use crate::config::StageConfig;
use crate::error::SwarmError;
use crate::forces::explosion::Explosion;
use crate::forces::pointer::PointerParams;
use crate::perception::{ControlState, LandmarkDetector, MountTicket, PerceptionAdapter};
use crate::render::{MeshGroup, RenderSink};
use crate::shapes::glyph::LumaBitmap;
use crate::shapes::{generate, Mode, TargetSet};
use crate::solver::Solver;
use crate::transition::{Cutscene, Phase};

/// Global animation clock increment per frame.
pub const TIME_STEP: f32 = 0.01;
/// Instance slots the host must allocate for eyes (and tethers).
pub const EYE_COUNT: usize = 2;

pub struct AftermathStage<D: LandmarkDetector> {
    pub solver: Solver,
    pub perception: PerceptionAdapter<D>,
    pub camera: OrbitCamera,
    bowls: BowlAnimator,
    cutscene: Cutscene,
    explosion: Explosion,
    mode: Mode,
    time: f32,
    rng: StdRng,
    audio: Box<dyn AudioSink>,
    on_advance: Option<Box<dyn FnMut()>>,
}

impl<D: LandmarkDetector> AftermathStage<D> {
    /// Generate targets, paint the swarm and place it on the `Chaos` cloud.
    ///
    /// `glyph` is the host-rasterized text bitmap; `width`/`height` the
    /// viewport in pixels.
    pub fn new(config: StageConfig, glyph: &LumaBitmap, width: f32, height: f32) -> Result<Self, SwarmError> {
        config.swarm.validate()?;
        let palette = build_palette(&config.palette)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let targets: TargetSet = generate(&config.swarm, glyph, &mut rng);
        let explosion = Explosion::new(config.swarm.explosion_threshold, config.swarm.explosion_decay);
        let mut solver = Solver::new(config.swarm, targets);
        solver.particles.paint(&palette, config.icon_count, &mut rng);

        log::debug!(
            "aftermath stage: {} particles, {} carriers, {} bowls",
            solver.particles.count,
            solver.particles.carriers().count(),
            solver.targets().anchors.len()
        );

        Ok(Self {
            solver,
            perception: PerceptionAdapter::new(config.perception, width, height),
            camera: OrbitCamera::new(config.camera, width / height.max(1.0)),
            bowls: BowlAnimator::new(),
            cutscene: Cutscene::new(config.cutscene),
            explosion,
            mode: Mode::Chaos,
            time: 0.0,
            rng,
            audio: Box::new(SilentAudio),
            on_advance: None,
        })
    }

    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = audio;
    }

    /// Called once, on the frame the cutscene finishes.
    pub fn on_advance(&mut self, callback: impl FnMut() + 'static) {
        self.on_advance = Some(Box::new(callback));
    }

    pub fn mount(&mut self) -> MountTicket {
        self.perception.mount()
    }

    pub fn unmount(&mut self) {
        self.perception.unmount();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn control(&self) -> &ControlState {
        &self.perception.control
    }

    pub fn cutscene(&self) -> &Cutscene {
        &self.cutscene
    }

    pub fn bowls(&self) -> &BowlAnimator {
        &self.bowls
    }

    pub fn explosion(&self) -> f32 {
        self.explosion.magnitude
    }

    /// Number of bowl instances the host must allocate.
    pub fn bowl_count(&self) -> usize {
        self.solver.targets().anchors.len()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.perception.set_viewport(width, height);
        self.camera.set_aspect(width / height.max(1.0));
    }

    pub fn cycle_mode(&mut self) -> Mode {
        self.mode = self.mode.next();
        self.audio.play(Cue::Switch);
        log::debug!("mode -> {}", self.mode.name());
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Start the ending cutscene. No-op once it has started.
    pub fn trigger_transition(&mut self) -> bool {
        if !self.cutscene.trigger(&mut self.audio) {
            return false;
        }
        self.explosion.trigger(self.solver.config.explosion_burst);
        true
    }

    pub fn send_gift(&mut self) {
        self.audio.play(Cue::Gift);
    }

    pub fn click(&mut self) {
        self.audio.play(Cue::Click);
    }

    /// Colors and hidden carrier slots. Push once after creating the sink.
    pub fn submit_static<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        self.solver.submit_static(sink);
        sink.set_group_visible(MeshGroup::Bowls, false);
    }

    /// Run one display frame.
    ///
    /// Order is fixed: perception, explosion/camera/physics, bowls and
    /// cutscene, render submit. Returns `true` on the frame the stage ends.
    pub fn frame<S: RenderSink + ?Sized>(&mut self, now_ms: f64, video: Option<&D::Frame>, sink: &mut S) -> bool {
        self.time += TIME_STEP;

        match video {
            Some(frame) => self.perception.poll(frame, now_ms),
            None => self.perception.control.begin_frame(),
        }
        let pointer_ndc = self.perception.control.pointer_ndc;
        let gaze = self.perception.control.gaze;

        self.explosion.decay();
        self.camera.update(self.time, pointer_ndc);
        let config = &self.solver.config;
        let pointer = match self.camera.pointer_on_plane(pointer_ndc) {
            Some(at) => PointerParams::at(at, config.repel_strength, config.repel_radius),
            None => PointerParams::default(),
        };
        self.solver.step(1.0, self.mode, &pointer, self.explosion.magnitude);

        self.bowls.update(self.mode);
        let advanced = self.cutscene.update(&gaze, &mut self.rng, &mut self.audio);
        if advanced {
            if let Some(callback) = self.on_advance.as_mut() {
                callback();
            }
        }

        sink.set_camera(&self.camera.pose());
        self.solver.submit(self.time, sink);
        self.bowls.submit(&self.solver.targets().anchors, self.time, sink);
        self.cutscene.submit(&self.camera.world_from_camera(), sink);

        advanced
    }

    pub fn is_finished(&self) -> bool {
        self.cutscene.phase() == Phase::Flying && self.cutscene.has_advanced()
    }
}
