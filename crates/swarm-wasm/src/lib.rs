mod bridge;
mod frame_loop;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

use swarm_core::config::StageConfig;
use swarm_core::perception::MountTicket;
use swarm_core::render::{InstanceBuffers, MeshGroup};
use swarm_core::shapes::glyph::LumaBitmap;
use swarm_core::shapes::{Mode, GLYPH_TEXT};
use swarm_core::stage::{AftermathStage, EYE_COUNT};

use bridge::{describe, JsAudio, JsDetector};
use frame_loop::FrameLoop;

const GLYPH_WIDTH: u32 = 600;
const GLYPH_HEIGHT: u32 = 300;
const GLYPH_FONT: &str = "900 200px Roboto, Arial, sans-serif";
/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const VIDEO_READY: u16 = 2;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already installed".into());
    }
}

struct WorldInner {
    stage: AftermathStage<JsDetector>,
    buffers: InstanceBuffers,
    video: Option<HtmlVideoElement>,
    on_advance: Option<Function>,
}

impl WorldInner {
    /// Run one frame. Returns whether the stage ended, plus the advance
    /// callback to fire once the world is no longer borrowed (JS may call
    /// straight back into it).
    fn frame(&mut self, now_ms: f64) -> (bool, Option<Function>) {
        let ready = self.video.as_ref().filter(|v| v.ready_state() >= VIDEO_READY);
        let ended = self.stage.frame(now_ms, ready, &mut self.buffers);
        (ended, ended.then(|| self.on_advance.clone()).flatten())
    }
}

fn fire(callback: Option<Function>) {
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            log::warn!("stage advance callback failed: {}", describe(&e));
        }
    }
}

#[wasm_bindgen]
pub struct AftermathWorld {
    inner: Rc<RefCell<WorldInner>>,
    frame_loop: Option<FrameLoop>,
}

#[wasm_bindgen]
impl AftermathWorld {
    /// `palette` holds `#rrggbb` strings (empty for the default); `icon_count`
    /// is the number of food icons the page can draw on carrier billboards.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        palette: Vec<String>,
        icon_count: usize,
        seed: Option<u32>,
    ) -> Result<AftermathWorld, JsValue> {
        let glyph = rasterize_glyph(GLYPH_TEXT).unwrap_or_else(|e| {
            log::warn!("glyph rasterization failed ({}), glyph mode collapses", describe(&e));
            LumaBitmap::blank(GLYPH_WIDTH as usize, GLYPH_HEIGHT as usize)
        });

        let config = StageConfig {
            palette,
            icon_count,
            seed: seed.map(u64::from),
            ..StageConfig::default()
        };
        let stage = AftermathStage::new(config, &glyph, width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut buffers = InstanceBuffers::new(stage.solver.particles.count, stage.bowl_count(), EYE_COUNT);
        stage.submit_static(&mut buffers);

        log::info!(
            "AftermathWorld created: {} particles, {} bowls",
            stage.solver.particles.count,
            stage.bowl_count()
        );

        Ok(AftermathWorld {
            inner: Rc::new(RefCell::new(WorldInner {
                stage,
                buffers,
                video: None,
                on_advance: None,
            })),
            frame_loop: None,
        })
    }

    // --- lifecycle ---

    /// Start a mount; pass the returned ticket to `attach_detectors` once the
    /// (async) detector creation finishes.
    #[wasm_bindgen]
    pub fn mount(&mut self) -> u32 {
        self.inner.borrow_mut().stage.mount().id()
    }

    /// Returns `false` (and closes both handles) if the world was unmounted
    /// or remounted while the detectors were being created.
    #[wasm_bindgen]
    pub fn attach_detectors(&mut self, ticket: u32, hand: JsValue, face: JsValue) -> bool {
        let ticket = MountTicket::from_id(ticket);
        let mut inner = self.inner.borrow_mut();
        let hand_ok = inner.stage.perception.attach_hand(ticket, JsDetector::new(hand));
        let face_ok = inner.stage.perception.attach_face(ticket, JsDetector::new(face));
        hand_ok && face_ok
    }

    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
        }
        let mut inner = self.inner.borrow_mut();
        inner.stage.unmount();
        inner.video = None;
        log::debug!("world unmounted");
    }

    #[wasm_bindgen]
    pub fn set_video(&mut self, video: HtmlVideoElement) {
        self.inner.borrow_mut().video = Some(video);
    }

    /// Drive frames from `requestAnimationFrame`; `on_frame` runs after each
    /// step so the page can upload buffers and draw.
    #[wasm_bindgen]
    pub fn start(&mut self, on_frame: Function) -> Result<(), JsValue> {
        if let Some(mut old) = self.frame_loop.take() {
            old.cancel();
        }
        let inner = self.inner.clone();
        self.frame_loop = Some(FrameLoop::start(move |now| {
            let (_, advance) = match inner.try_borrow_mut() {
                Ok(mut world) => world.frame(now),
                Err(_) => {
                    log::warn!("frame skipped: world busy");
                    return;
                }
            };
            if let Err(e) = on_frame.call1(&JsValue::NULL, &JsValue::from_f64(now)) {
                log::warn!("on_frame failed: {}", describe(&e));
            }
            fire(advance);
        })?);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.cancel();
        }
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(FrameLoop::is_running)
    }

    /// Step once by hand (when the page owns the loop). Returns whether the
    /// stage ended this frame.
    #[wasm_bindgen]
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let (ended, advance) = self.inner.borrow_mut().frame(now_ms);
        fire(advance);
        ended
    }

    // --- collaborators ---

    #[wasm_bindgen]
    pub fn set_audio(&mut self, play: Function) {
        self.inner.borrow_mut().stage.set_audio(Box::new(JsAudio::new(play)));
    }

    #[wasm_bindgen]
    pub fn on_advance(&mut self, callback: Function) {
        self.inner.borrow_mut().on_advance = Some(callback);
    }

    // --- controls ---

    #[wasm_bindgen]
    pub fn cycle_mode(&mut self) -> u8 {
        self.inner.borrow_mut().stage.cycle_mode() as u8
    }

    #[wasm_bindgen]
    pub fn set_mode(&mut self, mode: u8) {
        if let Some(mode) = Mode::from_u8(mode) {
            self.inner.borrow_mut().stage.set_mode(mode);
        }
    }

    #[wasm_bindgen]
    pub fn mode(&self) -> u8 {
        self.inner.borrow().stage.mode() as u8
    }

    #[wasm_bindgen]
    pub fn mode_name(&self) -> String {
        self.inner.borrow().stage.mode().name().to_string()
    }

    #[wasm_bindgen]
    pub fn trigger_transition(&mut self) -> bool {
        self.inner.borrow_mut().stage.trigger_transition()
    }

    #[wasm_bindgen]
    pub fn send_gift(&mut self) {
        self.inner.borrow_mut().stage.send_gift();
    }

    #[wasm_bindgen]
    pub fn click(&mut self) {
        self.inner.borrow_mut().stage.click();
    }

    /// Mouse fallback; ignored while a hand is tracked.
    #[wasm_bindgen]
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        self.inner.borrow_mut().stage.perception.pointer_moved(x, y)
    }

    #[wasm_bindgen]
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.inner.borrow_mut().stage.set_viewport(width, height);
    }

    #[wasm_bindgen]
    pub fn set_physics(
        &mut self,
        spring: f32,
        friction: f32,
        drop_friction: f32,
        repel_radius: f32,
        repel_strength: f32,
    ) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        let mut config = inner.stage.solver.config.clone();
        config.spring = spring;
        config.friction = friction;
        config.drop_friction = drop_friction;
        config.repel_radius = repel_radius;
        config.repel_strength = repel_strength;
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
        inner.stage.solver.config = config;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_perception_interval(&mut self, interval_ms: f64) {
        self.inner.borrow_mut().stage.perception.set_interval(interval_ms);
    }

    // --- control state readback (UI hit-testing lives in the page) ---

    #[wasm_bindgen]
    pub fn cursor_x(&self) -> f32 {
        self.inner.borrow().stage.control().cursor.x
    }

    #[wasm_bindgen]
    pub fn cursor_y(&self) -> f32 {
        self.inner.borrow().stage.control().cursor.y
    }

    #[wasm_bindgen]
    pub fn hand_present(&self) -> bool {
        self.inner.borrow().stage.control().hand_present
    }

    #[wasm_bindgen]
    pub fn fist(&self) -> bool {
        self.inner.borrow().stage.control().fist
    }

    /// `true` only on the frame the fist closed.
    #[wasm_bindgen]
    pub fn fist_pressed(&self) -> bool {
        self.inner.borrow().stage.control().fist_pressed
    }

    #[wasm_bindgen]
    pub fn pinch(&self) -> bool {
        self.inner.borrow().stage.control().pinch
    }

    #[wasm_bindgen]
    pub fn mouth_open(&self) -> f32 {
        self.inner.borrow().stage.control().mouth_open
    }

    #[wasm_bindgen]
    pub fn detectors_ready(&self) -> bool {
        self.inner.borrow().stage.perception.is_ready()
    }

    #[wasm_bindgen]
    pub fn phase(&self) -> u8 {
        self.inner.borrow().stage.cutscene().phase() as u8
    }

    #[wasm_bindgen]
    pub fn explosion(&self) -> f32 {
        self.inner.borrow().stage.explosion()
    }

    // --- buffers (views into wasm memory; re-read after memory growth) ---

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.inner.borrow().stage.solver.particles.count
    }

    #[wasm_bindgen]
    pub fn bowl_count(&self) -> usize {
        self.inner.borrow().stage.bowl_count()
    }

    /// Icon index per particle, `-1` for ornamentals.
    #[wasm_bindgen]
    pub fn carrier_icons(&self) -> Vec<i32> {
        self.inner
            .borrow()
            .stage
            .solver
            .particles
            .icon
            .iter()
            .map(|icon| icon.map_or(-1, |i| i as i32))
            .collect()
    }

    #[wasm_bindgen]
    pub fn get_instance_ptr(&self, group: u8) -> *const f32 {
        match MeshGroup::from_u8(group) {
            Some(g) => self.inner.borrow().buffers.group(g).instances.as_ptr() as *const f32,
            None => std::ptr::null(),
        }
    }

    /// Length in floats (16 per instance).
    #[wasm_bindgen]
    pub fn get_instance_len(&self, group: u8) -> usize {
        MeshGroup::from_u8(group).map_or(0, |g| self.inner.borrow().buffers.group(g).instances.len() * 16)
    }

    #[wasm_bindgen]
    pub fn get_color_ptr(&self, group: u8) -> *const f32 {
        match MeshGroup::from_u8(group) {
            Some(g) => self.inner.borrow().buffers.group(g).color_floats().as_ptr(),
            None => std::ptr::null(),
        }
    }

    #[wasm_bindgen]
    pub fn get_color_len(&self, group: u8) -> usize {
        MeshGroup::from_u8(group).map_or(0, |g| self.inner.borrow().buffers.group(g).color_floats().len())
    }

    #[wasm_bindgen]
    pub fn get_visible_ptr(&self, group: u8) -> *const u8 {
        match MeshGroup::from_u8(group) {
            Some(g) => self.inner.borrow().buffers.group(g).visible.as_ptr(),
            None => std::ptr::null(),
        }
    }

    #[wasm_bindgen]
    pub fn group_visible(&self, group: u8) -> bool {
        MeshGroup::from_u8(group).is_some_and(|g| self.inner.borrow().buffers.group(g).group_visible)
    }

    #[wasm_bindgen]
    pub fn get_billboard_ptr(&self) -> *const f32 {
        self.inner.borrow().buffers.billboards.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_billboard_len(&self) -> usize {
        self.inner.borrow().buffers.billboards.len() * 3
    }

    /// Column-major view matrix of the last submitted frame.
    #[wasm_bindgen]
    pub fn camera_view(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .buffers
            .camera
            .map(|c| c.view.to_cols_array().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn camera_projection(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .buffers
            .camera
            .map(|c| c.projection.to_cols_array().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn camera_position(&self) -> Vec<f32> {
        self.inner
            .borrow()
            .buffers
            .camera
            .map(|c| c.position.to_array().to_vec())
            .unwrap_or_default()
    }
}

/// Draw `text` white on black into an offscreen canvas and keep its red channel.
fn rasterize_glyph(text: &str) -> Result<LumaBitmap, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(GLYPH_WIDTH);
    canvas.set_height(GLYPH_HEIGHT);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    let (w, h) = (GLYPH_WIDTH as f64, GLYPH_HEIGHT as f64);
    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str("#fff");
    ctx.set_font(GLYPH_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(text, w * 0.5, h * 0.5)?;

    let pixels = ctx.get_image_data(0.0, 0.0, w, h)?.data();
    LumaBitmap::from_rgba(GLYPH_WIDTH as usize, GLYPH_HEIGHT as usize, &pixels).map_err(|e| JsValue::from_str(&e.to_string()))
}
