use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type Tick = Closure<dyn FnMut(f64)>;

/// A self-rescheduling `requestAnimationFrame` loop.
///
/// [`cancel`](Self::cancel) (or drop) revokes the pending frame and stops the
/// loop from rescheduling, even when called from inside a tick.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Tick>>>,
}

impl FrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let tick: Rc<RefCell<Option<Tick>>> = Rc::new(RefCell::new(None));

        let alive = running.clone();
        let rescheduled = pending.clone();
        let this = Rc::downgrade(&tick);
        *tick.borrow_mut() = Some(Closure::new(move |now: f64| {
            rescheduled.set(None);
            if !alive.get() {
                return;
            }
            on_frame(now);
            if !alive.get() {
                return;
            }
            let Some(tick) = this.upgrade() else { return };
            let next = tick.borrow().as_ref().map(request_frame);
            match next {
                Some(Ok(id)) => rescheduled.set(Some(id)),
                Some(Err(e)) => log::error!("requestAnimationFrame failed: {e:?}"),
                None => {}
            }
        }));

        let first = match tick.borrow().as_ref() {
            Some(closure) => request_frame(closure)?,
            None => return Err(JsValue::from_str("frame closure missing")),
        };
        pending.set(Some(first));
        log::debug!("frame loop started");
        Ok(Self { running, pending, tick })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn cancel(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(id) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {e:?}");
                }
            }
        }
        log::debug!("frame loop cancelled");
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        self.tick.borrow_mut().take();
    }
}

fn request_frame(closure: &Tick) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(closure.as_ref().unchecked_ref())
}
