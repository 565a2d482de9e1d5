use super::landmarks::{DetectionResult, LandmarkDetector};
use super::slot::{DetectorSlot, MountTicket};

/// Outcome of a poll that produced a usable result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Poll<'a> {
    /// The detector ran this call.
    Fresh(&'a DetectionResult),
    /// Too soon since the last run; this is the previous result.
    Cached(&'a DetectionResult),
}

impl<'a> Poll<'a> {
    pub fn result(self) -> &'a DetectionResult {
        match self {
            Poll::Fresh(r) | Poll::Cached(r) => r,
        }
    }

    pub fn is_fresh(self) -> bool {
        matches!(self, Poll::Fresh(_))
    }
}

/// Rate-limits an expensive detector against wall-clock time.
///
/// The render loop can call [`poll`](Self::poll) every frame; the detector
/// itself runs at most once per `interval_ms` no matter the frame rate.
pub struct ThrottledDetector<D: LandmarkDetector> {
    slot: DetectorSlot<D>,
    interval_ms: f64,
    last_run_ms: Option<f64>,
    cached: Option<DetectionResult>,
}

impl<D: LandmarkDetector> ThrottledDetector<D> {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            slot: DetectorSlot::new(),
            interval_ms: interval_ms.max(0.0),
            last_run_ms: None,
            cached: None,
        }
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(0.0);
    }

    pub fn mount(&mut self) -> MountTicket {
        self.cached = None;
        self.last_run_ms = None;
        self.slot.mount()
    }

    pub fn attach(&mut self, ticket: MountTicket, detector: D) -> bool {
        self.slot.attach(ticket, detector)
    }

    pub fn unmount(&mut self) {
        self.slot.unmount();
        self.cached = None;
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    /// Run the detector if the interval has elapsed, otherwise return the cache.
    ///
    /// `None` means nothing usable: no detector yet, nothing cached yet, or
    /// the detector just failed (the failure is logged and retried at the
    /// next eligible interval).
    pub fn poll(&mut self, frame: &D::Frame, now_ms: f64) -> Option<Poll<'_>> {
        let due = match self.last_run_ms {
            Some(last) => now_ms - last > self.interval_ms,
            None => true,
        };

        if due {
            if let Some(detector) = self.slot.get_mut() {
                self.last_run_ms = Some(now_ms);
                match detector.detect_for_video(frame, now_ms) {
                    Ok(result) => {
                        self.cached = Some(result);
                        return self.cached.as_ref().map(Poll::Fresh);
                    }
                    Err(err) => {
                        log::warn!("landmark detection failed: {err}");
                        return None;
                    }
                }
            }
        }

        self.cached.as_ref().map(Poll::Cached)
    }
}
