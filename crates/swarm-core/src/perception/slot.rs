//! Mount-scoped ownership of a detector handle.
//!
//! Detectors are created asynchronously by the host. By the time creation
//! finishes, the stage that asked for them may already be gone, so every
//! creation carries the [`MountTicket`] it was started under and the slot only
//! accepts handles for the live mount. Anything else is closed on the spot.

use super::landmarks::LandmarkDetector;

/// Proof of which mount a detector creation was started for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountTicket(u32);

impl MountTicket {
    pub fn id(self) -> u32 {
        self.0
    }

    pub fn from_id(id: u32) -> Self {
        MountTicket(id)
    }
}

pub struct DetectorSlot<D: LandmarkDetector> {
    generation: u32,
    mounted: bool,
    detector: Option<D>,
}

impl<D: LandmarkDetector> Default for DetectorSlot<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: LandmarkDetector> DetectorSlot<D> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            mounted: false,
            detector: None,
        }
    }

    /// Start a new mount. Tickets from earlier mounts stop being accepted.
    pub fn mount(&mut self) -> MountTicket {
        self.release();
        self.generation = self.generation.wrapping_add(1);
        self.mounted = true;
        MountTicket(self.generation)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Commit a freshly created detector.
    ///
    /// Returns `false` (and closes `detector`) when the slot was unmounted or
    /// remounted since `ticket` was issued.
    pub fn attach(&mut self, ticket: MountTicket, mut detector: D) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            log::debug!(
                "discarding detector for stale mount {} (current {}, mounted {})",
                ticket.0,
                self.generation,
                self.mounted
            );
            detector.close();
            return false;
        }
        self.release();
        self.detector = Some(detector);
        true
    }

    /// Tear down: close the handle and refuse late arrivals.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.release();
    }

    pub fn get_mut(&mut self) -> Option<&mut D> {
        self.detector.as_mut()
    }

    pub fn is_ready(&self) -> bool {
        self.detector.is_some()
    }

    fn release(&mut self) {
        if let Some(mut d) = self.detector.take() {
            d.close();
        }
    }
}

impl<D: LandmarkDetector> Drop for DetectorSlot<D> {
    fn drop(&mut self) {
        self.release();
    }
}
