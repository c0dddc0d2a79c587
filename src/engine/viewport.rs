use serde::{Deserialize, Serialize};

/// Host viewport in logical units plus device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Size in physical pixels, never zero on either axis.
    pub fn physical(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Collects resize notifications between ticks. Only the latest viewport is
/// kept, and it can be taken once.
#[derive(Clone, Debug, Default)]
pub struct ResizeTracker {
    pending: Option<Viewport>,
    notifications: u64,
}

impl ResizeTracker {
    pub fn notify(&mut self, viewport: Viewport) {
        self.pending = Some(viewport);
        self.notifications += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take(&mut self) -> Option<Viewport> {
        self.pending.take()
    }

    pub fn notifications(&self) -> u64 {
        self.notifications
    }
}
