//! Host-facing intersection watcher abstraction.
//!
//! A host (browser bridge, desktop layout pass, test double) implements
//! [`IntersectionSource`]. Every `observe` call hands back a
//! [`WatchRegistration`]; dropping the registration disconnects the watcher.

use std::fmt;
use std::rc::Rc;

/// One report from a watcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Visible fraction of the watched element, `0.0..=1.0`.
    pub ratio: f32,
    /// Whether the ratio meets the watcher's threshold.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(ratio: f32, threshold: f32) -> Self {
        Self {
            ratio,
            is_intersecting: meets_threshold(ratio, threshold),
        }
    }
}

/// Threshold rule shared by all sources: a threshold of zero means "any
/// visible part", anything else must be reached or exceeded.
pub fn meets_threshold(ratio: f32, threshold: f32) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

pub type IntersectionCallback = Rc<dyn Fn(IntersectionEntry)>;

pub trait IntersectionSource {
    /// Whatever the host uses to identify a rendered element.
    type Handle: Clone + PartialEq + fmt::Debug;

    /// Starts watching `target`. Reports are delivered to `callback` until
    /// the returned registration is disposed or dropped.
    fn observe(
        &self,
        target: &Self::Handle,
        threshold: f32,
        callback: IntersectionCallback,
    ) -> WatchRegistration;
}

/// Owned watcher; disconnects on drop.
pub struct WatchRegistration {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl WatchRegistration {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Registration for a source that could not attach a watcher.
    pub fn inactive() -> Self {
        Self { dispose: None }
    }

    pub fn is_active(&self) -> bool {
        self.dispose.is_some()
    }

    pub fn dispose(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for WatchRegistration {
    fn drop(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for WatchRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRegistration")
            .field("active", &self.is_active())
            .finish()
    }
}
