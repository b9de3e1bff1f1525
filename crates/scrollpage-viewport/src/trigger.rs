//! Viewport trigger: turns "the last row became visible" into `load_more`.

use std::rc::Rc;

use scrollpage_core::{PagedLoader, WeakPagedLoader};

use crate::source::{
    IntersectionCallback, IntersectionEntry, IntersectionSource, WatchRegistration,
};

/// What the trigger needs from a loader.
pub trait PagingTarget {
    fn is_loading(&self) -> bool;
    fn has_more(&self) -> bool;
    /// Whether the last request failed and has not been retried yet.
    fn has_error(&self) -> bool;
    fn load_more(&self);
}

impl<T: 'static> PagingTarget for PagedLoader<T> {
    fn is_loading(&self) -> bool {
        PagedLoader::is_loading(self)
    }

    fn has_more(&self) -> bool {
        PagedLoader::has_more(self)
    }

    fn has_error(&self) -> bool {
        self.with_state(|state| state.error().is_some())
    }

    fn load_more(&self) {
        PagedLoader::load_more(self);
    }
}

/// A dropped loader reports nothing to load.
impl<T: 'static> PagingTarget for WeakPagedLoader<T> {
    fn is_loading(&self) -> bool {
        self.upgrade().is_some_and(|loader| loader.is_loading())
    }

    fn has_more(&self) -> bool {
        self.upgrade().is_some_and(|loader| loader.has_more())
    }

    fn has_error(&self) -> bool {
        self.upgrade().is_some_and(|loader| PagingTarget::has_error(&loader))
    }

    fn load_more(&self) {
        if let Some(loader) = self.upgrade() {
            loader.load_more();
        }
    }
}

struct ActiveWatch<H> {
    target: H,
    // Held for its Drop.
    _registration: WatchRegistration,
}

/// Keeps at most one watcher alive, always on the most recently bound
/// element.
///
/// Each bind first disposes the previous watcher. While the target is loading
/// or exhausted no watcher is attached at all, so an element that is still
/// on screen when a page lands cannot fire a second request by itself; the
/// view's next bind (with the new last row) re-arms the trigger. A failed
/// target stays unwatched until the caller retries or refreshes.
pub struct ViewportTrigger<S, P>
where
    S: IntersectionSource,
    P: PagingTarget + Clone + 'static,
{
    source: S,
    target: P,
    threshold: f32,
    active: Option<ActiveWatch<S::Handle>>,
}

impl<S, P> ViewportTrigger<S, P>
where
    S: IntersectionSource,
    P: PagingTarget + Clone + 'static,
{
    pub fn new(source: S, target: P, threshold: f32) -> Self {
        Self {
            source,
            target,
            threshold,
            active: None,
        }
    }

    /// Rebinds the trigger to `element`, the view's current last row.
    /// Returns whether a watcher was attached.
    pub fn bind_last_element(&mut self, element: S::Handle) -> bool {
        self.unbind();
        if self.target.is_loading() {
            log::trace!("not watching {:?}: page in flight", element);
            return false;
        }
        if !self.target.has_more() {
            log::trace!("not watching {:?}: list exhausted", element);
            return false;
        }
        if self.target.has_error() {
            log::trace!("not watching {:?}: last page failed", element);
            return false;
        }

        let target = self.target.clone();
        let callback: IntersectionCallback = Rc::new(move |entry: IntersectionEntry| {
            if entry.is_intersecting && target.has_more() {
                target.load_more();
            }
        });
        let registration = self.source.observe(&element, self.threshold, callback);
        self.active = Some(ActiveWatch {
            target: element,
            _registration: registration,
        });
        true
    }

    /// Disposes the active watcher, if any.
    pub fn unbind(&mut self) {
        self.active = None;
    }

    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    pub fn watched_element(&self) -> Option<&S::Handle> {
        self.active.as_ref().map(|active| &active.target)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn target(&self) -> &P {
        &self.target
    }
}

#[cfg(test)]
#[path = "tests/trigger_tests.rs"]
mod tests;
