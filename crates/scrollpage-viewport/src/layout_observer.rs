//! Software intersection observer for hosts that lay rows out themselves.
//!
//! The host reports where each element sits ([`LayoutIntersectionObserver::place`]),
//! moves the viewport as the user scrolls and calls
//! [`LayoutIntersectionObserver::dispatch`] once per frame. Like a browser
//! observer, a watch reports once when first evaluated and afterwards only
//! when it crosses its threshold.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use scrollpage_core::collections::map::HashMap;
use smallvec::SmallVec;

use crate::geometry::Rect;
use crate::source::{IntersectionCallback, IntersectionEntry, IntersectionSource, WatchRegistration};

/// Identifier the host assigns to a laid-out element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

struct Watch {
    id: u64,
    target: ElementId,
    threshold: f32,
    callback: IntersectionCallback,
    // `None` until the first dispatch after observe.
    last_intersecting: Option<bool>,
}

struct ObserverInner {
    viewport: Cell<Rect>,
    elements: RefCell<HashMap<ElementId, Rect>>,
    watches: RefCell<Vec<Watch>>,
    next_watch_id: Cell<u64>,
}

impl ObserverInner {
    fn remove_watch(&self, id: u64) {
        let mut watches = self.watches.borrow_mut();
        if let Some(index) = watches.iter().position(|watch| watch.id == id) {
            watches.remove(index);
        }
    }

    fn has_watch(&self, id: u64) -> bool {
        self.watches.borrow().iter().any(|watch| watch.id == id)
    }
}

#[derive(Clone)]
pub struct LayoutIntersectionObserver {
    inner: Rc<ObserverInner>,
}

impl LayoutIntersectionObserver {
    pub fn new(viewport: Rect) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                viewport: Cell::new(viewport),
                elements: RefCell::new(HashMap::default()),
                watches: RefCell::new(Vec::new()),
                next_watch_id: Cell::new(1),
            }),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.inner.viewport.get()
    }

    pub fn set_viewport(&self, viewport: Rect) {
        self.inner.viewport.set(viewport);
    }

    /// Moves the viewport vertically by `dy`, clamping at zero.
    pub fn scroll_by(&self, dy: f32) {
        let viewport = self.inner.viewport.get();
        let y = (viewport.y + dy).max(0.0);
        self.inner.viewport.set(Rect { y, ..viewport });
    }

    pub fn place(&self, element: ElementId, bounds: Rect) {
        self.inner.elements.borrow_mut().insert(element, bounds);
    }

    pub fn remove(&self, element: ElementId) {
        self.inner.elements.borrow_mut().remove(&element);
    }

    pub fn clear_elements(&self) {
        self.inner.elements.borrow_mut().clear();
    }

    pub fn bounds(&self, element: ElementId) -> Option<Rect> {
        self.inner.elements.borrow().get(&element).copied()
    }

    pub fn watch_count(&self) -> usize {
        self.inner.watches.borrow().len()
    }

    /// Evaluates every watch against the current layout and delivers the
    /// reports that are due. Returns how many callbacks ran.
    ///
    /// Callbacks run after internal state is released, so they may observe,
    /// dispose or move elements. A watch disposed by an earlier callback in
    /// the same pass is skipped.
    pub fn dispatch(&self) -> usize {
        let mut due: SmallVec<[(u64, IntersectionCallback, IntersectionEntry); 4]> =
            SmallVec::new();
        {
            let viewport = self.inner.viewport.get();
            let elements = self.inner.elements.borrow();
            let mut watches = self.inner.watches.borrow_mut();
            for watch in watches.iter_mut() {
                let ratio = elements
                    .get(&watch.target)
                    .map(|bounds| bounds.intersection_ratio(&viewport))
                    .unwrap_or(0.0);
                let entry = IntersectionEntry::new(ratio, watch.threshold);
                if watch.last_intersecting != Some(entry.is_intersecting) {
                    watch.last_intersecting = Some(entry.is_intersecting);
                    due.push((watch.id, Rc::clone(&watch.callback), entry));
                }
            }
        }

        let mut delivered = 0;
        for (id, callback, entry) in due {
            if !self.inner.has_watch(id) {
                continue;
            }
            callback(entry);
            delivered += 1;
        }
        delivered
    }
}

impl IntersectionSource for LayoutIntersectionObserver {
    type Handle = ElementId;

    fn observe(
        &self,
        target: &ElementId,
        threshold: f32,
        callback: IntersectionCallback,
    ) -> WatchRegistration {
        let id = self.inner.next_watch_id.get();
        self.inner.next_watch_id.set(id + 1);
        self.inner.watches.borrow_mut().push(Watch {
            id,
            target: *target,
            threshold,
            callback,
            last_intersecting: None,
        });
        log::trace!("watching {:?} at threshold {}", target, threshold);

        let inner: Weak<ObserverInner> = Rc::downgrade(&self.inner);
        WatchRegistration::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.remove_watch(id);
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/layout_observer_tests.rs"]
mod tests;
