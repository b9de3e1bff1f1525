//! Visibility-driven paging for scrollpage loaders.
//!
//! [`ViewportTrigger`] watches the last rendered row through an
//! [`IntersectionSource`] and asks its loader for the next page once that row
//! is sufficiently visible. [`LayoutIntersectionObserver`] is a ready-made
//! source for hosts that compute their own layout.

mod geometry;
mod layout_observer;
mod source;
mod trigger;

pub use geometry::Rect;
pub use layout_observer::{ElementId, LayoutIntersectionObserver};
pub use source::{
    meets_threshold, IntersectionCallback, IntersectionEntry, IntersectionSource,
    WatchRegistration,
};
pub use trigger::{PagingTarget, ViewportTrigger};
