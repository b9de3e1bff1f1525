//! Incrementally loaded ("infinite") lists.
//!
//! A [`PagedList`] pairs a [`PagedLoader`] with a [`ViewportTrigger`]: the
//! view renders [`PagedList::with_items`], binds its last rendered row with
//! [`PagedList::bind_last_element`], and the next page is fetched once that
//! row scrolls into view. Responses that arrive after a
//! [`PagedList::refresh`] are discarded.

mod list;

pub use list::PagedList;

pub use scrollpage_core::{
    hash_key, Completion, ConfigError, DefaultScheduler, DependencyKey, DependencyTracker,
    FetchError, LoadKind, LoadPhase, LoaderConfig, LoaderSnapshot, LoaderState, PageFetcher,
    PageFuture, PageResult, PageTicket, PagedLoader, Runtime, RuntimeHandle, RuntimeScheduler,
    TaskHandle, WeakPagedLoader, DEFAULT_INITIAL_PAGE, DEFAULT_INTERSECTION_THRESHOLD,
    DEFAULT_PAGE_SIZE,
};
pub use scrollpage_viewport::{
    meets_threshold, ElementId, IntersectionCallback, IntersectionEntry, IntersectionSource,
    LayoutIntersectionObserver, PagingTarget, Rect, ViewportTrigger, WatchRegistration,
};

#[cfg(feature = "std-runtime")]
pub use scrollpage_runtime_std::{delay, Delay, StdRuntime, StdScheduler};

pub mod prelude {
    pub use crate::list::PagedList;
    pub use scrollpage_core::{
        FetchError, LoadPhase, LoaderConfig, LoaderSnapshot, PageFetcher, PageResult,
        PagedLoader, Runtime, RuntimeHandle,
    };
    pub use scrollpage_viewport::{
        ElementId, IntersectionSource, LayoutIntersectionObserver, Rect, WatchRegistration,
    };

    #[cfg(feature = "std-runtime")]
    pub use scrollpage_runtime_std::StdRuntime;
}
