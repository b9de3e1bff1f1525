//! Core of the scrollpage incremental list loader.
//!
//! This crate holds everything that does not depend on how a host detects
//! visibility: the single-threaded task [`Runtime`] that polls fetch futures
//! on the UI thread, the [`PageFetcher`] adapter trait, the [`LoaderState`]
//! state machine and the [`PagedLoader`] handle that ties them together.

pub mod collections;
pub mod hash;

mod config;
mod dependencies;
mod error;
mod loader;
mod page;
mod platform;
mod runtime;
mod state;

pub use config::{
    LoaderConfig, DEFAULT_INITIAL_PAGE, DEFAULT_INTERSECTION_THRESHOLD, DEFAULT_PAGE_SIZE,
};
pub use dependencies::{DependencyKey, DependencyTracker};
pub use error::{ConfigError, FetchError};
pub use hash::hash_key;
pub use loader::{PagedLoader, WeakPagedLoader};
pub use page::{PageFetcher, PageFuture, PageResult};
pub use platform::RuntimeScheduler;
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle, TaskHandle};
pub use state::{Completion, LoadKind, LoadPhase, LoaderSnapshot, LoaderState, PageTicket};
