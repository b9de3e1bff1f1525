//! Deterministic test fixtures for scrollpage loaders.
//!
//! [`ScriptedFetcher`] answers page requests from an in-memory list and lets
//! the test decide when (and in which order) each request settles.
//! [`PagingTestRule`] owns a runtime and a software intersection observer so
//! a test can lay out rows, scroll and pump frames without a host UI.

mod fetcher;
mod rule;

pub use fetcher::{FetchCall, ResponseMode, ScriptedFetcher};
pub use rule::{PagingTestRule, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT};
