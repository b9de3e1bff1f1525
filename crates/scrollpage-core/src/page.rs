//! Page fetcher adapter surface.
//!
//! The loader knows nothing about the backend's query shape. It asks a
//! [`PageFetcher`] for page `n` of size `s` and receives a [`PageResult`], or a
//! [`FetchError`] when the request failed.

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;

/// One page of results as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResult<T> {
    /// Items of this page, in server order.
    pub content: Vec<T>,
    /// Total element count across all pages at fetch time.
    pub total_elements: usize,
    /// Whether this page is the final one.
    pub last: bool,
}

impl<T> PageResult<T> {
    pub fn new(content: Vec<T>, total_elements: usize, last: bool) -> Self {
        Self {
            content,
            total_elements,
            last,
        }
    }

    /// Slices `page` out of an in-memory collection, computing `last` from the
    /// collection length.
    pub fn from_slice(all: &[T], page: usize, page_size: usize) -> Self
    where
        T: Clone,
    {
        let start = page.saturating_mul(page_size).min(all.len());
        let end = start.saturating_add(page_size).min(all.len());
        Self {
            content: all[start..end].to_vec(),
            total_elements: all.len(),
            last: end >= all.len(),
        }
    }
}

/// Future produced by a [`PageFetcher`]. Polled on the UI thread, so it does
/// not need to be `Send`.
pub type PageFuture<T> = Pin<Box<dyn Future<Output = Result<PageResult<T>, FetchError>> + 'static>>;

/// Asynchronous source of pages.
///
/// Implementations must reject with a [`FetchError`] on transport or server
/// failure instead of returning a partial page. Retry and timeout policy, if
/// any, belong here rather than in the loader.
pub trait PageFetcher<T> {
    fn fetch_page(&self, page: usize, page_size: usize) -> PageFuture<T>;
}

impl<T, F, Fut> PageFetcher<T> for F
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<PageResult<T>, FetchError>> + 'static,
{
    fn fetch_page(&self, page: usize, page_size: usize) -> PageFuture<T> {
        Box::pin(self(page, page_size))
    }
}
