use crate::error::ConfigError;

/// Default index of the first page requested.
pub const DEFAULT_INITIAL_PAGE: usize = 0;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default fraction of the last element that must be visible before the
/// next page is requested.
pub const DEFAULT_INTERSECTION_THRESHOLD: f32 = 0.8;

/// Configuration shared by the loader and its viewport trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderConfig {
    /// Index of the page loaded on construction and after every refresh.
    pub initial_page: usize,
    /// Items requested per page.
    pub page_size: usize,
    /// Visible fraction of the bound element that counts as intersecting.
    pub intersection_threshold: f32,
    /// Drop the in-flight fetch future when a refresh supersedes it.
    ///
    /// Off by default: superseded responses are still awaited and then
    /// discarded by the generation check.
    pub cancel_superseded: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            initial_page: DEFAULT_INITIAL_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD,
            cancel_superseded: false,
        }
    }
}

impl LoaderConfig {
    pub fn with_initial_page(mut self, initial_page: usize) -> Self {
        self.initial_page = initial_page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_intersection_threshold(mut self, threshold: f32) -> Self {
        self.intersection_threshold = threshold;
        self
    }

    pub fn with_cancel_superseded(mut self, cancel: bool) -> Self {
        self.cancel_superseded = cancel;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let threshold = self.intersection_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}
