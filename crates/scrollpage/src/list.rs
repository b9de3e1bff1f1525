use std::hash::Hash;

use scrollpage_core::{
    ConfigError, FetchError, LoadPhase, LoaderConfig, LoaderSnapshot, PageFetcher, PagedLoader,
    RuntimeHandle, WeakPagedLoader,
};
use scrollpage_viewport::{IntersectionSource, ViewportTrigger};

/// Loader plus viewport trigger, the surface a list view talks to.
///
/// The trigger holds only a weak handle to the loader, so intersection
/// callbacks never keep a discarded list alive. Dropping the list disposes
/// the active watcher and cancels the in-flight request.
pub struct PagedList<T: 'static, S: IntersectionSource> {
    loader: PagedLoader<T>,
    trigger: ViewportTrigger<S, WeakPagedLoader<T>>,
}

impl<T: 'static, S: IntersectionSource> PagedList<T, S> {
    /// Creates the list and issues the initial page request.
    pub fn new(
        runtime: RuntimeHandle,
        source: S,
        fetcher: impl PageFetcher<T> + 'static,
        config: LoaderConfig,
    ) -> Result<Self, ConfigError> {
        let loader = PagedLoader::new(runtime, fetcher, config)?;
        Ok(Self::from_loader(loader, source))
    }

    /// Like [`PagedList::new`], remembering `dependencies` so that an equal
    /// value passed to [`PagedList::set_dependencies`] later is a no-op.
    pub fn with_dependencies<K: Hash + ?Sized>(
        runtime: RuntimeHandle,
        source: S,
        fetcher: impl PageFetcher<T> + 'static,
        config: LoaderConfig,
        dependencies: &K,
    ) -> Result<Self, ConfigError> {
        let loader = PagedLoader::with_dependencies(runtime, fetcher, config, dependencies)?;
        Ok(Self::from_loader(loader, source))
    }

    /// Wraps an existing loader, watching with its configured threshold.
    pub fn from_loader(loader: PagedLoader<T>, source: S) -> Self {
        let threshold = loader.config().intersection_threshold;
        let trigger = ViewportTrigger::new(source, loader.downgrade(), threshold);
        Self { loader, trigger }
    }

    pub fn loader(&self) -> &PagedLoader<T> {
        &self.loader
    }

    pub fn source(&self) -> &S {
        self.trigger.source()
    }

    /// Binds the trigger to the view's current last rendered row. Call after
    /// every render; rebinding the same element is harmless.
    pub fn bind_last_element(&mut self, element: S::Handle) -> bool {
        self.trigger.bind_last_element(element)
    }

    pub fn unbind(&mut self) {
        self.trigger.unbind();
    }

    pub fn is_watching(&self) -> bool {
        self.trigger.is_watching()
    }

    pub fn watched_element(&self) -> Option<&S::Handle> {
        self.trigger.watched_element()
    }

    /// Clears the list and reloads from the first page. The rows the watcher
    /// was bound to are gone, so the watcher is dropped as well.
    pub fn refresh(&mut self) {
        if self.trigger.is_watching() {
            log::debug!(
                "refresh dropped the watcher on {:?}",
                self.trigger.watched_element()
            );
        }
        self.trigger.unbind();
        self.loader.refresh();
    }

    pub fn retry(&self) {
        self.loader.retry();
    }

    pub fn load_more(&self) {
        self.loader.load_more();
    }

    /// Refreshes when `dependencies` changed since the last call.
    pub fn set_dependencies<K: Hash + ?Sized>(&mut self, dependencies: &K) -> bool {
        let changed = self.loader.set_dependencies(dependencies);
        if changed {
            log::debug!(
                "dependencies changed; list restarts from page {}",
                self.loader.config().initial_page
            );
            self.trigger.unbind();
        }
        changed
    }

    pub fn set_on_change(&self, listener: impl Fn() + 'static) {
        self.loader.set_on_change(listener);
    }

    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.loader.with_items(f)
    }

    pub fn item_count(&self) -> usize {
        self.loader.item_count()
    }

    pub fn current_page(&self) -> usize {
        self.loader.current_page()
    }

    pub fn is_loading_initial(&self) -> bool {
        self.loader.is_loading_initial()
    }

    pub fn is_loading_more(&self) -> bool {
        self.loader.is_loading_more()
    }

    pub fn has_more(&self) -> bool {
        self.loader.has_more()
    }

    pub fn total_elements(&self) -> usize {
        self.loader.total_elements()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.loader.error()
    }

    pub fn phase(&self) -> LoadPhase {
        self.loader.phase()
    }
}

impl<T: Clone + 'static, S: IntersectionSource> PagedList<T, S> {
    pub fn snapshot(&self) -> LoaderSnapshot<T> {
        self.loader.snapshot()
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
