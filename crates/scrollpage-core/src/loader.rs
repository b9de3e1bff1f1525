//! The paged loader handle.
//!
//! [`PagedLoader`] wires a [`LoaderState`] to a [`PageFetcher`] and the
//! single-threaded runtime. Requests are issued synchronously (the state
//! transition happens before the fetch future exists) and responses are
//! applied from a runtime task, so all mutation stays on the UI thread.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use web_time::Instant;

use crate::config::LoaderConfig;
use crate::dependencies::{DependencyKey, DependencyTracker};
use crate::error::{ConfigError, FetchError};
use crate::page::{PageFetcher, PageResult};
use crate::runtime::{RuntimeHandle, TaskHandle};
use crate::state::{Completion, LoadPhase, LoaderSnapshot, LoaderState, PageTicket};

type ChangeListener = Rc<dyn Fn()>;

struct LoaderInner<T: 'static> {
    state: RefCell<LoaderState<T>>,
    fetcher: Box<dyn PageFetcher<T>>,
    runtime: RuntimeHandle,
    config: LoaderConfig,
    in_flight: RefCell<Option<TaskHandle>>,
    dependencies: RefCell<DependencyTracker>,
    on_change: RefCell<Option<ChangeListener>>,
}

impl<T: 'static> LoaderInner<T> {
    fn notify(&self) {
        let listener = self.on_change.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    fn finish(
        &self,
        ticket: PageTicket,
        result: Result<PageResult<T>, FetchError>,
        started: Instant,
    ) {
        let failed = result.as_ref().err().map(ToString::to_string);
        let outcome = self.state.borrow_mut().complete(ticket, result);
        match outcome {
            Completion::Stale => {
                log::debug!(
                    "discarding stale page {} from generation {}",
                    ticket.page(),
                    ticket.generation()
                );
            }
            Completion::Applied => {
                self.in_flight.borrow_mut().take();
                match failed {
                    Some(error) => log::warn!("page {} failed: {}", ticket.page(), error),
                    None => log::debug!(
                        "applied page {} in {} ms",
                        ticket.page(),
                        started.elapsed().as_millis()
                    ),
                }
                self.notify();
            }
        }
    }
}

impl<T: 'static> Drop for LoaderInner<T> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.get_mut().take() {
            task.cancel();
        }
    }
}

/// Incremental page loader owned by one list view.
///
/// Cloning yields another handle to the same loader. The loader is torn down
/// when the last handle drops; its in-flight fetch is cancelled then.
///
/// ```rust,ignore
/// let loader = PagedLoader::new(runtime.handle(), fetch_materials, LoaderConfig::default())?;
/// loader.set_on_change(move || request_render());
///
/// // Later, from the viewport trigger:
/// loader.load_more();
/// ```
pub struct PagedLoader<T: 'static> {
    inner: Rc<LoaderInner<T>>,
}

impl<T: 'static> Clone for PagedLoader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> PagedLoader<T> {
    /// Creates the loader and immediately issues the initial page request.
    pub fn new(
        runtime: RuntimeHandle,
        fetcher: impl PageFetcher<T> + 'static,
        config: LoaderConfig,
    ) -> Result<Self, ConfigError> {
        Self::build(runtime, Box::new(fetcher), config, DependencyTracker::new())
    }

    /// Like [`PagedLoader::new`], seeding the dependency tracker so that a later
    /// [`PagedLoader::set_dependencies`] with the same value does not refresh.
    pub fn with_dependencies<K: Hash + ?Sized>(
        runtime: RuntimeHandle,
        fetcher: impl PageFetcher<T> + 'static,
        config: LoaderConfig,
        dependencies: &K,
    ) -> Result<Self, ConfigError> {
        let tracker = DependencyTracker::with_key(DependencyKey::of(dependencies));
        Self::build(runtime, Box::new(fetcher), config, tracker)
    }

    fn build(
        runtime: RuntimeHandle,
        fetcher: Box<dyn PageFetcher<T>>,
        config: LoaderConfig,
        dependencies: DependencyTracker,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let loader = Self {
            inner: Rc::new(LoaderInner {
                state: RefCell::new(LoaderState::new(config.initial_page)),
                fetcher,
                runtime,
                config,
                in_flight: RefCell::new(None),
                dependencies: RefCell::new(dependencies),
                on_change: RefCell::new(None),
            }),
        };
        loader.load_initial();
        Ok(loader)
    }

    /// Loads the initial page. No-op while any request is in flight.
    pub fn load_initial(&self) {
        let ticket = self.inner.state.borrow_mut().begin_initial();
        match ticket {
            Some(ticket) => self.issue(ticket),
            None => log::trace!("load_initial skipped: request already in flight"),
        }
    }

    /// Loads the next page.
    ///
    /// No-op while a request is in flight, once the list is exhausted, or
    /// before the initial page has loaded. Safe to call from every
    /// intersection callback.
    pub fn load_more(&self) {
        let ticket = self.inner.state.borrow_mut().begin_more();
        match ticket {
            Some(ticket) => self.issue(ticket),
            None => log::trace!("load_more skipped"),
        }
    }

    /// Clears the list and reloads from the initial page.
    ///
    /// Allowed at any time. A response still in flight becomes stale and is
    /// discarded when it arrives (or dropped right away when
    /// [`LoaderConfig::cancel_superseded`] is set).
    pub fn refresh(&self) {
        if self.inner.config.cancel_superseded {
            let previous = self.inner.in_flight.borrow_mut().take();
            if let Some(task) = previous {
                task.cancel();
            }
        }
        let ticket = self.inner.state.borrow_mut().begin_refresh();
        log::debug!("refresh started generation {}", ticket.generation());
        self.issue(ticket);
    }

    /// Re-issues whatever failed last: the initial page when nothing has
    /// loaded in this generation, otherwise the next page.
    pub fn retry(&self) {
        let has_loaded = self.inner.state.borrow().loaded_page().is_some();
        if has_loaded {
            self.load_more();
        } else {
            self.load_initial();
        }
    }

    /// Refreshes when `dependencies` hash differently from the previous call.
    /// Returns whether a refresh was started.
    pub fn set_dependencies<K: Hash + ?Sized>(&self, dependencies: &K) -> bool {
        let changed = self
            .inner
            .dependencies
            .borrow_mut()
            .update(DependencyKey::of(dependencies));
        if changed {
            self.refresh();
        }
        changed
    }

    /// Registers the callback run after every applied transition.
    pub fn set_on_change(&self, listener: impl Fn() + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn clear_on_change(&self) {
        self.inner.on_change.borrow_mut().take();
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.inner.runtime
    }

    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(self.inner.state.borrow().items())
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&LoaderState<T>) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    pub fn item_count(&self) -> usize {
        self.inner.state.borrow().items().len()
    }

    pub fn current_page(&self) -> usize {
        self.inner.state.borrow().current_page()
    }

    pub fn is_loading_initial(&self) -> bool {
        self.inner.state.borrow().is_loading_initial()
    }

    pub fn is_loading_more(&self) -> bool {
        self.inner.state.borrow().is_loading_more()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.inner.state.borrow().has_more()
    }

    pub fn total_elements(&self) -> usize {
        self.inner.state.borrow().total_elements()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.inner.state.borrow().error().cloned()
    }

    pub fn phase(&self) -> LoadPhase {
        self.inner.state.borrow().phase()
    }

    pub fn refresh_generation(&self) -> u64 {
        self.inner.state.borrow().refresh_generation()
    }

    pub fn downgrade(&self) -> WeakPagedLoader<T> {
        WeakPagedLoader {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn issue(&self, ticket: PageTicket) {
        let future = self
            .inner
            .fetcher
            .fetch_page(ticket.page(), self.inner.config.page_size);
        let weak = Rc::downgrade(&self.inner);
        let started = Instant::now();
        log::debug!(
            "requesting page {} (size {}, generation {})",
            ticket.page(),
            self.inner.config.page_size,
            ticket.generation()
        );
        let task = self.inner.runtime.spawn_ui(async move {
            let result = future.await;
            if let Some(inner) = weak.upgrade() {
                inner.finish(ticket, result, started);
            }
        });
        match task {
            Some(task) => {
                *self.inner.in_flight.borrow_mut() = Some(task);
                self.inner.notify();
            }
            None => {
                log::warn!("runtime dropped; page {} not requested", ticket.page());
                self.inner.finish(
                    ticket,
                    Err(FetchError::Unavailable("runtime is gone".to_string())),
                    started,
                );
            }
        }
    }
}

impl<T: Clone + 'static> PagedLoader<T> {
    pub fn snapshot(&self) -> LoaderSnapshot<T> {
        self.inner.state.borrow().snapshot()
    }
}

/// Non-owning loader handle for callbacks that must not keep the list alive.
pub struct WeakPagedLoader<T: 'static> {
    inner: Weak<LoaderInner<T>>,
}

impl<T: 'static> Clone for WeakPagedLoader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: 'static> WeakPagedLoader<T> {
    pub fn upgrade(&self) -> Option<PagedLoader<T>> {
        self.inner.upgrade().map(|inner| PagedLoader { inner })
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
