use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail};
use scrollpage::{ElementId, LayoutIntersectionObserver, PagedList, Rect, StdRuntime};

use crate::catalog::{Category, Material, MaterialCatalog};
use crate::settings::DemoSettings;

const MAX_FRAMES: usize = 1_000;
const VIEWPORT_WIDTH: f32 = 480.0;

/// Inputs the view's trigger binding depends on. The view only rebinds when
/// one of them changes, like a memoised ref callback.
#[derive(Clone, Copy, PartialEq, Eq)]
struct BindKey {
    item_count: usize,
    loading: bool,
    has_more: bool,
}

/// Plays the list view: lays rows out, keeps the trigger on the last row and
/// scrolls.
pub struct ScrollSession {
    runtime: StdRuntime,
    frames: Receiver<()>,
    observer: LayoutIntersectionObserver,
    list: PagedList<Material, LayoutIntersectionObserver>,
    filter: Rc<Cell<Option<Category>>>,
    row_height: f32,
    frame_timeout: Duration,
    bound: Option<BindKey>,
}

impl ScrollSession {
    pub fn new(catalog: &MaterialCatalog, settings: &DemoSettings) -> anyhow::Result<Self> {
        let runtime = StdRuntime::new();
        let (sender, frames) = mpsc::channel();
        let sender = Mutex::new(sender);
        runtime.set_frame_waker(move || {
            if let Ok(sender) = sender.lock() {
                let _ = sender.send(());
            }
        });

        let observer = LayoutIntersectionObserver::new(Rect::new(
            0.0,
            0.0,
            VIEWPORT_WIDTH,
            settings.viewport_height,
        ));
        let filter = Rc::new(Cell::new(None));
        let list = PagedList::with_dependencies(
            runtime.runtime_handle(),
            observer.clone(),
            catalog.fetcher(Rc::clone(&filter), settings.latency),
            settings.loader.clone(),
            &filter.get(),
        )?;

        Ok(Self {
            runtime,
            frames,
            observer,
            list,
            filter,
            row_height: settings.row_height,
            frame_timeout: settings.latency.saturating_mul(4) + Duration::from_secs(2),
            bound: None,
        })
    }

    pub fn list(&self) -> &PagedList<Material, LayoutIntersectionObserver> {
        &self.list
    }

    pub fn filter(&self) -> Option<Category> {
        self.filter.get()
    }

    /// Switches the category filter. The list restarts from the first page
    /// only when the filter actually changed.
    pub fn set_filter(&mut self, filter: Option<Category>) -> bool {
        self.filter.set(filter);
        let changed = self.list.set_dependencies(&filter);
        if changed {
            log::info!(
                "filter changed to {}",
                filter.map_or("all materials", Category::label)
            );
            self.bound = None;
            self.observer.scroll_by(-self.observer.viewport().y);
        }
        changed
    }

    pub fn retry(&mut self) {
        self.list.retry();
    }

    pub fn materials(&self) -> Vec<Material> {
        self.list.with_items(|items| items.to_vec())
    }

    /// Lays out one row per loaded item and, when the binding inputs
    /// changed, rebinds the trigger to the last row.
    fn render(&mut self) {
        let item_count = self.list.item_count();
        self.observer.clear_elements();
        for index in 0..item_count {
            self.observer.place(
                ElementId(index as u64),
                Rect::new(
                    0.0,
                    index as f32 * self.row_height,
                    VIEWPORT_WIDTH,
                    self.row_height,
                ),
            );
        }

        let key = BindKey {
            item_count,
            loading: self.list.is_loading_initial() || self.list.is_loading_more(),
            has_more: self.list.has_more(),
        };
        if self.bound == Some(key) {
            return;
        }
        self.bound = Some(key);
        if item_count == 0 {
            self.list.unbind();
        } else {
            self.list
                .bind_last_element(ElementId(item_count as u64 - 1));
        }
    }

    /// Runs frames until nothing is in flight and no intersection report is
    /// pending.
    pub fn settle(&mut self) -> anyhow::Result<()> {
        for _ in 0..MAX_FRAMES {
            self.runtime.take_frame_request();
            self.runtime.drain();
            self.render();
            let delivered = self.observer.dispatch();
            self.runtime.drain();

            let loading = self.list.is_loading_initial() || self.list.is_loading_more();
            if !loading && delivered == 0 {
                return Ok(());
            }
            if loading {
                self.frames
                    .recv_timeout(self.frame_timeout)
                    .map_err(|_| anyhow!("page {} never arrived", self.list.current_page()))?;
            }
        }
        bail!("list did not settle within {MAX_FRAMES} frames")
    }

    /// Scrolls to the bottom until the list is exhausted. Returns how many
    /// scroll steps were needed.
    pub fn scroll_to_end(&mut self) -> anyhow::Result<usize> {
        self.settle()?;
        let mut steps = 0;
        while self.list.has_more() {
            if let Some(error) = self.list.error() {
                bail!("page {} failed: {}", self.list.current_page(), error);
            }
            let before = self.list.item_count();
            let content_bottom = before as f32 * self.row_height;
            let viewport = self.observer.viewport();
            self.observer
                .scroll_by(content_bottom - viewport.height - viewport.y);
            self.settle()?;
            steps += 1;
            log::info!(
                "scrolled to row {}: {} of {} materials loaded",
                before,
                self.list.item_count(),
                self.list.total_elements()
            );
            if self.list.item_count() == before && self.list.error().is_none() {
                bail!("scrolling to row {} did not load another page", before);
            }
        }
        Ok(steps)
    }
}

impl Drop for ScrollSession {
    fn drop(&mut self) {
        self.runtime.clear_frame_waker();
    }
}
