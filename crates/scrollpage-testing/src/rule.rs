use scrollpage_core::{DefaultScheduler, Runtime, RuntimeHandle};
use scrollpage_viewport::{ElementId, LayoutIntersectionObserver, Rect};
use std::sync::Arc;

pub const DEFAULT_ROW_HEIGHT: f32 = 50.0;
pub const DEFAULT_VIEWPORT: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

const MAX_PUMP_ITERATIONS: usize = 100;

/// Headless harness for exercising paged lists in tests.
///
/// Owns the runtime that polls fetch futures and a
/// [`LayoutIntersectionObserver`] standing in for the host's viewport. Rows
/// are laid out as a single column of fixed-height elements keyed by index.
pub struct PagingTestRule {
    runtime: Runtime,
    observer: LayoutIntersectionObserver,
    row_height: f32,
}

impl PagingTestRule {
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT, DEFAULT_ROW_HEIGHT)
    }

    pub fn with_viewport(viewport: Rect, row_height: f32) -> Self {
        Self {
            runtime: Runtime::new(Arc::new(DefaultScheduler)),
            observer: LayoutIntersectionObserver::new(viewport),
            row_height,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn observer(&self) -> &LayoutIntersectionObserver {
        &self.observer
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Element id of the row at `index`.
    pub fn row(&self, index: usize) -> ElementId {
        ElementId(index as u64)
    }

    /// Replaces the layout with `count` stacked rows.
    pub fn layout_rows(&self, count: usize) {
        self.observer.clear_elements();
        for index in 0..count {
            self.observer.place(
                self.row(index),
                Rect::new(
                    0.0,
                    index as f32 * self.row_height,
                    self.observer.viewport().width,
                    self.row_height,
                ),
            );
        }
    }

    /// Scrolls so the viewport's top edge sits at `y`.
    pub fn scroll_to(&self, y: f32) {
        let viewport = self.observer.viewport();
        self.observer.set_viewport(Rect {
            y: y.max(0.0),
            ..viewport
        });
    }

    /// Scrolls so that the row at `index` is fully visible at the bottom of
    /// the viewport.
    pub fn scroll_to_row(&self, index: usize) {
        let viewport = self.observer.viewport();
        let row_bottom = (index + 1) as f32 * self.row_height;
        self.scroll_to(row_bottom - viewport.height);
    }

    /// Runs queued UI work and polls fetch futures until nothing progresses.
    pub fn pump_until_idle(&self) {
        self.runtime.handle().drain_ui();
    }

    /// One frame: settle runtime work, deliver due intersection reports, and
    /// repeat while reports keep arriving. Returns how many reports were
    /// delivered.
    pub fn frame(&self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_PUMP_ITERATIONS {
            self.pump_until_idle();
            let fired = self.observer.dispatch();
            if fired == 0 {
                return delivered;
            }
            delivered += fired;
        }
        panic!("frame did not settle after {MAX_PUMP_ITERATIONS} dispatch rounds");
    }

    pub fn pending_tasks(&self) -> usize {
        self.runtime.handle().pending_task_count()
    }
}

impl Default for PagingTestRule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
