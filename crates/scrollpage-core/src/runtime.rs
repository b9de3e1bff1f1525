use crate::collections::map::HashSet;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::platform::RuntimeScheduler;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    tasks: RefCell<Vec<TaskEntry>>,
    // Ids cancelled while their entry was taken out for polling.
    cancelled_in_poll: RefCell<HashSet<u64>>,
    polling: Cell<bool>,
    next_task_id: Cell<u64>,
    task_waker: RefCell<Option<Waker>>,
}

struct TaskEntry {
    id: u64,
    future: Pin<Box<dyn Future<Output = ()> + 'static>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            tasks: RefCell::new(Vec::new()),
            cancelled_in_poll: RefCell::new(HashSet::default()),
            polling: Cell::new(false),
            next_task_id: Cell::new(1),
            task_waker: RefCell::new(None),
        }
    }

    fn init_task_waker(this: &Rc<Self>) {
        let waker = RuntimeTaskWaker::new(Arc::clone(&this.scheduler)).into_waker();
        *this.task_waker.borrow_mut() = Some(waker);
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn spawn_ui_task(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> u64 {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.tasks.borrow_mut().push(TaskEntry { id, future });
        self.schedule();
        id
    }

    fn cancel_task(&self, id: u64) {
        let mut tasks = self.tasks.borrow_mut();
        if let Some(index) = tasks.iter().position(|entry| entry.id == id) {
            // Drop outside the borrow: a future's destructor may touch the runtime.
            let entry = tasks.remove(index);
            drop(tasks);
            drop(entry);
            return;
        }
        drop(tasks);
        if self.polling.get() {
            self.cancelled_in_poll.borrow_mut().insert(id);
        }
    }

    fn poll_async_tasks(&self) -> bool {
        let waker = match self.task_waker.borrow().as_ref() {
            Some(waker) => waker.clone(),
            None => return false,
        };
        let mut cx = Context::from_waker(&waker);
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        if tasks.is_empty() {
            return false;
        }
        self.polling.set(true);
        let mut pending = Vec::with_capacity(tasks.len());
        let mut made_progress = false;
        for mut entry in tasks.into_iter() {
            if self.cancelled_in_poll.borrow().contains(&entry.id) {
                continue;
            }
            match entry.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => {
                    made_progress = true;
                }
                Poll::Pending => {
                    pending.push(entry);
                }
            }
        }
        self.polling.set(false);
        let cancelled = std::mem::take(&mut *self.cancelled_in_poll.borrow_mut());
        if !cancelled.is_empty() {
            pending.retain(|entry| !cancelled.contains(&entry.id));
        }
        if !pending.is_empty() {
            // Tasks spawned during this pass were pushed behind the taken ones;
            // keep spawn order stable by putting survivors first.
            let mut tasks = self.tasks.borrow_mut();
            let spawned = std::mem::take(&mut *tasks);
            tasks.extend(pending);
            tasks.extend(spawned);
        }
        made_progress
    }

    fn drain_ui(&self) {
        // A completed task may have spawned or woken another one.
        while self.poll_async_tasks() {}
        self.needs_frame.set(false);
    }

    fn has_pending_ui(&self) -> bool {
        self.tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true)
    }

    fn pending_task_count(&self) -> usize {
        self.tasks.try_borrow().map(|tasks| tasks.len()).unwrap_or(0)
    }
}

/// Single-threaded executor for fetch futures and UI continuations.
///
/// The runtime owns every spawned task. Dropping the last `Runtime` drops all
/// pending futures; outstanding [`RuntimeHandle`]s then turn into no-ops.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let inner = Rc::new(RuntimeInner::new(scheduler));
        RuntimeInner::init_task_waker(&inner);
        Self { inner }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }
}

/// Scheduler that ignores frame requests. Suitable when the host drains the
/// runtime on a fixed cadence anyway.
#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

/// Handle to a spawned task. Dropping it leaves the task running; call
/// [`TaskHandle::cancel`] to drop the future.
pub struct TaskHandle {
    id: u64,
    runtime: RuntimeHandle,
}

impl RuntimeHandle {
    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.spawn_ui_task(Box::pin(fut));
            TaskHandle {
                id,
                runtime: self.clone(),
            }
        })
    }

    pub fn cancel_task(&self, id: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_task(id);
        }
    }

    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_pending_ui())
            .unwrap_or(false)
    }

    /// Number of spawned futures that have not completed yet.
    pub fn pending_task_count(&self) -> usize {
        self.inner
            .upgrade()
            .map(|inner| inner.pending_task_count())
            .unwrap_or(0)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl RuntimeTaskWaker {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self { scheduler }
    }

    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
