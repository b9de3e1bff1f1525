use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use scrollpage_core::collections::map::HashMap;
use scrollpage_core::{FetchError, PageFetcher, PageFuture, PageResult};

/// One request observed by a [`ScriptedFetcher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchCall {
    pub page: usize,
    pub page_size: usize,
}

/// When a [`ScriptedFetcher`] settles its requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Requests wait until the test resolves them.
    #[default]
    Deferred,
    /// Requests resolve on first poll.
    Immediate,
}

type Outcome<T> = Result<PageResult<T>, FetchError>;

struct Slot<T> {
    outcome: Option<Outcome<T>>,
    waker: Option<Waker>,
    // Set when the future is dropped before it settled.
    abandoned: bool,
}

struct SlotFuture<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Future for SlotFuture<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome<T>> {
        let mut slot = self.slot.borrow_mut();
        match slot.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<T> Drop for SlotFuture<T> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.try_borrow_mut() {
            slot.abandoned = true;
        }
    }
}

struct PendingFetch<T> {
    call: FetchCall,
    slot: Rc<RefCell<Slot<T>>>,
}

struct ScriptedInner<T> {
    items: RefCell<Vec<T>>,
    mode: Cell<ResponseMode>,
    calls: RefCell<Vec<FetchCall>>,
    pending: RefCell<VecDeque<PendingFetch<T>>>,
    scripted_failures: RefCell<HashMap<usize, FetchError>>,
}

/// In-memory [`PageFetcher`] whose responses the test controls.
///
/// Pages are cut from the backing list at the moment a request settles, so
/// replacing the list between request and resolution models a backend whose
/// data changed underneath an in-flight query.
pub struct ScriptedFetcher<T> {
    inner: Rc<ScriptedInner<T>>,
}

impl<T> Clone for ScriptedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> ScriptedFetcher<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            inner: Rc::new(ScriptedInner {
                items: RefCell::new(items.into_iter().collect()),
                mode: Cell::new(ResponseMode::Deferred),
                calls: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                scripted_failures: RefCell::new(HashMap::default()),
            }),
        }
    }

    pub fn immediate(items: impl IntoIterator<Item = T>) -> Self {
        let fetcher = Self::new(items);
        fetcher.set_mode(ResponseMode::Immediate);
        fetcher
    }

    pub fn mode(&self) -> ResponseMode {
        self.inner.mode.get()
    }

    pub fn set_mode(&self, mode: ResponseMode) {
        self.inner.mode.set(mode);
    }

    /// Replaces the backing list. Affects requests settled from now on.
    pub fn set_items(&self, items: impl IntoIterator<Item = T>) {
        *self.inner.items.borrow_mut() = items.into_iter().collect();
    }

    pub fn item_count(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Makes the next request for `page` fail with `error`, once.
    pub fn fail_page(&self, page: usize, error: FetchError) {
        self.inner.scripted_failures.borrow_mut().insert(page, error);
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<FetchCall> {
        self.inner.calls.borrow().clone()
    }

    pub fn requested_pages(&self) -> Vec<usize> {
        self.inner.calls.borrow().iter().map(|call| call.page).collect()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.borrow().len()
    }

    /// Requests that have not been settled and whose future is still alive.
    pub fn pending_count(&self) -> usize {
        self.inner
            .pending
            .borrow()
            .iter()
            .filter(|pending| !pending.slot.borrow().abandoned)
            .count()
    }

    pub fn pending_pages(&self) -> Vec<usize> {
        self.inner
            .pending
            .borrow()
            .iter()
            .map(|pending| pending.call.page)
            .collect()
    }

    /// Settles the oldest pending request from the backing list.
    pub fn resolve_next(&self) -> Option<FetchCall> {
        let pending = self.inner.pending.borrow_mut().pop_front()?;
        let outcome = self.outcome_for(pending.call);
        Some(Self::settle(pending, outcome))
    }

    /// Settles the most recent pending request from the backing list.
    pub fn resolve_latest(&self) -> Option<FetchCall> {
        let pending = self.inner.pending.borrow_mut().pop_back()?;
        let outcome = self.outcome_for(pending.call);
        Some(Self::settle(pending, outcome))
    }

    /// Settles the oldest pending request with an explicit page.
    pub fn resolve_next_with(&self, result: PageResult<T>) -> Option<FetchCall> {
        let pending = self.inner.pending.borrow_mut().pop_front()?;
        Some(Self::settle(pending, Ok(result)))
    }

    /// Rejects the oldest pending request.
    pub fn fail_next(&self, error: FetchError) -> Option<FetchCall> {
        let pending = self.inner.pending.borrow_mut().pop_front()?;
        Some(Self::settle(pending, Err(error)))
    }

    /// Settles every pending request, oldest first.
    pub fn resolve_all(&self) -> usize {
        let mut settled = 0;
        while self.resolve_next().is_some() {
            settled += 1;
        }
        settled
    }

    fn outcome_for(&self, call: FetchCall) -> Outcome<T> {
        if let Some(error) = self.inner.scripted_failures.borrow_mut().remove(&call.page) {
            return Err(error);
        }
        let items = self.inner.items.borrow();
        Ok(PageResult::from_slice(&items, call.page, call.page_size))
    }

    fn settle(pending: PendingFetch<T>, outcome: Outcome<T>) -> FetchCall {
        let waker = {
            let mut slot = pending.slot.borrow_mut();
            slot.outcome = Some(outcome);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        log::trace!("settled page {}", pending.call.page);
        pending.call
    }
}

impl<T: Clone + 'static> PageFetcher<T> for ScriptedFetcher<T> {
    fn fetch_page(&self, page: usize, page_size: usize) -> PageFuture<T> {
        let call = FetchCall { page, page_size };
        self.inner.calls.borrow_mut().push(call);
        let slot = Rc::new(RefCell::new(Slot {
            outcome: None,
            waker: None,
            abandoned: false,
        }));
        match self.mode() {
            ResponseMode::Immediate => {
                slot.borrow_mut().outcome = Some(self.outcome_for(call));
            }
            ResponseMode::Deferred => {
                self.inner.pending.borrow_mut().push_back(PendingFetch {
                    call,
                    slot: Rc::clone(&slot),
                });
            }
        }
        Box::pin(SlotFuture { slot })
    }
}
