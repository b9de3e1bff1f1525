use super::*;
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingScheduler {
    frames: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}

/// Future that stays pending until its flag is flipped.
struct Gate {
    open: Rc<Cell<bool>>,
    waker: Rc<RefCell<Option<Waker>>>,
}

impl Future for Gate {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.open.get() {
            Poll::Ready(())
        } else {
            *self.waker.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

fn gate() -> (Gate, Rc<Cell<bool>>, Rc<RefCell<Option<Waker>>>) {
    let open = Rc::new(Cell::new(false));
    let waker = Rc::new(RefCell::new(None));
    (
        Gate {
            open: Rc::clone(&open),
            waker: Rc::clone(&waker),
        },
        open,
        waker,
    )
}

#[test]
fn spawned_task_runs_on_drain() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let ran = Rc::new(Cell::new(false));
    let ran_in_task = Rc::clone(&ran);

    handle
        .spawn_ui(async move {
            ran_in_task.set(true);
        })
        .expect("runtime alive");

    assert!(!ran.get());
    assert!(runtime.needs_frame());
    handle.drain_ui();
    assert!(ran.get());
    assert_eq!(handle.pending_task_count(), 0);
    assert!(!runtime.needs_frame());
}

#[test]
fn pending_task_wakes_scheduler_and_completes_on_next_drain() {
    let scheduler = Arc::new(CountingScheduler::default());
    let runtime = Runtime::new(scheduler.clone());
    let handle = runtime.handle();
    let (gate, open, waker) = gate();
    let done = Rc::new(Cell::new(false));
    let done_in_task = Rc::clone(&done);

    handle.spawn_ui(async move {
        gate.await;
        done_in_task.set(true);
    });
    handle.drain_ui();
    assert!(!done.get());
    assert_eq!(handle.pending_task_count(), 1);

    let frames_before = scheduler.frames.load(Ordering::SeqCst);
    open.set(true);
    waker.borrow_mut().take().expect("task registered waker").wake();
    assert_eq!(scheduler.frames.load(Ordering::SeqCst), frames_before + 1);

    handle.drain_ui();
    assert!(done.get());
    assert!(!handle.has_pending_ui());
}

#[test]
fn cancelled_task_never_completes() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let (gate, open, _waker) = gate();
    let done = Rc::new(Cell::new(false));
    let done_in_task = Rc::clone(&done);

    let task = handle
        .spawn_ui(async move {
            gate.await;
            done_in_task.set(true);
        })
        .expect("runtime alive");
    handle.drain_ui();
    task.cancel();
    open.set(true);
    handle.drain_ui();

    assert!(!done.get());
    assert_eq!(handle.pending_task_count(), 0);
}

#[test]
fn task_cancelled_by_sibling_during_poll_is_dropped() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let (gate, open, _waker) = gate();
    let victim_done = Rc::new(Cell::new(false));
    let victim_flag = Rc::clone(&victim_done);
    let victim_id = Rc::new(Cell::new(0));

    let killer_handle = handle.clone();
    let killer_target = Rc::clone(&victim_id);
    handle.spawn_ui(async move {
        killer_handle.cancel_task(killer_target.get());
    });
    let victim = handle
        .spawn_ui(async move {
            gate.await;
            victim_flag.set(true);
        })
        .expect("runtime alive");
    victim_id.set(victim.id());

    handle.drain_ui();
    open.set(true);
    handle.drain_ui();

    assert!(!victim_done.get());
    assert_eq!(handle.pending_task_count(), 0);
}

#[test]
fn task_spawned_from_task_runs_in_same_drain() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let log = Rc::new(RefCell::new(Vec::new()));

    let inner_handle = handle.clone();
    let outer_log = Rc::clone(&log);
    handle.spawn_ui(async move {
        outer_log.borrow_mut().push("outer");
        let inner_log = Rc::clone(&outer_log);
        inner_handle.spawn_ui(async move {
            inner_log.borrow_mut().push("inner");
        });
    });
    handle.drain_ui();

    assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    assert!(!handle.has_pending_ui());
}

#[test]
fn handle_outliving_runtime_is_inert() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    drop(runtime);

    assert!(!handle.is_alive());
    assert!(handle.spawn_ui(async {}).is_none());
    assert!(!handle.has_pending_ui());
    assert_eq!(handle.pending_task_count(), 0);
    handle.drain_ui();
}
