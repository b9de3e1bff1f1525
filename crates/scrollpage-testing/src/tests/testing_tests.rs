use super::*;
use crate::{FetchCall, ScriptedFetcher};
use scrollpage_core::{FetchError, PageFetcher, PageResult};
use std::cell::RefCell;
use std::rc::Rc;

type Received = Rc<RefCell<Option<Result<PageResult<char>, FetchError>>>>;

fn request(rule: &PagingTestRule, fetcher: &ScriptedFetcher<char>, page: usize) -> Received {
    let received: Received = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&received);
    let future = fetcher.fetch_page(page, 2);
    rule.runtime_handle()
        .spawn_ui(async move {
            let outcome = future.await;
            sink.borrow_mut().replace(outcome);
        })
        .expect("runtime alive");
    received
}

#[test]
fn deferred_request_waits_for_resolution() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::new("abcde".chars());
    let received = request(&rule, &fetcher, 1);

    rule.pump_until_idle();
    assert!(received.borrow().is_none());
    assert_eq!(fetcher.pending_pages(), vec![1]);

    assert_eq!(
        fetcher.resolve_next(),
        Some(FetchCall {
            page: 1,
            page_size: 2
        })
    );
    rule.pump_until_idle();
    assert_eq!(
        *received.borrow(),
        Some(Ok(PageResult::new(vec!['c', 'd'], 5, false)))
    );
}

#[test]
fn scripted_failure_applies_once() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::immediate("abc".chars());
    fetcher.fail_page(0, FetchError::Timeout);

    let first = request(&rule, &fetcher, 0);
    let second = request(&rule, &fetcher, 0);
    rule.pump_until_idle();

    assert_eq!(*first.borrow(), Some(Err(FetchError::Timeout)));
    assert_eq!(
        *second.borrow(),
        Some(Ok(PageResult::new(vec!['a', 'b'], 3, false)))
    );
    assert_eq!(fetcher.requested_pages(), vec![0, 0]);
}

#[test]
fn items_are_read_at_resolution_time() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::new("abcde".chars());
    let received = request(&rule, &fetcher, 0);
    fetcher.set_items("x".chars());
    fetcher.resolve_all();
    rule.pump_until_idle();
    assert_eq!(
        *received.borrow(),
        Some(Ok(PageResult::new(vec!['x'], 1, true)))
    );
}

#[test]
fn dropped_future_is_not_pending() {
    let fetcher = ScriptedFetcher::<char>::new("ab".chars());
    let future = fetcher.fetch_page(0, 2);
    assert_eq!(fetcher.pending_count(), 1);
    drop(future);
    assert_eq!(fetcher.pending_count(), 0);
}

#[test]
fn scroll_to_row_brings_row_fully_into_view() {
    let rule = PagingTestRule::new();
    rule.layout_rows(20);
    rule.scroll_to_row(19);

    let viewport = rule.observer().viewport();
    let bounds = rule.observer().bounds(rule.row(19)).expect("row laid out");
    assert_eq!(bounds.intersection_ratio(&viewport), 1.0);
    assert_eq!(viewport.y, 700.0);
}
