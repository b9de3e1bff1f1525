//! End-to-end scroll sessions through the software layout observer.

use scrollpage::{FetchError, LayoutIntersectionObserver, LoaderConfig, PagedList};
use scrollpage_testing::{PagingTestRule, ScriptedFetcher};

type List = PagedList<u32, LayoutIntersectionObserver>;

/// What a list view does after every render: lay out one row per item and
/// bind the trigger to the last one.
fn render(rule: &PagingTestRule, list: &mut List) -> bool {
    let count = list.item_count();
    rule.layout_rows(count);
    count > 0 && list.bind_last_element(rule.row(count - 1))
}

fn list(rule: &PagingTestRule, fetcher: &ScriptedFetcher<u32>) -> List {
    PagedList::new(
        rule.runtime_handle(),
        rule.observer().clone(),
        fetcher.clone(),
        LoaderConfig::default(),
    )
    .expect("valid config")
}

#[test]
fn scrolling_to_the_end_pages_through_everything() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::immediate(0..45u32);
    let mut list = list(&rule, &fetcher);
    rule.pump_until_idle();
    assert_eq!(list.item_count(), 20);

    assert!(render(&rule, &mut list));
    rule.frame();
    assert_eq!(fetcher.requested_pages(), vec![0], "last row is off screen");

    rule.scroll_to_row(19);
    rule.frame();
    assert_eq!(list.item_count(), 40);
    assert_eq!(list.current_page(), 1);

    assert!(render(&rule, &mut list));
    rule.frame();
    rule.scroll_to_row(39);
    rule.frame();
    assert_eq!(list.item_count(), 45);
    assert!(!list.has_more());
    assert_eq!(list.total_elements(), 45);

    assert!(!render(&rule, &mut list), "exhausted list attaches no watcher");
    assert_eq!(rule.observer().watch_count(), 0);
    rule.scroll_to_row(44);
    rule.frame();
    assert_eq!(fetcher.requested_pages(), vec![0, 1, 2]);
    list.with_items(|items| assert_eq!(items, (0..45).collect::<Vec<_>>().as_slice()));
}

#[test]
fn visible_last_row_after_page_lands_waits_for_rebind() {
    // Short rows: the whole first page fits in the viewport.
    let rule = PagingTestRule::with_viewport(scrollpage::Rect::new(0.0, 0.0, 400.0, 300.0), 10.0);
    let fetcher = ScriptedFetcher::new(0..100u32);
    let mut list = list(&rule, &fetcher);
    rule.pump_until_idle();
    fetcher.resolve_next();
    rule.pump_until_idle();

    assert!(render(&rule, &mut list));
    rule.frame();
    assert_eq!(fetcher.requested_pages(), vec![0, 1]);

    // Further frames while page 1 is in flight request nothing.
    rule.frame();
    rule.frame();
    assert_eq!(fetcher.call_count(), 2);

    fetcher.resolve_next();
    rule.frame();
    assert_eq!(list.item_count(), 40);
    assert_eq!(fetcher.call_count(), 2, "no request until the view rebinds");

    // Row 39 spans 390..400, below the 300 px viewport.
    assert!(render(&rule, &mut list));
    rule.frame();
    assert_eq!(fetcher.call_count(), 2);
}

#[test]
fn failed_page_is_retried_from_the_same_index() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::immediate(0..60u32);
    fetcher.fail_page(1, FetchError::Timeout);
    let mut list = list(&rule, &fetcher);
    rule.pump_until_idle();

    render(&rule, &mut list);
    rule.scroll_to_row(19);
    rule.frame();
    assert_eq!(list.error(), Some(FetchError::Timeout));
    assert_eq!(list.item_count(), 20, "failure keeps loaded rows");

    list.retry();
    rule.pump_until_idle();
    assert_eq!(list.error(), None);
    assert_eq!(list.item_count(), 40);
    assert_eq!(fetcher.requested_pages(), vec![0, 1, 1]);
}

#[test]
fn rebinding_after_failure_does_not_request_again() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::immediate(0..60u32);
    fetcher.fail_page(1, FetchError::Timeout);
    let mut list = list(&rule, &fetcher);
    rule.pump_until_idle();

    render(&rule, &mut list);
    rule.scroll_to_row(19);
    rule.frame();
    assert_eq!(list.error(), Some(FetchError::Timeout));

    // The last row stays on screen while the view keeps re-rendering.
    for _ in 0..5 {
        fetcher.fail_page(1, FetchError::Timeout);
        assert!(!render(&rule, &mut list), "failed list attaches no watcher");
        rule.scroll_to_row(19);
        rule.frame();
    }
    assert_eq!(fetcher.requested_pages(), vec![0, 1]);
    assert_eq!(rule.observer().watch_count(), 0);

    list.retry();
    rule.pump_until_idle();
    assert_eq!(fetcher.requested_pages(), vec![0, 1, 1]);
    assert_eq!(list.error(), Some(FetchError::Timeout));
}

#[test]
fn filter_change_restarts_from_the_first_page() {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::new(0..50u32);
    let mut list = PagedList::with_dependencies(
        rule.runtime_handle(),
        rule.observer().clone(),
        fetcher.clone(),
        LoaderConfig::default(),
        &("zirconia", 2u8),
    )
    .expect("valid config");
    rule.pump_until_idle();
    fetcher.resolve_next();
    rule.pump_until_idle();

    render(&rule, &mut list);
    rule.scroll_to_row(19);
    rule.frame();
    assert!(list.is_loading_more());

    assert!(!list.set_dependencies(&("zirconia", 2u8)));
    fetcher.set_items(100..105u32);
    assert!(list.set_dependencies(&("lithium disilicate", 2u8)));
    assert!(list.is_loading_initial());
    assert_eq!(list.item_count(), 0);

    // Stale page 1 from the previous filter lands first and is dropped.
    fetcher.resolve_all();
    rule.pump_until_idle();
    list.with_items(|items| assert_eq!(items, &[100, 101, 102, 103, 104]));
    assert!(!list.has_more());
    assert_eq!(fetcher.requested_pages(), vec![0, 1, 0]);
}
