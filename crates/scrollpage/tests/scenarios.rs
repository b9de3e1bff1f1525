//! The reference walkthrough: page size two over `[a, b, c, d, e]`.

use scrollpage::{FetchError, LoadPhase, LoaderConfig, PageResult, PagedLoader};
use scrollpage_testing::{PagingTestRule, ScriptedFetcher};

fn items(loader: &PagedLoader<char>) -> Vec<char> {
    loader.with_items(|items| items.to_vec())
}

fn setup() -> (PagingTestRule, ScriptedFetcher<char>, PagedLoader<char>) {
    let rule = PagingTestRule::new();
    let fetcher = ScriptedFetcher::new("abcde".chars());
    let loader = PagedLoader::new(
        rule.runtime_handle(),
        fetcher.clone(),
        LoaderConfig::default().with_page_size(2),
    )
    .expect("valid config");
    (rule, fetcher, loader)
}

fn settle(rule: &PagingTestRule, fetcher: &ScriptedFetcher<char>, page: PageResult<char>) {
    rule.pump_until_idle();
    fetcher.resolve_next_with(page).expect("a request is pending");
    rule.pump_until_idle();
}

/// Runs the list up to scenario B's state.
fn after_second_page() -> (PagingTestRule, ScriptedFetcher<char>, PagedLoader<char>) {
    let (rule, fetcher, loader) = setup();
    settle(&rule, &fetcher, PageResult::new(vec!['a', 'b'], 5, false));
    loader.load_more();
    settle(&rule, &fetcher, PageResult::new(vec!['c', 'd'], 5, false));
    (rule, fetcher, loader)
}

#[test]
fn scenario_a_initial_page() {
    let (rule, fetcher, loader) = setup();
    assert!(loader.is_loading_initial());
    assert_eq!(loader.phase(), LoadPhase::LoadingInitial);

    settle(&rule, &fetcher, PageResult::new(vec!['a', 'b'], 5, false));

    assert_eq!(items(&loader), vec!['a', 'b']);
    assert!(loader.has_more());
    assert_eq!(loader.current_page(), 0);
    assert_eq!(loader.total_elements(), 5);
    assert!(!loader.is_loading_initial());
    assert_eq!(fetcher.requested_pages(), vec![0]);
    assert_eq!(fetcher.calls()[0].page_size, 2);
}

#[test]
fn scenario_b_second_page_appends() {
    let (_rule, fetcher, loader) = after_second_page();
    assert_eq!(items(&loader), vec!['a', 'b', 'c', 'd']);
    assert_eq!(loader.current_page(), 1);
    assert!(loader.has_more());
    assert_eq!(fetcher.requested_pages(), vec![0, 1]);
}

#[test]
fn scenario_c_last_page_exhausts() {
    let (rule, fetcher, loader) = after_second_page();
    loader.load_more();
    settle(&rule, &fetcher, PageResult::new(vec!['e'], 5, true));

    assert_eq!(items(&loader), vec!['a', 'b', 'c', 'd', 'e']);
    assert!(!loader.has_more());
    assert_eq!(loader.phase(), LoadPhase::Exhausted);

    loader.load_more();
    rule.pump_until_idle();
    assert_eq!(fetcher.call_count(), 3, "no fetch after exhaustion");
    assert!(!loader.is_loading_more());
}

#[test]
fn scenario_d_refresh_replaces_everything() {
    let (rule, fetcher, loader) = after_second_page();
    loader.refresh();
    assert!(loader.is_loading_initial());
    assert!(items(&loader).is_empty());

    settle(&rule, &fetcher, PageResult::new(vec!['x'], 1, true));

    assert_eq!(items(&loader), vec!['x']);
    assert!(!loader.has_more());
    assert_eq!(loader.total_elements(), 1);
    assert_eq!(loader.current_page(), 0);
    assert_eq!(fetcher.requested_pages(), vec![0, 1, 0]);
}

#[test]
fn scenario_e_initial_failure_then_refresh() {
    let (rule, fetcher, loader) = setup();
    rule.pump_until_idle();
    fetcher
        .fail_next(FetchError::network("connection reset"))
        .expect("initial request pending");
    rule.pump_until_idle();

    assert!(items(&loader).is_empty());
    assert_eq!(loader.error(), Some(FetchError::network("connection reset")));
    assert!(!loader.is_loading_initial());
    assert_eq!(loader.phase(), LoadPhase::Error);

    loader.refresh();
    assert_eq!(loader.error(), None);
    settle(&rule, &fetcher, PageResult::new(vec!['a', 'b'], 5, false));

    assert_eq!(items(&loader), vec!['a', 'b']);
    assert!(loader.has_more());
    assert_eq!(loader.error(), None);
}
