use std::time::Duration;

use materials_demo::{Category, DemoSettings, MaterialCatalog, ScrollSession};
use scrollpage::{FetchError, LoaderConfig};

fn instant_settings() -> DemoSettings {
    DemoSettings {
        latency: Duration::ZERO,
        ..DemoSettings::default()
    }
}

#[test]
fn scrolls_through_the_whole_catalog() {
    let catalog = MaterialCatalog::seeded(137);
    let mut session = ScrollSession::new(&catalog, &instant_settings()).expect("session");

    session.scroll_to_end().expect("reaches the end");

    let materials = session.materials();
    assert_eq!(materials.len(), 137);
    assert!(materials.iter().enumerate().all(|(i, m)| m.id == i as u32));
    assert_eq!(session.list().total_elements(), 137);
    assert!(!session.list().has_more());
}

#[test]
fn filter_change_reloads_matching_materials_only() {
    let catalog = MaterialCatalog::seeded(137);
    let mut session = ScrollSession::new(&catalog, &instant_settings()).expect("session");
    session.scroll_to_end().expect("reaches the end");

    assert!(!session.set_filter(None), "same filter is not a change");
    assert!(session.set_filter(Some(Category::Pmma)));
    session.scroll_to_end().expect("reaches the end");

    let materials = session.materials();
    assert_eq!(materials.len(), catalog.query(Some(Category::Pmma)).len());
    assert!(materials.iter().all(|m| m.category == Category::Pmma));
    assert_eq!(session.list().current_page(), 1);
}

#[test]
fn failed_page_surfaces_and_retries() {
    let catalog = MaterialCatalog::seeded(80);
    let mut session = ScrollSession::new(&catalog, &instant_settings()).expect("session");
    catalog.fail_page_once(2);

    let error = session.scroll_to_end().expect_err("page 2 fails");
    assert!(error.to_string().contains("503"));
    assert_eq!(session.list().item_count(), 40);
    assert_eq!(
        session.list().error(),
        Some(FetchError::status(503, "materials service unavailable"))
    );

    session.retry();
    session.scroll_to_end().expect("recovers");
    assert_eq!(session.list().item_count(), 80);
    assert_eq!(session.list().error(), None);
}

#[test]
fn real_latency_still_settles() {
    let catalog = MaterialCatalog::seeded(30);
    let settings = DemoSettings {
        latency: Duration::from_millis(5),
        loader: LoaderConfig::default().with_page_size(10),
        ..DemoSettings::default()
    };
    let mut session = ScrollSession::new(&catalog, &settings).expect("session");
    session.scroll_to_end().expect("reaches the end");
    assert_eq!(session.list().item_count(), 30);
}
