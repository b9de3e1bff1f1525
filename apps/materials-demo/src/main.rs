use materials_demo::{Category, DemoSettings, MaterialCatalog, ScrollSession};

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let settings = DemoSettings::from_env()?;
    let catalog = MaterialCatalog::seeded(settings.catalog_size);

    println!("=== Dental lab materials ===");
    println!(
        "{} materials, {} per page, {} ms simulated latency",
        catalog.len(),
        settings.loader.page_size,
        settings.latency.as_millis()
    );
    println!();

    let mut session = ScrollSession::new(&catalog, &settings)?;
    let steps = session.scroll_to_end()?;
    println!(
        "All materials: {} rows after {} scroll steps",
        session.list().item_count(),
        steps
    );

    // The second page of the filtered list fails once; the view offers a retry.
    catalog.fail_page_once(1);
    session.set_filter(Some(Category::Zirconia));
    if let Err(error) = session.scroll_to_end() {
        log::warn!("{:#}", error);
        println!("Retrying after: {}", error);
        session.retry();
        session.scroll_to_end()?;
    }
    println!(
        "Zirconia only: {} rows (server reports {})",
        session.list().item_count(),
        session.list().total_elements()
    );

    for material in session.materials().iter().take(5) {
        println!(
            "  #{:03} {:<28} shade {:<3} stock {}",
            material.id, material.name, material.shade, material.stock
        );
    }
    Ok(())
}
