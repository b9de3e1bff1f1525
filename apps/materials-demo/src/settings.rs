use std::time::Duration;

use anyhow::Context;
use scrollpage::LoaderConfig;

pub const PAGE_SIZE_VAR: &str = "SCROLLPAGE_PAGE_SIZE";
pub const LATENCY_VAR: &str = "SCROLLPAGE_LATENCY";

const DEFAULT_LATENCY_MS: u64 = 120;
const DEFAULT_CATALOG_SIZE: u32 = 137;

/// Knobs for the demo session, overridable from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoSettings {
    pub loader: LoaderConfig,
    pub latency: Duration,
    pub catalog_size: u32,
    pub viewport_height: f32,
    pub row_height: f32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            catalog_size: DEFAULT_CATALOG_SIZE,
            viewport_height: 600.0,
            row_height: 48.0,
        }
    }
}

impl DemoSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from `lookup`, which returns the raw value of an
    /// environment variable when it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        if let Some(raw) = lookup(PAGE_SIZE_VAR) {
            let page_size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{PAGE_SIZE_VAR}={raw:?} is not a page size"))?;
            settings.loader = settings.loader.with_page_size(page_size);
        }
        if let Some(raw) = lookup(LATENCY_VAR) {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{LATENCY_VAR}={raw:?} is not a latency in ms"))?;
            settings.latency = Duration::from_millis(millis);
        }
        settings
            .loader
            .validate()
            .context("invalid loader configuration")?;
        Ok(settings)
    }
}
