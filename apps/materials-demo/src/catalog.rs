use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use scrollpage::{delay, FetchError, PageFetcher, PageFuture, PageResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Zirconia,
    LithiumDisilicate,
    Pmma,
    Composite,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Zirconia,
        Category::LithiumDisilicate,
        Category::Pmma,
        Category::Composite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Zirconia => "zirconia",
            Category::LithiumDisilicate => "lithium disilicate",
            Category::Pmma => "PMMA",
            Category::Composite => "composite",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub shade: &'static str,
    pub stock: u32,
}

const SHADES: [&str; 6] = ["A1", "A2", "A3", "B1", "C2", "D3"];

fn seeded_stock(id: u32) -> u32 {
    id % 40 * 7 % 40
}

/// In-memory stand-in for the lab's materials endpoint.
#[derive(Clone, Debug)]
pub struct MaterialCatalog {
    materials: Rc<Vec<Material>>,
    outage: Rc<Cell<Option<usize>>>,
}

impl MaterialCatalog {
    pub fn new(materials: Vec<Material>) -> Self {
        Self {
            materials: Rc::new(materials),
            outage: Rc::new(Cell::new(None)),
        }
    }

    /// Deterministic catalog of `count` materials cycling through categories
    /// and shades.
    pub fn seeded(count: u32) -> Self {
        let materials = (0..count)
            .map(|id| {
                let category = Category::ALL[id as usize % Category::ALL.len()];
                let shade = SHADES[(id as usize / Category::ALL.len()) % SHADES.len()];
                Material {
                    id,
                    name: format!("{} block {:03}", category, id),
                    category,
                    shade,
                    stock: seeded_stock(id),
                }
            })
            .collect();
        Self::new(materials)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials matching `filter`, in catalog order.
    pub fn query(&self, filter: Option<Category>) -> Vec<Material> {
        self.materials
            .iter()
            .filter(|material| filter.map_or(true, |category| material.category == category))
            .cloned()
            .collect()
    }

    /// Makes the next request for `page` answer 503.
    pub fn fail_page_once(&self, page: usize) {
        self.outage.set(Some(page));
    }

    /// Fetcher that reads the active filter at request time and answers
    /// after `latency`.
    pub fn fetcher(
        &self,
        filter: Rc<Cell<Option<Category>>>,
        latency: Duration,
    ) -> MaterialFetcher {
        MaterialFetcher {
            catalog: self.clone(),
            filter,
            latency,
        }
    }
}

pub struct MaterialFetcher {
    catalog: MaterialCatalog,
    filter: Rc<Cell<Option<Category>>>,
    latency: Duration,
}

impl PageFetcher<Material> for MaterialFetcher {
    fn fetch_page(&self, page: usize, page_size: usize) -> PageFuture<Material> {
        let outcome = if self.catalog.outage.get() == Some(page) {
            self.catalog.outage.set(None);
            Err(FetchError::status(503, "materials service unavailable"))
        } else {
            let matching = self.catalog.query(self.filter.get());
            Ok(PageResult::from_slice(&matching, page, page_size))
        };
        let latency = self.latency;
        Box::pin(async move {
            delay(latency).await;
            outcome
        })
    }
}
