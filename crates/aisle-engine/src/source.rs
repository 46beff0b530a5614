//! The paged-fetch seam between the engine and a catalog backend.

use crate::error::TransportError;
use crate::item::{Category, Item, ItemDetail, Page};
use crate::key::{FetchKey, FetchMode};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Future returned by every [`CatalogSource`] read.
pub type SourceFuture<T> = BoxFuture<'static, Result<T, TransportError>>;

/// A remote, read-only product catalog.
///
/// Implementations must be cheap to share; the runtime clones an `Arc` of the
/// source into every spawned fetch. No call retries on its own, and none has a
/// timeout: a hung request simply never resolves.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch `limit` rows starting at `skip` for `key`.
    ///
    /// The returned page holds at most `limit` products. Which endpoint is
    /// used follows [`FetchKey::mode`].
    fn fetch_page(&self, key: &FetchKey, skip: usize, limit: usize) -> SourceFuture<Page>;

    /// Fetch the full record for one product.
    fn fetch_item(&self, id: u64) -> SourceFuture<ItemDetail>;

    /// Enumerate the categories the catalog knows about.
    fn fetch_categories(&self) -> SourceFuture<Vec<Category>>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    fn fetch_page(&self, key: &FetchKey, skip: usize, limit: usize) -> SourceFuture<Page> {
        (**self).fetch_page(key, skip, limit)
    }

    fn fetch_item(&self, id: u64) -> SourceFuture<ItemDetail> {
        (**self).fetch_item(id)
    }

    fn fetch_categories(&self) -> SourceFuture<Vec<Category>> {
        (**self).fetch_categories()
    }
}

/// A page request as seen by [`MemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub key: FetchKey,
    pub skip: usize,
    pub limit: usize,
}

/// In-process catalog used by tests and the offline mode.
///
/// Clones share state, so a test can keep one handle to inspect the request
/// log while the app owns another.
#[derive(Clone)]
pub struct MemoryCatalog {
    inner: Arc<Inner>,
}

struct Inner {
    items: Vec<ItemDetail>,
    requests: Mutex<Vec<PageQuery>>,
    failing: AtomicBool,
}

const DEMO_CATEGORIES: &[(&str, &[&str])] = &[
    ("beauty", &["Mascara", "Eyeshadow Palette", "Powder Canister", "Lipstick", "Nail Polish"]),
    ("fragrances", &["Eau de Parfum", "Cologne", "Body Mist", "Perfume Oil"]),
    ("furniture", &["Annibale Bed", "Bedside Table", "Office Chair", "Sofa", "Bookshelf"]),
    ("groceries", &["Apple", "Beef Steak", "Cat Food", "Cooking Oil", "Green Bell Pepper"]),
    ("laptops", &["Notebook 14", "Ultrabook 13", "Gaming Laptop", "Convertible 2-in-1"]),
    ("mens-shirts", &["Blue & Black Check Shirt", "Gigabyte Aorus Tee", "Plaid Shirt"]),
    ("smartphones", &["Phone X", "Phone Mini", "Phone Pro Max", "Flip Phone"]),
];

const DEMO_FINISHES: &[&str] = &["Classic", "Deluxe", "Essential", "Premium", "Travel"];

impl MemoryCatalog {
    pub fn new(items: Vec<ItemDetail>) -> Self {
        Self {
            inner: Arc::new(Inner {
                items,
                requests: Mutex::new(Vec::new()),
                failing: AtomicBool::new(false),
            }),
        }
    }

    /// `count` items titled `Item 1..=count`, all in `category`.
    pub fn numbered(count: usize, category: &str) -> Self {
        let items = (1..=count)
            .map(|n| ItemDetail {
                id: n as u64,
                title: format!("Item {n}"),
                description: String::new(),
                category: category.to_string(),
                price: n as f64,
                rating: 0.0,
                brand: None,
                stock: None,
                tags: Vec::new(),
                images: Vec::new(),
                thumbnail: String::new(),
            })
            .collect();
        Self::new(items)
    }

    /// A deterministic sample catalog for running without a network.
    pub fn demo() -> Self {
        let mut items = Vec::new();
        let mut id = 0u64;
        for finish in DEMO_FINISHES {
            for (slug, nouns) in DEMO_CATEGORIES {
                for noun in nouns.iter() {
                    id += 1;
                    items.push(ItemDetail {
                        id,
                        title: format!("{finish} {noun}"),
                        description: format!("A {} {} from the {} aisle.", finish.to_lowercase(), noun.to_lowercase(), slug),
                        category: slug.to_string(),
                        price: ((id * 37) % 2000) as f64 / 10.0 + 0.99,
                        rating: ((id * 13) % 50) as f64 / 10.0,
                        brand: Some(format!("{finish} Co.")),
                        stock: Some((id * 7) % 120),
                        tags: vec![slug.to_string(), finish.to_lowercase()],
                        images: Vec::new(),
                        thumbnail: String::new(),
                    });
                }
            }
        }
        Self::new(items)
    }

    /// Make every subsequent call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Every page request received so far, in arrival order.
    pub fn requests(&self) -> Vec<PageQuery> {
        self.inner
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn is_failing(&self) -> bool {
        self.inner.failing.load(Ordering::SeqCst)
    }

    fn matching(&self, key: &FetchKey) -> Vec<Item> {
        let items = self.inner.items.iter();
        match key.mode() {
            FetchMode::Search(q) => {
                let needle = q.to_lowercase();
                items
                    .filter(|item| {
                        item.title.to_lowercase().contains(&needle)
                            || item.description.to_lowercase().contains(&needle)
                    })
                    .map(ItemDetail::summary)
                    .collect()
            }
            FetchMode::Category(slug) => items
                .filter(|item| item.category == slug)
                .map(ItemDetail::summary)
                .collect(),
            FetchMode::All => items.map(ItemDetail::summary).collect(),
        }
    }
}

impl CatalogSource for MemoryCatalog {
    fn fetch_page(&self, key: &FetchKey, skip: usize, limit: usize) -> SourceFuture<Page> {
        self.inner
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PageQuery {
                key: key.clone(),
                skip,
                limit,
            });

        let result = if self.is_failing() {
            Err(TransportError::new("Failed to fetch products"))
        } else {
            let matching = self.matching(key);
            let total = matching.len();
            let products = matching.into_iter().skip(skip).take(limit).collect();
            Ok(Page {
                products,
                total,
                skip,
                limit,
            })
        };
        Box::pin(futures::future::ready(result))
    }

    fn fetch_item(&self, id: u64) -> SourceFuture<ItemDetail> {
        let result = if self.is_failing() {
            Err(TransportError::new("Failed to fetch product detail"))
        } else {
            self.inner
                .items
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .ok_or_else(|| TransportError::new("Failed to fetch product detail"))
        };
        Box::pin(futures::future::ready(result))
    }

    fn fetch_categories(&self) -> SourceFuture<Vec<Category>> {
        let result = if self.is_failing() {
            Err(TransportError::new("Failed to fetch categories"))
        } else {
            let mut categories: Vec<Category> = Vec::new();
            for item in &self.inner.items {
                if !categories.iter().any(|c| c.slug == item.category) {
                    categories.push(Category {
                        slug: item.category.clone(),
                        name: display_name(&item.category),
                    });
                }
            }
            Ok(categories)
        };
        Box::pin(futures::future::ready(result))
    }
}

/// `mens-shirts` -> `Mens Shirts`.
fn display_name(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
