//! Catalog records as they arrive from the paged API.
//!
//! Only `id` matters to the engine; the remaining fields are carried for
//! display.

use serde::{Deserialize, Serialize};

/// One product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub thumbnail: String,
}

/// The full record returned by a single-item lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
}

impl ItemDetail {
    /// The row projection of this record.
    pub fn summary(&self) -> Item {
        Item {
            id: self.id,
            title: self.title.clone(),
            category: self.category.clone(),
            price: self.price,
            rating: self.rating,
            thumbnail: self.thumbnail.clone(),
        }
    }
}

/// One slice of a result set.
///
/// `total` is the size of the whole filtered set as last reported by the
/// server, not the size of this page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub products: Vec<Item>,
    pub total: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
}

/// A category as listed by the catalog: a stable slug plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}
