//! [`CatalogSource`] over HTTP, for dummyjson-compatible product APIs.
//!
//! | Read | Endpoint |
//! |------|----------|
//! | search | `GET products/search?limit=&skip=&q=` |
//! | category | `GET products/category/{slug}?limit=&skip=` |
//! | all | `GET products?limit=&skip=` |
//! | detail | `GET products/{id}` |
//! | categories | `GET products/categories` |
//!
//! Every failure, whether connect, status, or decode, surfaces as the same
//! [`TransportError`] per read. The underlying cause is logged.

use crate::config::{ApiSettings, ConfigError};
use aisle_engine::{
    CatalogSource, Category, FetchKey, FetchMode, ItemDetail, Page, SourceFuture, TransportError,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;

const USER_AGENT_VALUE: &str = concat!("aisle/", env!("CARGO_PKG_VERSION"));

pub const PRODUCTS_FAILED: &str = "Failed to fetch products";
pub const DETAIL_FAILED: &str = "Failed to fetch product detail";
pub const CATEGORIES_FAILED: &str = "Failed to fetch categories";

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base: Url,
}

impl HttpCatalog {
    pub fn new(settings: &ApiSettings) -> Result<Self, crate::AppError> {
        let base = settings.base_url()?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL for one page of `key`.
    pub fn page_url(&self, key: &FetchKey, skip: usize, limit: usize) -> Result<Url, ConfigError> {
        let mut url = match key.mode() {
            FetchMode::Search(_) => self.endpoint(&["products", "search"])?,
            FetchMode::Category(slug) => self.endpoint(&["products", "category", slug])?,
            FetchMode::All => self.endpoint(&["products"])?,
        };
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &limit.to_string());
            pairs.append_pair("skip", &skip.to_string());
            if let FetchMode::Search(query) = key.mode() {
                pairs.append_pair("q", query);
            }
        }
        Ok(url)
    }

    pub fn item_url(&self, id: u64) -> Result<Url, ConfigError> {
        self.endpoint(&["products", &id.to_string()])
    }

    pub fn categories_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(&["products", "categories"])
    }

    /// Append percent-encoded path segments to the base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::Invalid(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get<T>(&self, url: Result<Url, ConfigError>, reason: &'static str) -> SourceFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.client.clone();
        Box::pin(async move {
            let url = url.map_err(|err| {
                tracing::warn!(error = %err, "bad catalog URL");
                TransportError::new(reason)
            })?;
            tracing::debug!(%url, "GET");
            fetch_json(&client, url.clone()).await.map_err(|err| {
                tracing::warn!(%url, error = %err, "{reason}");
                TransportError::new(reason)
            })
        })
    }
}

async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: Url) -> Result<T, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.json().await
}

impl CatalogSource for HttpCatalog {
    fn fetch_page(&self, key: &FetchKey, skip: usize, limit: usize) -> SourceFuture<Page> {
        self.get(self.page_url(key, skip, limit), PRODUCTS_FAILED)
    }

    fn fetch_item(&self, id: u64) -> SourceFuture<ItemDetail> {
        self.get(self.item_url(id), DETAIL_FAILED)
    }

    fn fetch_categories(&self) -> SourceFuture<Vec<Category>> {
        self.get(self.categories_url(), CATEGORIES_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(base: &str) -> HttpCatalog {
        HttpCatalog::new(&ApiSettings {
            base_url: base.to_string(),
            page_size: 20,
        })
        .unwrap()
    }

    #[test]
    fn search_wins_over_category() {
        let api = catalog("https://dummyjson.com");
        let url = api.page_url(&FetchKey::new("phone", "laptops"), 20, 20).unwrap();
        assert_eq!(url.as_str(), "https://dummyjson.com/products/search?limit=20&skip=20&q=phone");
    }

    #[test]
    fn category_slug_is_a_path_segment() {
        let api = catalog("https://dummyjson.com/");
        let url = api.page_url(&FetchKey::new("", "mens shirts"), 0, 10).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dummyjson.com/products/category/mens%20shirts?limit=10&skip=0"
        );
    }

    #[test]
    fn unfiltered_listing() {
        let api = catalog("http://localhost:3000/api");
        let url = api.page_url(&FetchKey::all(), 40, 20).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/products?limit=20&skip=40");
    }

    #[test]
    fn query_is_form_encoded() {
        let api = catalog("https://dummyjson.com/");
        let url = api.page_url(&FetchKey::new("red & blue", ""), 0, 5).unwrap();
        assert_eq!(url.query(), Some("limit=5&skip=0&q=red+%26+blue"));
    }

    #[test]
    fn detail_and_categories() {
        let api = catalog("https://dummyjson.com/");
        assert_eq!(api.item_url(7).unwrap().as_str(), "https://dummyjson.com/products/7");
        assert_eq!(
            api.categories_url().unwrap().as_str(),
            "https://dummyjson.com/products/categories"
        );
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_generic_reason() {
        let api = catalog("http://127.0.0.1:9/");
        let err = api.fetch_categories().await.unwrap_err();
        assert_eq!(err.reason(), CATEGORIES_FAILED);
    }
}
