//! The accumulating page cache.
//!
//! One [`PageCache`] owns the accumulated list for exactly one [`FetchKey`]
//! at a time. It never performs I/O: every transition that needs a fetch
//! returns a [`PageRequest`] and the host feeds the outcome back through
//! [`PageCache::receive`]. Results are matched by [`PageTicket`], so a page
//! for a key that has since been replaced is dropped without touching state.

use crate::error::TransportError;
use crate::item::{Item, Page};
use crate::key::FetchKey;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Lifecycle of the active key.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    /// First page in flight.
    Loading,
    Ready,
    /// A follow-up page is in flight.
    LoadingMore,
    Exhausted,
    /// The last fetch failed. Whatever was accumulated before is kept.
    Error(TransportError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading | LoadState::LoadingMore)
    }
}

/// Identifies which request a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTicket {
    epoch: u64,
    skip: usize,
}

impl PageTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn skip(&self) -> usize {
        self.skip
    }
}

/// A fetch the host should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub key: FetchKey,
    pub skip: usize,
    pub limit: usize,
    pub ticket: PageTicket,
}

/// What [`PageCache::receive`] did with a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Receipt {
    Appended { received: usize, exhausted: bool },
    Failed(TransportError),
    /// The result did not match the outstanding request and was ignored.
    Stale,
}

#[derive(Debug, Clone)]
struct Snapshot {
    items: Vec<Item>,
    total: usize,
    pages: u32,
    exhausted: bool,
    captured: Instant,
}

pub struct PageCache {
    key: FetchKey,
    limit: usize,
    items: Vec<Item>,
    total: usize,
    pages: u32,
    state: LoadState,
    epoch: u64,
    retained: Option<LruCache<FetchKey, Snapshot>>,
    stale_after: Duration,
}

impl PageCache {
    /// A cache with no recent-key retention.
    ///
    /// `limit` is clamped to at least 1.
    pub fn new(limit: usize) -> Self {
        Self {
            key: FetchKey::all(),
            limit: limit.max(1),
            items: Vec::new(),
            total: 0,
            pages: 0,
            state: LoadState::Idle,
            epoch: 0,
            retained: None,
            stale_after: Duration::ZERO,
        }
    }

    /// Keep up to `capacity` abandoned keys and restore them on [`reset`]
    /// when they are younger than `stale_after`.
    ///
    /// [`reset`]: PageCache::reset
    pub fn with_retention(mut self, capacity: usize, stale_after: Duration) -> Self {
        self.retained = NonZeroUsize::new(capacity).map(LruCache::new);
        self.stale_after = stale_after;
        self
    }

    /// Switch to `key` and start over.
    ///
    /// Returns the first-page request, or `None` when a fresh snapshot of
    /// `key` was restored instead.
    pub fn reset(&mut self, key: FetchKey) -> Option<PageRequest> {
        self.reset_at(key, Instant::now())
    }

    /// [`reset`](PageCache::reset) with an explicit clock reading.
    pub fn reset_at(&mut self, key: FetchKey, now: Instant) -> Option<PageRequest> {
        self.capture(now);

        self.epoch += 1;
        self.key = key;
        self.items.clear();
        self.total = 0;
        self.pages = 0;
        self.state = LoadState::Idle;

        if self.restore(now) {
            tracing::debug!(key = %self.key, epoch = self.epoch, items = self.items.len(), "restored retained pages");
            return None;
        }

        self.state = LoadState::Loading;
        Some(self.request())
    }

    /// Request the page after the cursor. Only valid in `Ready`.
    pub fn load_next(&mut self) -> Option<PageRequest> {
        if self.state != LoadState::Ready {
            return None;
        }
        self.state = LoadState::LoadingMore;
        Some(self.request())
    }

    /// Re-issue the request that failed, at the same `skip`.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if !matches!(self.state, LoadState::Error(_)) {
            return None;
        }
        self.state = if self.items.is_empty() {
            LoadState::Loading
        } else {
            LoadState::LoadingMore
        };
        Some(self.request())
    }

    /// Apply the outcome of a request previously returned by this cache.
    pub fn receive(&mut self, ticket: PageTicket, result: Result<Page, TransportError>) -> Receipt {
        if ticket.epoch != self.epoch || ticket.skip != self.cursor() || !self.state.is_loading() {
            tracing::debug!(
                epoch = ticket.epoch,
                skip = ticket.skip,
                current_epoch = self.epoch,
                "dropping stale page"
            );
            return Receipt::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(key = %self.key, skip = ticket.skip, reason = err.reason(), "page fetch failed");
                self.state = LoadState::Error(err.clone());
                return Receipt::Failed(err);
            }
        };

        let received = page.products.len();
        self.items.extend(page.products);
        self.total = page.total;
        self.pages += 1;

        if self.items.len() > self.total {
            tracing::warn!(
                key = %self.key,
                items = self.items.len(),
                total = self.total,
                "server returned more rows than its total, truncating"
            );
            self.items.truncate(self.total);
        }

        let exhausted = self.cursor() >= self.total || received == 0;
        self.state = if exhausted {
            LoadState::Exhausted
        } else {
            LoadState::Ready
        };
        tracing::debug!(
            key = %self.key,
            received,
            cursor = self.cursor(),
            total = self.total,
            exhausted,
            "page received"
        );
        Receipt::Appended { received, exhausted }
    }

    pub fn key(&self) -> &FetchKey {
        &self.key
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Offset of the next page. Always the accumulated length.
    pub fn cursor(&self) -> usize {
        self.items.len()
    }

    /// Latest total reported by the server.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_next_page(&self) -> bool {
        self.state != LoadState::Exhausted
    }

    pub fn error(&self) -> Option<&TransportError> {
        match &self.state {
            LoadState::Error(err) => Some(err),
            _ => None,
        }
    }

    fn request(&self) -> PageRequest {
        let skip = self.cursor();
        tracing::debug!(key = %self.key, skip, limit = self.limit, epoch = self.epoch, "page requested");
        PageRequest {
            key: self.key.clone(),
            skip,
            limit: self.limit,
            ticket: PageTicket {
                epoch: self.epoch,
                skip,
            },
        }
    }

    fn capture(&mut self, now: Instant) {
        let Some(retained) = self.retained.as_mut() else {
            return;
        };
        let exhausted = match self.state {
            LoadState::Ready => false,
            LoadState::Exhausted => true,
            _ => return,
        };
        retained.put(
            self.key.clone(),
            Snapshot {
                items: std::mem::take(&mut self.items),
                total: self.total,
                pages: self.pages,
                exhausted,
                captured: now,
            },
        );
    }

    fn restore(&mut self, now: Instant) -> bool {
        let Some(retained) = self.retained.as_mut() else {
            return false;
        };
        let Some(snapshot) = retained.pop(&self.key) else {
            return false;
        };
        if now.saturating_duration_since(snapshot.captured) >= self.stale_after {
            return false;
        }
        self.items = snapshot.items;
        self.total = snapshot.total;
        self.pages = snapshot.pages;
        self.state = if snapshot.exhausted {
            LoadState::Exhausted
        } else {
            LoadState::Ready
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn items(range: std::ops::Range<u64>) -> Vec<Item> {
        range
            .map(|id| Item {
                id,
                title: format!("Item {id}"),
                category: String::new(),
                price: 0.0,
                rating: 0.0,
                thumbnail: String::new(),
            })
            .collect()
    }

    /// Answer `req` from a catalog of `total` numbered rows.
    fn serve(req: &PageRequest, total: usize) -> Page {
        let end = (req.skip + req.limit).min(total);
        Page {
            products: items(req.skip as u64..end as u64),
            total,
            skip: req.skip,
            limit: req.limit,
        }
    }

    #[test]
    fn forty_five_rows_load_in_three_pages() {
        let mut cache = PageCache::new(20);
        let first = cache.reset(FetchKey::all()).unwrap();
        assert_eq!(cache.state(), &LoadState::Loading);

        cache.receive(first.ticket, Ok(serve(&first, 45)));
        assert_eq!(cache.cursor(), 20);

        let second = cache.load_next().unwrap();
        assert_eq!(second.skip, 20);
        cache.receive(second.ticket, Ok(serve(&second, 45)));

        let third = cache.load_next().unwrap();
        let receipt = cache.receive(third.ticket, Ok(serve(&third, 45)));

        assert_eq!(receipt, Receipt::Appended { received: 5, exhausted: true });
        assert_eq!(cache.state(), &LoadState::Exhausted);
        assert_eq!(cache.cursor(), 45);
        assert_eq!(cache.pages_loaded(), 3);
        assert!(cache.load_next().is_none());
    }

    #[test]
    fn at_most_one_request_in_flight() {
        let mut cache = PageCache::new(20);
        let first = cache.reset(FetchKey::all()).unwrap();
        assert!(cache.load_next().is_none());
        cache.receive(first.ticket, Ok(serve(&first, 100)));

        assert!(cache.load_next().is_some());
        assert!(cache.load_next().is_none());
        assert_eq!(cache.state(), &LoadState::LoadingMore);
    }

    #[test]
    fn result_for_replaced_key_is_stale() {
        let mut cache = PageCache::new(20);
        let for_a = cache.reset(FetchKey::new("a", "")).unwrap();
        let for_b = cache.reset(FetchKey::new("b", "")).unwrap();

        assert_eq!(cache.receive(for_a.ticket, Ok(serve(&for_a, 100))), Receipt::Stale);
        assert!(cache.items().is_empty());
        assert_eq!(cache.state(), &LoadState::Loading);

        cache.receive(for_b.ticket, Ok(serve(&for_b, 100)));
        assert_eq!(cache.cursor(), 20);
    }

    #[test]
    fn failure_keeps_rows_and_retry_reuses_skip() {
        let mut cache = PageCache::new(20);
        let first = cache.reset(FetchKey::all()).unwrap();
        cache.receive(first.ticket, Ok(serve(&first, 60)));

        let second = cache.load_next().unwrap();
        let receipt = cache.receive(second.ticket, Err(TransportError::new("boom")));
        assert_eq!(receipt, Receipt::Failed(TransportError::new("boom")));
        assert_eq!(cache.cursor(), 20);
        assert_eq!(cache.error().map(|e| e.reason()), Some("boom"));
        assert!(cache.load_next().is_none());

        let again = cache.retry().unwrap();
        assert_eq!(again.skip, 20);
        assert_eq!(cache.state(), &LoadState::LoadingMore);
    }

    #[test]
    fn first_page_failure_retries_as_loading() {
        let mut cache = PageCache::new(20);
        let first = cache.reset(FetchKey::all()).unwrap();
        cache.receive(first.ticket, Err(TransportError::new("offline")));
        assert!(cache.retry().is_some());
        assert_eq!(cache.state(), &LoadState::Loading);
    }

    #[test]
    fn empty_page_exhausts() {
        let mut cache = PageCache::new(20);
        let first = cache.reset(FetchKey::new("nothing", "")).unwrap();
        let receipt = cache.receive(first.ticket, Ok(serve(&first, 0)));
        assert_eq!(receipt, Receipt::Appended { received: 0, exhausted: true });
        assert!(!cache.has_next_page());
    }

    #[test]
    fn oversized_page_is_truncated_to_total() {
        let mut cache = PageCache::new(20);
        let first = cache.reset(FetchKey::all()).unwrap();
        let page = Page {
            products: items(0..20),
            total: 12,
            skip: 0,
            limit: 20,
        };
        cache.receive(first.ticket, Ok(page));
        assert_eq!(cache.cursor(), 12);
        assert_eq!(cache.state(), &LoadState::Exhausted);
    }

    #[test]
    fn retention_restores_recent_key_without_request() {
        let start = Instant::now();
        let mut cache = PageCache::new(20).with_retention(4, Duration::from_secs(120));
        let all = cache.reset_at(FetchKey::all(), start).unwrap();
        cache.receive(all.ticket, Ok(serve(&all, 50)));

        let beauty = cache.reset_at(FetchKey::new("", "beauty"), start).unwrap();
        cache.receive(beauty.ticket, Ok(serve(&beauty, 5)));

        let restored = cache.reset_at(FetchKey::all(), start + Duration::from_secs(30));
        assert!(restored.is_none());
        assert_eq!(cache.cursor(), 20);
        assert_eq!(cache.state(), &LoadState::Ready);
        assert!(cache.load_next().is_some());
    }

    #[test]
    fn retention_expires() {
        let start = Instant::now();
        let mut cache = PageCache::new(20).with_retention(4, Duration::from_secs(120));
        let all = cache.reset_at(FetchKey::all(), start).unwrap();
        cache.receive(all.ticket, Ok(serve(&all, 50)));
        cache.reset_at(FetchKey::new("x", ""), start);

        let later = cache.reset_at(FetchKey::all(), start + Duration::from_secs(121));
        assert_eq!(later.map(|r| r.skip), Some(0));
        assert!(cache.items().is_empty());
    }

    #[test]
    fn zero_capacity_disables_retention() {
        let mut cache = PageCache::new(20).with_retention(0, Duration::from_secs(120));
        let all = cache.reset(FetchKey::all()).unwrap();
        cache.receive(all.ticket, Ok(serve(&all, 50)));
        cache.reset(FetchKey::new("x", ""));
        assert!(cache.reset(FetchKey::all()).is_some());
    }

    proptest! {
        #[test]
        fn cursor_is_monotonic_and_matches_items(total in 0usize..300, limit in 1usize..50) {
            let mut cache = PageCache::new(limit);
            let mut next = cache.reset(FetchKey::all());
            let mut last_cursor = 0;

            while let Some(req) = next {
                prop_assert_eq!(req.skip, cache.cursor());
                cache.receive(req.ticket, Ok(serve(&req, total)));
                prop_assert_eq!(cache.cursor(), cache.items().len());
                prop_assert!(cache.cursor() <= cache.total());
                prop_assert!(cache.cursor() > last_cursor || total == 0);
                last_cursor = cache.cursor();
                next = cache.load_next();
            }

            prop_assert_eq!(cache.state(), &LoadState::Exhausted);
            prop_assert_eq!(cache.cursor(), total);
            let expected_pages = total.div_ceil(limit).max(1) as u32;
            prop_assert_eq!(cache.pages_loaded(), expected_pages);
        }
    }
}
