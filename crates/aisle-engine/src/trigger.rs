//! Decides when the visible range has reached the end of what is loaded.

use crate::cache::{LoadState, PageCache, PageTicket, Receipt};
use crate::window::VisibleRange;

/// Why a next-page load was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// The user scrolled to the loader row.
    Scroll,
    /// Replaying pages up to a seeded page number.
    CatchUp,
}

/// Fires [`PageCache::load_next`] at most once per boundary crossing and
/// tracks the human-facing page counter that scroll loads advance.
///
/// A crossing is identified by the cache epoch and the row count at the time
/// it fired. Both change whenever a page lands or the key is replaced, which
/// re-arms the trigger.
#[derive(Debug, Default)]
pub struct LoadMoreTrigger {
    fired: Option<(u64, usize)>,
    in_flight: Option<(u64, LoadOrigin)>,
}

impl LoadMoreTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a freshly computed visible range.
    ///
    /// Returns `true` when the caller should call `load_next` now.
    pub fn observe(&mut self, visible: &VisibleRange, row_count: usize, cache: &PageCache) -> bool {
        if *cache.state() != LoadState::Ready || !cache.has_next_page() {
            return false;
        }
        if visible.last + 1 < row_count {
            return false;
        }
        let crossing = (cache.epoch(), row_count);
        if self.fired == Some(crossing) {
            return false;
        }
        self.fired = Some(crossing);
        self.in_flight = Some((cache.epoch(), LoadOrigin::Scroll));
        tracing::trace!(epoch = cache.epoch(), row_count, "load-more boundary reached");
        true
    }

    /// Whether another page is needed to reach `target_page` pages.
    ///
    /// Loads started this way do not advance the page counter.
    pub fn catch_up(&mut self, target_page: u32, cache: &PageCache) -> bool {
        if *cache.state() != LoadState::Ready || cache.pages_loaded() >= target_page {
            return false;
        }
        self.in_flight = Some((cache.epoch(), LoadOrigin::CatchUp));
        true
    }

    /// Feed back what the cache did with a result.
    ///
    /// Returns `true` when the page counter should advance: a scroll-started
    /// load for the current epoch landed. A failure keeps the origin, so a
    /// manual retry that succeeds still counts.
    pub fn settle(&mut self, ticket: PageTicket, receipt: &Receipt) -> bool {
        match receipt {
            Receipt::Stale | Receipt::Failed(_) => false,
            Receipt::Appended { .. } => match self.in_flight.take() {
                Some((epoch, origin)) if epoch == ticket.epoch() => origin == LoadOrigin::Scroll,
                _ => false,
            },
        }
    }

    /// Origin of the load currently outstanding, if any.
    pub fn origin(&self) -> Option<LoadOrigin> {
        self.in_flight.map(|(_, origin)| origin)
    }

    /// Keep the outstanding load, if any, from advancing the page counter.
    ///
    /// Used when navigation moves the page back to 1 while the key, and so
    /// the cache epoch, stays the same.
    pub fn forget_origin(&mut self) {
        self.in_flight = None;
    }

    pub fn reset(&mut self) {
        self.fired = None;
        self.in_flight = None;
    }
}
