//! The `{query, category, page}` position and its sync to a persisted,
//! shareable form.

use crate::debounce::{Debounce, DebounceTicket};
use crate::key::FetchKey;
use std::collections::BTreeMap;
use std::time::Duration;

/// Flat key/value form of a position, as stored and shared.
pub type PositionParams = BTreeMap<String, String>;

pub const QUERY_PARAM: &str = "q";
pub const CATEGORY_PARAM: &str = "category";
pub const PAGE_PARAM: &str = "page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPosition {
    pub query: String,
    pub category: String,
    /// 1-based, never 0.
    pub page: u32,
}

impl Default for NavigationPosition {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: String::new(),
            page: 1,
        }
    }
}

impl NavigationPosition {
    /// Defaults are omitted, so the default position encodes to an empty map.
    pub fn to_params(&self) -> PositionParams {
        let mut params = PositionParams::new();
        if !self.query.is_empty() {
            params.insert(QUERY_PARAM.to_string(), self.query.clone());
        }
        if !self.category.is_empty() {
            params.insert(CATEGORY_PARAM.to_string(), self.category.clone());
        }
        if self.page > 1 {
            params.insert(PAGE_PARAM.to_string(), self.page.to_string());
        }
        params
    }

    /// Missing keys take their defaults. A page that does not parse, or is
    /// below 1, becomes 1. Unknown keys are ignored.
    pub fn from_params(params: &PositionParams) -> Self {
        let page = params
            .get(PAGE_PARAM)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        Self {
            query: params.get(QUERY_PARAM).cloned().unwrap_or_default(),
            category: params.get(CATEGORY_PARAM).cloned().unwrap_or_default(),
            page,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A write the host owes the persisted position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionWrite {
    Replace(PositionParams),
    /// Remove the persisted position entirely.
    Clear,
}

/// Owns the live navigation state and decides what gets persisted.
///
/// The query has two faces: the text as typed, echoed immediately, and the
/// debounced value that feeds the fetch key and the persisted position.
/// Category and page changes apply at once.
#[derive(Debug, Clone)]
pub struct NavigationSync {
    query_input: String,
    query: Debounce<String>,
    category: String,
    page: u32,
    written: PositionParams,
    pending: Option<PositionWrite>,
}

impl NavigationSync {
    /// Seed from whatever is already persisted.
    ///
    /// A non-canonical stored form (say `page=0`) is queued for rewrite.
    pub fn seeded(params: &PositionParams, query_delay: Duration) -> Self {
        let position = NavigationPosition::from_params(params);
        let mut sync = Self {
            query_input: position.query.clone(),
            query: Debounce::new(position.query, query_delay),
            category: position.category,
            page: position.page,
            written: params.clone(),
            pending: None,
        };
        sync.sync();
        sync
    }

    /// Record a keystroke. The page drops to 1 right away.
    ///
    /// The returned ticket must be passed to [`settle_query`] once the
    /// debounce delay has elapsed.
    ///
    /// [`settle_query`]: NavigationSync::settle_query
    pub fn type_query(&mut self, text: impl Into<String>) -> DebounceTicket {
        let text = text.into();
        self.query_input.clone_from(&text);
        self.page = 1;
        let ticket = self.query.push(text);
        self.sync();
        ticket
    }

    /// Apply a debounce timer. Returns `true` when the debounced query moved.
    pub fn settle_query(&mut self, ticket: DebounceTicket) -> bool {
        if self.query.settle(ticket).is_none() {
            return false;
        }
        self.sync();
        true
    }

    /// Select a category (empty for all). The page drops to 1.
    ///
    /// Returns `true` when the category changed.
    pub fn pick_category(&mut self, slug: impl Into<String>) -> bool {
        let slug = slug.into();
        let changed = slug != self.category;
        self.category = slug;
        self.page = 1;
        self.sync();
        changed
    }

    /// Count one more page scrolled into view.
    ///
    /// Ignored while a typed query is still settling: the rows on screen
    /// belong to the previous query and the page has already dropped to 1.
    /// Returns `true` when the page moved.
    pub fn advance_page(&mut self) -> bool {
        if self.query.is_pending() {
            return false;
        }
        self.page = self.page.saturating_add(1);
        self.sync();
        true
    }

    /// Back to defaults, clearing the persisted position instead of
    /// writing defaults into it.
    pub fn reset(&mut self) {
        self.query_input.clear();
        self.query.force(String::new());
        self.category.clear();
        self.page = 1;
        self.written.clear();
        self.pending = Some(PositionWrite::Clear);
    }

    /// The key the page cache should be showing.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey::new(self.query.value(), &self.category)
    }

    /// The settled position.
    pub fn position(&self) -> NavigationPosition {
        NavigationPosition {
            query: self.query.value().clone(),
            category: self.category.clone(),
            page: self.page,
        }
    }

    pub fn pending_write(&self) -> Option<&PositionWrite> {
        self.pending.as_ref()
    }

    pub fn take_write(&mut self) -> Option<PositionWrite> {
        self.pending.take()
    }

    /// The query text as typed, which may be ahead of the debounced value.
    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn query_delay(&self) -> Duration {
        self.query.delay()
    }

    fn sync(&mut self) {
        let params = self.position().to_params();
        if params != self.written {
            self.written.clone_from(&params);
            self.pending = Some(PositionWrite::Replace(params));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DELAY: Duration = Duration::from_millis(300);

    fn params(pairs: &[(&str, &str)]) -> PositionParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn position_round_trips() {
        let position = NavigationPosition {
            query: "shoe".into(),
            category: "mens-shirts".into(),
            page: 3,
        };
        let encoded = position.to_params();
        assert_eq!(
            encoded,
            params(&[("q", "shoe"), ("category", "mens-shirts"), ("page", "3")])
        );
        assert_eq!(NavigationPosition::from_params(&encoded), position);
    }

    #[test]
    fn default_position_encodes_empty() {
        assert!(NavigationPosition::default().to_params().is_empty());
        assert!(NavigationPosition::from_params(&PositionParams::new()).is_default());
    }

    #[test]
    fn bad_page_decodes_to_one() {
        for raw in ["0", "-2", "abc", ""] {
            let position = NavigationPosition::from_params(&params(&[("page", raw)]));
            assert_eq!(position.page, 1, "page={raw:?}");
        }
    }

    #[test]
    fn seeding_restores_persisted_position() {
        let sync = NavigationSync::seeded(&params(&[("q", "phone"), ("page", "4")]), DELAY);
        assert_eq!(sync.query_input(), "phone");
        assert_eq!(sync.page(), 4);
        assert_eq!(sync.fetch_key(), FetchKey::new("phone", ""));
        assert_eq!(sync.pending_write(), None);
    }

    #[test]
    fn seeding_canonicalizes_stored_form() {
        let mut sync = NavigationSync::seeded(&params(&[("page", "0"), ("utm", "x")]), DELAY);
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(PositionParams::new())));
    }

    #[test]
    fn typing_resets_page_before_debounce() {
        let mut sync = NavigationSync::seeded(&params(&[("page", "5")]), DELAY);
        let ticket = sync.type_query("lap");

        assert_eq!(sync.page(), 1);
        assert_eq!(sync.query_input(), "lap");
        assert_eq!(sync.fetch_key(), FetchKey::all());
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(PositionParams::new())));

        assert!(sync.settle_query(ticket));
        assert_eq!(sync.fetch_key(), FetchKey::new("lap", ""));
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(params(&[("q", "lap")]))));
    }

    #[test]
    fn keystrokes_write_once_after_settling() {
        let mut sync = NavigationSync::seeded(&PositionParams::new(), DELAY);
        let tickets: Vec<_> = ["a", "ab", "abc"].into_iter().map(|t| sync.type_query(t)).collect();
        assert_eq!(sync.take_write(), None);

        assert!(!sync.settle_query(tickets[0]));
        assert!(!sync.settle_query(tickets[1]));
        assert!(sync.settle_query(tickets[2]));
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(params(&[("q", "abc")]))));
    }

    #[test]
    fn picking_category_resets_page() {
        let mut sync = NavigationSync::seeded(&params(&[("q", "phone"), ("page", "5")]), DELAY);
        assert!(sync.pick_category("smartphones"));
        assert_eq!(
            sync.position(),
            NavigationPosition {
                query: "phone".into(),
                category: "smartphones".into(),
                page: 1,
            }
        );
    }

    #[test]
    fn advancing_page_is_persisted() {
        let mut sync = NavigationSync::seeded(&PositionParams::new(), DELAY);
        assert!(sync.advance_page());
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(params(&[("page", "2")]))));
    }

    #[test]
    fn page_holds_while_query_settles() {
        let mut sync = NavigationSync::seeded(&params(&[("page", "3")]), DELAY);
        let ticket = sync.type_query("item");
        sync.take_write();

        assert!(!sync.advance_page());
        assert_eq!(sync.page(), 1);
        assert_eq!(sync.take_write(), None);

        assert!(sync.settle_query(ticket));
        assert_eq!(sync.position().page, 1);
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(params(&[("q", "item")]))));
        assert!(sync.advance_page());
        assert_eq!(sync.page(), 2);
    }

    #[test]
    fn reset_clears_instead_of_writing_defaults() {
        let mut sync = NavigationSync::seeded(
            &params(&[("q", "shoe"), ("category", "mens-shirts"), ("page", "3")]),
            DELAY,
        );
        let ticket = sync.type_query("shoes");
        sync.take_write();

        sync.reset();
        assert_eq!(sync.take_write(), Some(PositionWrite::Clear));
        assert!(sync.position().is_default());
        assert_eq!(sync.query_input(), "");
        assert!(!sync.settle_query(ticket));

        assert!(sync.advance_page());
        assert_eq!(sync.take_write(), Some(PositionWrite::Replace(params(&[("page", "2")]))));
    }
}
