//! Incremental loading and windowing for a paged product catalog.
//!
//! Everything here is synchronous state. The only asynchronous surface is
//! [`CatalogSource`], whose futures the host drives and whose results it
//! hands back to a [`PageCache`]. Timers for [`Debounce`] are the host's
//! business as well; the engine only compares tickets.
//!
//! The loop a host runs:
//!
//! 1. [`NavigationSync`] produces a [`FetchKey`].
//! 2. [`PageCache::reset`] turns a new key into a [`PageRequest`].
//! 3. [`WindowLayout`] maps the scroll offset to a [`VisibleRange`].
//! 4. [`LoadMoreTrigger::observe`] says when to call [`PageCache::load_next`].
//! 5. Landed scroll loads advance the page in [`NavigationSync`].

pub mod cache;
pub mod debounce;
pub mod error;
pub mod item;
pub mod key;
pub mod navigation;
pub mod source;
pub mod trigger;
pub mod window;

pub use cache::{LoadState, PageCache, PageRequest, PageTicket, Receipt};
pub use debounce::{Debounce, DebounceTicket};
pub use error::TransportError;
pub use item::{Category, Item, ItemDetail, Page};
pub use key::{FetchKey, FetchMode};
pub use navigation::{NavigationPosition, NavigationSync, PositionParams, PositionWrite};
pub use source::{CatalogSource, MemoryCatalog, PageQuery, SourceFuture};
pub use trigger::{LoadMoreTrigger, LoadOrigin};
pub use window::{RowSlot, VisibleRange, WindowLayout};
