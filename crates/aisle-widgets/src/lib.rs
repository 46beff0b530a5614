//! Terminal components for the **aisle** catalog browser.
//!
//! Stateful widgets implement [`aisle_runtime::Component`] and are embedded
//! by the application model, which forwards their messages and lifts their
//! commands with [`Command::map`](aisle_runtime::Command::map).
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`search_input`] | Single-line query field |
//! | [`category_picker`] | Filterable category list shown as an overlay |
//! | [`product_table`] | Windowed product rows with a trailing loader row |
//! | [`detail_drawer`] | Right-side panel showing one product |
//! | [`spinner`] | Animated loading indicator |
//! | [`status_bar`] | Three-section status line |
//!
//! Supporting modules: [`key`] (bindings), [`overlay`] (overlay geometry),
//! [`theme`] (palettes), [`text`] (width-aware truncation).

pub mod category_picker;
pub mod detail_drawer;
pub mod key;
pub mod overlay;
pub mod product_table;
pub mod search_input;
pub mod spinner;
pub mod status_bar;
pub mod text;
pub mod theme;

pub use category_picker::CategoryPicker;
pub use detail_drawer::{DetailDrawer, DetailState};
pub use key::{Binding, KeyCombination, KeyMap};
pub use product_table::ProductTable;
pub use search_input::SearchInput;
pub use spinner::Spinner;
pub use status_bar::StatusBar;
pub use theme::{Theme, ThemeKind};
