//! **aisle** -- browse a paged product catalog in the terminal.
//!
//! The binary wires these pieces together; they are public so the scenario
//! tests can drive [`CatalogApp`] headlessly.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`app`] | The [`CatalogApp`] model: focus, keys, fetch orchestration |
//! | [`api`] | [`HttpCatalog`], a [`CatalogSource`](aisle_engine::CatalogSource) over HTTP |
//! | [`config`] | TOML settings with command-line overrides |
//! | [`location`] | Shareable `q=...&category=...&page=...` locations |
//! | [`store`] | Where the position is kept between runs |
//! | [`logging`] | File logging via `tracing-subscriber` |

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod store;

pub use api::HttpCatalog;
pub use app::{AppContext, CatalogApp, Flags, Focus, Msg};
pub use cli::Cli;
pub use config::Settings;
pub use error::AppError;
pub use store::{FileStore, MemoryStore, PositionStore};
