use crate::config::Settings;
use crate::store::PositionStore;
use aisle_engine::CatalogSource;
use aisle_widgets::{Theme, ThemeKind};
use std::sync::Arc;

/// What the app needs from the outside world, built once in `main` (or a
/// test) and handed to [`CatalogApp`](super::CatalogApp) through its flags.
pub struct AppContext {
    pub source: Arc<dyn CatalogSource>,
    pub store: Box<dyn PositionStore>,
    pub settings: Settings,
    pub theme: Theme,
}

impl AppContext {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        store: Box<dyn PositionStore>,
        settings: Settings,
    ) -> Self {
        let theme = Theme::new(ThemeKind::from(settings.ui.theme));
        Self {
            source,
            store,
            settings,
            theme,
        }
    }
}
