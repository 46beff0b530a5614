use aisle_widgets::{Binding, KeyCombination, KeyMap};
use crossterm::event::KeyCode;

/// Bindings active while the product list has focus.
#[derive(Debug, Clone)]
pub struct CatalogKeys {
    pub search: Binding,
    pub category: Binding,
    pub open: Binding,
    pub reset: Binding,
    pub retry: Binding,
    pub share: Binding,
    pub theme: Binding,
    pub quit: Binding,
}

impl Default for CatalogKeys {
    fn default() -> Self {
        Self {
            search: Binding::new(KeyCombination::new(KeyCode::Char('/')), "search"),
            category: Binding::new(KeyCombination::new(KeyCode::Char('c')), "category"),
            open: Binding::new(KeyCombination::new(KeyCode::Enter), "details"),
            reset: Binding::new(KeyCombination::new(KeyCode::Char('r')), "reset"),
            retry: Binding::new(KeyCombination::shift(KeyCode::Char('R')), "retry"),
            share: Binding::new(KeyCombination::new(KeyCode::Char('y')), "link"),
            theme: Binding::new(KeyCombination::new(KeyCode::Char('t')), "theme"),
            quit: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Char('q')),
                    KeyCombination::ctrl(KeyCode::Char('c')),
                ],
                "quit",
            ),
        }
    }
}

impl KeyMap for CatalogKeys {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.search,
            &self.category,
            &self.open,
            &self.reset,
            &self.retry,
            &self.share,
            &self.theme,
            &self.quit,
        ]
    }
}
