//! Key bindings and the key map trait used to build hint lines.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// One action bound to one or more key combinations.
#[derive(Debug, Clone)]
pub struct Binding {
    pub keys: Vec<KeyCombination>,
    /// Short human-readable name of the action ("search", "reset").
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

/// A key press plus the modifiers that must be held with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Bind a single key combination.
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], description)
    }

    /// Bind several combinations to the same action.
    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` matches any of the combinations.
    ///
    /// Character keys compare modifiers exactly apart from Shift, which
    /// terminals report inconsistently for upper-case letters.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        self.keys.iter().any(|k| k.matches(event))
    }

    /// Enable or disable the binding (builder form).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Label of the first combination, e.g. `ctrl+c` or `/`.
    pub fn label(&self) -> String {
        self.keys.first().map(KeyCombination::label).unwrap_or_default()
    }
}

impl KeyCombination {
    /// `code` with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// `code` with Ctrl held.
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// `code` with Shift held.
    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        if self.code != event.code {
            return false;
        }
        match self.code {
            KeyCode::Char(_) => {
                event.modifiers.difference(KeyModifiers::SHIFT)
                    == self.modifiers.difference(KeyModifiers::SHIFT)
            }
            _ => event.modifiers == self.modifiers,
        }
    }

    /// Human-readable label such as `ctrl+c`, `enter` or `/`.
    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::PageUp => "pgup".to_string(),
            KeyCode::PageDown => "pgdn".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::Tab => "tab".to_string(),
            other => format!("{other:?}").to_lowercase(),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("ctrl+{key}")
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            format!("alt+{key}")
        } else {
            key
        }
    }
}

/// Types that expose their bindings for hint lines.
pub trait KeyMap {
    /// The handful of bindings worth showing at all times.
    fn short_help(&self) -> Vec<&Binding>;
}

/// Render bindings as `key desc · key desc`.
pub fn hint_line<'a>(bindings: &[&Binding], key_style: Style, desc_style: Style) -> Line<'a> {
    let mut spans = Vec::new();
    for (i, binding) in bindings.iter().filter(|b| b.enabled).enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", desc_style));
        }
        spans.push(Span::styled(binding.label(), key_style));
        spans.push(Span::styled(format!(" {}", binding.description), desc_style));
    }
    Line::from(spans)
}
