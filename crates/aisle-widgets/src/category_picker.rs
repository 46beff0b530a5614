//! Category picker overlay.
//!
//! A filterable list whose first entry is always "All categories" (the empty
//! slug). Typing narrows the list by name or slug; Enter picks, Esc closes.

use crate::overlay::{centered_fixed, render_overlay};
use crate::text::truncate;
use crate::theme::Theme;
use aisle_engine::Category;
use aisle_runtime::{Command, Component};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const ALL_LABEL: &str = "All categories";

/// Messages for [`CategoryPicker`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw key input routed here by the host.
    KeyPress(KeyEvent),
    /// A slug was chosen; empty means all categories.
    Picked(String),
    Dismissed,
}

/// Filterable overlay list of categories, with "All categories" first.
///
/// Typing narrows the list, Up/Down move the cursor, Enter emits
/// [`Message::Picked`] and Esc emits [`Message::Dismissed`]. The host closes
/// the picker when it handles either message.
///
/// ```rust,ignore
/// let mut picker = CategoryPicker::new();
/// picker.set_categories(categories);
/// picker.open(nav.category());
/// ```
pub struct CategoryPicker {
    categories: Vec<Category>,
    filter: String,
    /// Indices into the entry list (0 is "All", n + 1 is `categories[n]`).
    matches: Vec<usize>,
    cursor: usize,
    open: bool,
    max_visible: usize,
    theme: Theme,
}

impl CategoryPicker {
    /// Create a closed picker with no categories.
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            filter: String::new(),
            matches: vec![0],
            cursor: 0,
            open: false,
            max_visible: 12,
            theme: Theme::default(),
        }
    }

    /// Cap the number of rows shown at once (at least 1).
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self
    }

    /// Restyle with `theme`.
    pub fn set_theme(&mut self, theme: &Theme) {
        self.theme = theme.clone();
    }

    /// Replace the category list and reapply the current filter.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        self.refilter();
    }

    /// The full category list, unfiltered.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Open with the cursor on `current` (or on "All" when it is unknown).
    pub fn open(&mut self, current: &str) {
        self.open = true;
        self.filter.clear();
        self.refilter();
        self.cursor = self
            .matches
            .iter()
            .position(|&entry| self.entry_slug(entry) == current)
            .unwrap_or(0);
    }

    /// Hide the overlay. The filter is cleared on the next open.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether the overlay is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Text typed into the filter so far.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Number of entries passing the filter, "All" included.
    pub fn visible_entries(&self) -> usize {
        self.matches.len()
    }

    /// Slug under the cursor.
    pub fn highlighted(&self) -> Option<&str> {
        self.matches.get(self.cursor).map(|&entry| self.entry_slug(entry))
    }

    /// Display name for `slug`, falling back to the slug itself.
    pub fn name_of<'a>(&'a self, slug: &'a str) -> &'a str {
        if slug.is_empty() {
            return ALL_LABEL;
        }
        self.categories
            .iter()
            .find(|c| c.slug == slug)
            .map_or(slug, |c| c.name.as_str())
    }

    fn entry_slug(&self, entry: usize) -> &str {
        match entry {
            0 => "",
            n => self.categories.get(n - 1).map_or("", |c| c.slug.as_str()),
        }
    }

    fn entry_name(&self, entry: usize) -> &str {
        match entry {
            0 => ALL_LABEL,
            n => self.categories.get(n - 1).map_or("", |c| c.name.as_str()),
        }
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.matches = std::iter::once(0)
            .chain((1..=self.categories.len()).filter(|&entry| {
                needle.is_empty()
                    || self.entry_name(entry).to_lowercase().contains(&needle)
                    || self.entry_slug(entry).contains(&needle)
            }))
            .collect();
        self.cursor = self.cursor.min(self.matches.len() - 1);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.open = false;
                Command::message(Message::Dismissed)
            }
            KeyCode::Enter => {
                let slug = self.highlighted().unwrap_or("").to_string();
                self.open = false;
                Command::message(Message::Picked(slug))
            }
            KeyCode::Up => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(self.matches.len() - 1);
                Command::none()
            }
            KeyCode::Down | KeyCode::Tab => {
                self.cursor = (self.cursor + 1) % self.matches.len();
                Command::none()
            }
            KeyCode::Backspace => {
                if self.filter.pop().is_some() {
                    self.refilter();
                }
                Command::none()
            }
            KeyCode::Char(c) if !ctrl => {
                self.filter.push(c);
                self.cursor = 0;
                self.refilter();
                // Land on the first real match rather than on "All".
                if self.matches.len() > 1 {
                    self.cursor = 1;
                }
                Command::none()
            }
            _ => Command::none(),
        }
    }
}

impl Default for CategoryPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CategoryPicker {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.open => self.handle_key(key),
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.open {
            return;
        }
        let rows = self.matches.len().min(self.max_visible);
        // filter line + rows + borders
        let height = rows as u16 + 3;
        let panel = centered_fixed(40, height, area);
        if panel.height < 4 || panel.width < 8 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .title(" Category ");
        let inner = render_overlay(frame, panel, Some(&block));

        let filter_line = Line::from(vec![
            Span::styled("filter: ", self.theme.muted),
            Span::styled(self.filter.clone(), self.theme.text),
        ]);
        frame.render_widget(Paragraph::new(filter_line), Rect { height: 1, ..inner });

        let list_height = inner.height.saturating_sub(1) as usize;
        let offset = (self.cursor + 1).saturating_sub(list_height);
        let width = inner.width.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .matches
            .iter()
            .enumerate()
            .skip(offset)
            .take(list_height)
            .map(|(i, &entry)| {
                let selected = i == self.cursor;
                let prefix = if selected { "▸ " } else { "  " };
                let style = if selected {
                    self.theme.selected
                } else {
                    self.theme.text
                };
                Line::from(Span::styled(
                    format!("{prefix}{}", truncate(self.entry_name(entry), width)),
                    style,
                ))
            })
            .collect();
        let list_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(Paragraph::new(lines), list_area);
    }

    fn focused(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn picker() -> CategoryPicker {
        let mut picker = CategoryPicker::new();
        picker.set_categories(vec![
            Category {
                slug: "beauty".into(),
                name: "Beauty".into(),
            },
            Category {
                slug: "mens-shirts".into(),
                name: "Mens Shirts".into(),
            },
            Category {
                slug: "smartphones".into(),
                name: "Smartphones".into(),
            },
        ]);
        picker
    }

    fn picked(cmd: Command<Message>) -> Option<String> {
        match cmd.into_message() {
            Some(Message::Picked(slug)) => Some(slug),
            _ => None,
        }
    }

    #[test]
    fn closed_picker_ignores_keys() {
        let mut picker = picker();
        assert!(picker.update(Message::KeyPress(key(KeyCode::Enter))).is_none());
    }

    #[test]
    fn opens_on_current_category() {
        let mut picker = picker();
        picker.open("mens-shirts");
        assert_eq!(picker.highlighted(), Some("mens-shirts"));
    }

    #[test]
    fn unknown_current_falls_back_to_all() {
        let mut picker = picker();
        picker.open("garden");
        assert_eq!(picker.highlighted(), Some(""));
    }

    #[test]
    fn typing_filters_and_enter_picks() {
        let mut picker = picker();
        picker.open("");
        for c in "shirt".chars() {
            picker.update(Message::KeyPress(key(KeyCode::Char(c))));
        }
        assert_eq!(picker.visible_entries(), 2);
        let cmd = picker.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(picked(cmd).as_deref(), Some("mens-shirts"));
        assert!(!picker.is_open());
    }

    #[test]
    fn all_entry_survives_any_filter() {
        let mut picker = picker();
        picker.open("beauty");
        for c in "zzz".chars() {
            picker.update(Message::KeyPress(key(KeyCode::Char(c))));
        }
        assert_eq!(picker.visible_entries(), 1);
        let cmd = picker.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(picked(cmd).as_deref(), Some(""));
    }

    #[test]
    fn navigation_wraps() {
        let mut picker = picker();
        picker.open("");
        picker.update(Message::KeyPress(key(KeyCode::Up)));
        assert_eq!(picker.highlighted(), Some("smartphones"));
        picker.update(Message::KeyPress(key(KeyCode::Down)));
        assert_eq!(picker.highlighted(), Some(""));
    }

    #[test]
    fn esc_dismisses() {
        let mut picker = picker();
        picker.open("");
        let cmd = picker.update(Message::KeyPress(key(KeyCode::Esc)));
        assert!(matches!(cmd.into_message(), Some(Message::Dismissed)));
        assert!(!picker.is_open());
    }

    #[test]
    fn names_resolve() {
        let picker = picker();
        assert_eq!(picker.name_of("mens-shirts"), "Mens Shirts");
        assert_eq!(picker.name_of(""), "All categories");
        assert_eq!(picker.name_of("garden"), "garden");
    }
}
