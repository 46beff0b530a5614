//! The windowed product list.
//!
//! Only rows inside [`WindowLayout::render_range`] are turned into terminal
//! lines, so drawing cost depends on the viewport and not on how many pages
//! have been accumulated. The table mirrors the items of a [`PageCache`]
//! through [`ProductTable::sync`]; the cache stays the single owner of the
//! list and its load state.

use crate::spinner::{self, Spinner};
use crate::text::fit;
use crate::theme::Theme;
use aisle_engine::{Item, LoadState, PageCache, RowSlot, VisibleRange, WindowLayout};
use aisle_runtime::{Command, Component, Subscription};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const PRICE_COLS: usize = 10;
const RATING_COLS: usize = 7;
const CATEGORY_COLS: usize = 18;

/// Messages for [`ProductTable`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw key input routed here by the host.
    KeyPress(KeyEvent),
    /// Wheel scroll by this many lines; positive is down.
    Scroll(i32),
    Spinner(spinner::Message),
    /// Enter on an item row.
    Open(u64),
}

/// Windowed product list that mirrors a [`PageCache`].
///
/// Only the rows in the layout's render range are drawn, so the cost of a
/// frame does not grow with the number of loaded items. While more pages may
/// exist a loader row follows the last item; it shows a spinner while a
/// page is in flight and the error while the cache is failed.
///
/// ```rust,ignore
/// let mut table = ProductTable::new(WindowLayout::new(1, 17, 4));
/// table.sync(&cache);
/// if let Some(visible) = table.visible_range() {
///     trigger.observe(&visible, table.row_count(), &cache);
/// }
/// ```
pub struct ProductTable {
    layout: WindowLayout,
    items: Vec<Item>,
    epoch: u64,
    state: LoadState,
    scroll: usize,
    selected: usize,
    focus: bool,
    spinner: Spinner,
    theme: Theme,
    title: String,
}

impl ProductTable {
    /// Create an empty, focused table.
    pub fn new(layout: WindowLayout) -> Self {
        Self {
            layout,
            items: Vec::new(),
            epoch: 0,
            state: LoadState::Idle,
            scroll: 0,
            selected: 0,
            focus: true,
            spinner: Spinner::new("product-table-loader"),
            theme: Theme::default(),
            title: " Products ".to_string(),
        }
    }

    /// Restyle with `theme`.
    pub fn set_theme(&mut self, theme: &Theme) {
        self.spinner.set_style(theme.accent);
        self.theme = theme.clone();
    }

    /// Title drawn in the table border.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Give the table keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Mirror the cache. A new epoch replaces the rows and scrolls to the
    /// top; within an epoch only the appended tail is copied.
    pub fn sync(&mut self, cache: &PageCache) {
        if cache.epoch() != self.epoch {
            self.epoch = cache.epoch();
            self.items = cache.items().to_vec();
            self.scroll = 0;
            self.selected = 0;
        } else if cache.items().len() > self.items.len() {
            let start = self.items.len();
            self.items.extend_from_slice(&cache.items()[start..]);
        } else if cache.items().len() < self.items.len() {
            self.items.truncate(cache.items().len());
        }
        self.state = cache.state().clone();
        if self.state.is_loading() {
            self.spinner.start();
        } else {
            self.spinner.stop();
        }
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        self.scroll = self.layout.clamp_offset(self.scroll, self.row_count());
    }

    /// Height of the row area in lines, as used for windowing.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.layout = self.layout.with_viewport_height(height);
        self.scroll = self.layout.clamp_offset(self.scroll, self.row_count());
    }

    /// Current windowing geometry.
    pub fn layout(&self) -> &WindowLayout {
        &self.layout
    }

    /// Whether every item for the key is loaded.
    pub fn is_exhausted(&self) -> bool {
        self.state == LoadState::Exhausted
    }

    /// Loaded items plus the loader row while more may exist.
    pub fn row_count(&self) -> usize {
        WindowLayout::row_count(self.items.len(), self.is_exhausted())
    }

    /// Rows on screen at the current scroll offset, `None` when there are none.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.layout.visible_range(self.scroll, self.row_count())
    }

    /// Index of the first row on screen.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Index of the highlighted item, if any items are loaded.
    pub fn selected(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    /// The highlighted item.
    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.selected)
    }

    /// Number of items mirrored from the cache.
    pub fn loaded(&self) -> usize {
        self.items.len()
    }

    fn select(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = index.min(self.items.len() - 1);
        // On the last item, reveal the loader row too so the boundary is seen.
        let reveal = if self.selected + 1 == self.items.len() && !self.is_exhausted() {
            self.selected + 1
        } else {
            self.selected
        };
        self.scroll = self.layout.offset_to_reveal(self.scroll, reveal);
        self.scroll = self.layout.clamp_offset(self.scroll, self.row_count());
    }

    fn scroll_by(&mut self, lines: i32) {
        let target = if lines < 0 {
            self.scroll.saturating_sub(lines.unsigned_abs() as usize)
        } else {
            self.scroll + lines as usize
        };
        self.scroll = self.layout.clamp_offset(target, self.row_count());
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let page = self.layout.rows_per_viewport();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') if !ctrl => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') if !ctrl => self.select(self.selected + 1),
            KeyCode::PageUp => self.select(self.selected.saturating_sub(page)),
            KeyCode::PageDown => self.select(self.selected + page),
            KeyCode::Char('u') if ctrl => self.select(self.selected.saturating_sub(page / 2)),
            KeyCode::Char('d') if ctrl => self.select(self.selected + page / 2),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            KeyCode::Enter => {
                if let Some(item) = self.selected_item() {
                    return Command::message(Message::Open(item.id));
                }
            }
            _ => {}
        }
        Command::none()
    }

    fn loader_line(&self) -> Line<'static> {
        match &self.state {
            LoadState::Error(err) => {
                let mut spans = vec![Span::styled(
                    format!("Failed to load products: {}", err.reason()),
                    self.theme.error,
                )];
                spans.push(Span::styled("  (R to retry)", self.theme.muted));
                Line::from(spans)
            }
            _ => {
                let label = if self.items.is_empty() {
                    "Loading products..."
                } else {
                    "Loading more..."
                };
                Line::from(vec![
                    Span::styled(self.spinner.label(), self.theme.accent),
                    Span::styled(format!(" {label}"), self.theme.muted),
                ])
            }
        }
    }

    fn item_line(&self, item: &Item, width: usize, style: Style) -> Line<'static> {
        let fixed = PRICE_COLS + RATING_COLS + CATEGORY_COLS + 3;
        let title_cols = width.saturating_sub(fixed).max(8);
        let text = format!(
            "{} {} {:>price$} {:>rating$}",
            fit(&item.title, title_cols),
            fit(&item.category, CATEGORY_COLS),
            format!("${:.2}", item.price),
            format!("★ {:.1}", item.rating),
            price = PRICE_COLS,
            rating = RATING_COLS,
        );
        Line::from(Span::styled(text, style))
    }

    fn header_line(&self, width: usize) -> Line<'static> {
        let fixed = PRICE_COLS + RATING_COLS + CATEGORY_COLS + 3;
        let title_cols = width.saturating_sub(fixed).max(8);
        let text = format!(
            "{} {} {:>price$} {:>rating$}",
            fit("Title", title_cols),
            fit("Category", CATEGORY_COLS),
            "Price",
            "Rating",
            price = PRICE_COLS,
            rating = RATING_COLS,
        );
        Line::from(Span::styled(text, self.theme.header))
    }

    /// The lines of one row. Only the first carries content.
    fn row_lines(&self, slot: RowSlot<'_>, index: usize, width: usize) -> Vec<Line<'static>> {
        let first = match slot {
            RowSlot::Item(item) => {
                let style = if self.focus && index == self.selected {
                    self.theme.selected
                } else {
                    self.theme.text
                };
                self.item_line(item, width, style)
            }
            RowSlot::Loader => self.loader_line(),
        };
        let mut lines = vec![first];
        if let RowSlot::Item(item) = slot {
            if self.layout.row_height() > 1 {
                lines.push(Line::from(Span::styled(format!("  #{}", item.id), self.theme.muted)));
            }
        }
        lines.resize(self.layout.row_height(), Line::default());
        lines
    }

    /// Terminal lines for the body, exactly `height` long.
    fn body_lines(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut body = vec![Line::default(); height];
        let row_count = self.row_count();
        if row_count == 0 {
            if let Some(line) = body.first_mut() {
                *line = Line::from(Span::styled("No products found.", self.theme.muted));
            }
            return body;
        }
        for index in self.layout.render_range(self.scroll, row_count) {
            let Some(slot) = self.layout.slot(index, &self.items, row_count) else {
                continue;
            };
            let top = self.layout.row_top(self.scroll, index);
            for (i, line) in self.row_lines(slot, index, width).into_iter().enumerate() {
                let y = top + i as isize;
                if y >= 0 && (y as usize) < height {
                    body[y as usize] = line;
                }
            }
        }
        body
    }
}

impl Component for ProductTable {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::Scroll(lines) => {
                self.scroll_by(lines);
                Command::none()
            }
            Message::Spinner(m) => self.spinner.update(m).map(Message::Spinner),
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_for(self.focus))
            .title(self.title.clone());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let width = inner.width as usize;
        frame.render_widget(Paragraph::new(self.header_line(width)), Rect { height: 1, ..inner });

        let body_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        let height = (body_area.height as usize).min(self.layout.viewport_height().max(1));
        frame.render_widget(Paragraph::new(self.body_lines(width, height)), body_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        self.spinner
            .subscriptions()
            .into_iter()
            .map(|s| s.map(Message::Spinner))
            .collect()
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_engine::{FetchKey, Page, TransportError};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn item(id: u64) -> Item {
        Item {
            id,
            title: format!("Item {id}"),
            category: "beauty".into(),
            price: id as f64,
            rating: 4.5,
            thumbnail: String::new(),
        }
    }

    fn page(ids: std::ops::Range<u64>, total: usize) -> Page {
        Page {
            products: ids.map(item).collect(),
            total,
            skip: 0,
            limit: 20,
        }
    }

    /// A cache holding `loaded` of `total` items.
    fn cache_with(loaded: u64, total: usize) -> PageCache {
        let mut cache = PageCache::new(20);
        let mut request = cache.reset(FetchKey::all());
        let mut start = 0;
        while let Some(req) = request {
            let end = (start + 20).min(loaded);
            cache.receive(req.ticket, Ok(page(start..end, total)));
            start = end;
            request = if start < loaded { cache.load_next() } else { None };
        }
        cache
    }

    fn render(table: &ProductTable, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| table.view(frame, frame.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn sync_appends_within_an_epoch() {
        let mut cache = cache_with(20, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 10, 2));
        table.sync(&cache);
        assert_eq!(table.loaded(), 20);
        assert_eq!(table.row_count(), 21);

        let req = cache.load_next().unwrap();
        cache.receive(req.ticket, Ok(page(20..40, 45)));
        table.sync(&cache);
        assert_eq!(table.loaded(), 40);
    }

    #[test]
    fn new_epoch_replaces_rows_and_scrolls_home() {
        let cache = cache_with(40, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 10, 2));
        table.sync(&cache);
        table.update(Message::KeyPress(key(KeyCode::End)));
        assert!(table.scroll_offset() > 0);

        let mut other = cache_with(5, 5);
        other.reset(FetchKey::new("x", ""));
        table.sync(&other);
        assert_eq!(table.scroll_offset(), 0);
        assert_eq!(table.selected(), None);
    }

    #[test]
    fn end_reveals_the_loader_row() {
        let cache = cache_with(20, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 10, 2));
        table.sync(&cache);
        table.update(Message::KeyPress(key(KeyCode::End)));
        assert_eq!(table.selected(), Some(19));
        let visible = table.visible_range().unwrap();
        assert_eq!(visible.last, 20);
    }

    #[test]
    fn exhausted_list_has_no_loader_row() {
        let cache = cache_with(45, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 10, 2));
        table.sync(&cache);
        assert!(table.is_exhausted());
        assert_eq!(table.row_count(), 45);
    }

    #[test]
    fn wheel_scroll_is_clamped() {
        let cache = cache_with(20, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 10, 2));
        table.sync(&cache);
        table.update(Message::Scroll(-5));
        assert_eq!(table.scroll_offset(), 0);
        table.update(Message::Scroll(500));
        assert_eq!(table.scroll_offset(), 11);
    }

    #[test]
    fn enter_opens_selected_item() {
        let cache = cache_with(20, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 10, 2));
        table.sync(&cache);
        table.update(Message::KeyPress(key(KeyCode::Down)));
        let cmd = table.update(Message::KeyPress(key(KeyCode::Enter)));
        assert!(matches!(cmd.into_message(), Some(Message::Open(1))));
    }

    #[test]
    fn renders_only_the_window() {
        let cache = cache_with(40, 45);
        let mut table = ProductTable::new(WindowLayout::new(1, 5, 0));
        table.sync(&cache);
        let lines = render(&table, 60, 8);
        assert!(lines[1].contains("Title"));
        assert!(lines[2].contains("Item 0"));
        assert!(lines[6].contains("Item 4"));
        assert!(!lines.iter().any(|l| l.contains("Item 5 ")));
    }

    #[test]
    fn first_page_failure_shows_reason() {
        let mut cache = PageCache::new(20);
        let req = cache.reset(FetchKey::all()).unwrap();
        cache.receive(req.ticket, Err(TransportError::new("Failed to fetch products")));
        let mut table = ProductTable::new(WindowLayout::new(1, 5, 0));
        table.sync(&cache);
        let lines = render(&table, 80, 8);
        assert!(lines[2].contains("Failed to load products: Failed to fetch products"));
    }

    #[test]
    fn empty_result_set_says_so() {
        let cache = cache_with(0, 0);
        let mut table = ProductTable::new(WindowLayout::new(1, 5, 0));
        table.sync(&cache);
        assert_eq!(table.row_count(), 0);
        let lines = render(&table, 60, 6);
        assert!(lines[2].contains("No products found."));
    }

    #[test]
    fn tall_rows_show_partial_rows_at_the_top() {
        let cache = cache_with(20, 20);
        let mut table = ProductTable::new(WindowLayout::new(2, 6, 0));
        table.sync(&cache);
        table.update(Message::Scroll(3));
        let lines = render(&table, 60, 10);
        // offset 3 lands on the second line of row 1
        assert!(lines[2].contains("#1"));
        assert!(lines[3].contains("Item 2"));
    }

    #[test]
    fn spinner_runs_while_loading() {
        let mut cache = PageCache::new(20);
        cache.reset(FetchKey::all());
        let mut table = ProductTable::new(WindowLayout::new(1, 5, 0));
        table.sync(&cache);
        assert_eq!(table.subscriptions().len(), 1);
    }
}
