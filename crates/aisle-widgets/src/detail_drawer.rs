//! Right-side drawer with the full record of one product.
//!
//! The drawer remembers which id it was opened for and refuses results for
//! any other id, so a slow lookup for a product the user has already moved
//! away from never replaces the current one.

use crate::overlay::{render_overlay, right_panel};
use crate::spinner::{self, Spinner};
use crate::theme::Theme;
use aisle_engine::{ItemDetail, TransportError};
use aisle_runtime::{Command, Component, Subscription};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Closed,
    Loading { id: u64 },
    Ready(ItemDetail),
    Failed { id: u64, reason: String },
}

/// Messages for [`DetailDrawer`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw key input routed here by the host.
    KeyPress(KeyEvent),
    Spinner(spinner::Message),
    /// Esc was pressed.
    Closed,
}

/// Right-docked panel showing one product's details.
///
/// The drawer does not fetch anything itself:
///
/// ```rust,ignore
/// drawer.open(id);
/// let cmd = Command::keyed("detail", source.fetch_item(id), move |r| Msg::DetailLoaded(id, r));
/// // later
/// drawer.receive(id, result);
/// ```
pub struct DetailDrawer {
    state: DetailState,
    spinner: Spinner,
    scroll: u16,
    theme: Theme,
}

impl DetailDrawer {
    /// Create a closed drawer.
    pub fn new() -> Self {
        Self {
            state: DetailState::Closed,
            spinner: Spinner::new("detail-drawer"),
            scroll: 0,
            theme: Theme::default(),
        }
    }

    /// Restyle with `theme`.
    pub fn set_theme(&mut self, theme: &Theme) {
        self.spinner.set_style(theme.accent);
        self.theme = theme.clone();
    }

    /// Current lookup state.
    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Whether the drawer is showing anything, loading included.
    pub fn is_open(&self) -> bool {
        self.state != DetailState::Closed
    }

    /// The id the drawer is showing or waiting for.
    pub fn open_id(&self) -> Option<u64> {
        match &self.state {
            DetailState::Closed => None,
            DetailState::Loading { id } | DetailState::Failed { id, .. } => Some(*id),
            DetailState::Ready(detail) => Some(detail.id),
        }
    }

    /// Start showing `id`; the caller issues the lookup.
    pub fn open(&mut self, id: u64) {
        self.state = DetailState::Loading { id };
        self.scroll = 0;
        self.spinner.start();
    }

    /// Hide the drawer and stop its spinner.
    pub fn close(&mut self) {
        self.state = DetailState::Closed;
        self.spinner.stop();
    }

    /// Apply a lookup result. Returns `false` and changes nothing when the
    /// drawer is no longer waiting for `id`.
    pub fn receive(&mut self, id: u64, result: Result<ItemDetail, TransportError>) -> bool {
        if self.state != (DetailState::Loading { id }) {
            return false;
        }
        self.spinner.stop();
        self.state = match result {
            Ok(detail) => DetailState::Ready(detail),
            Err(err) => DetailState::Failed {
                id,
                reason: err.reason().to_string(),
            },
        };
        true
    }

    fn detail_lines(&self, detail: &ItemDetail) -> Vec<Line<'static>> {
        let t = &self.theme;
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<10}"), t.muted),
                Span::styled(value, t.text),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(detail.title.clone(), t.header)),
            Line::default(),
            field("Price", format!("${:.2}", detail.price)),
            field("Rating", format!("★ {:.1}", detail.rating)),
            field("Category", detail.category.clone()),
        ];
        if let Some(brand) = &detail.brand {
            lines.push(field("Brand", brand.clone()));
        }
        if let Some(stock) = detail.stock {
            lines.push(field("In stock", stock.to_string()));
        }
        if !detail.tags.is_empty() {
            lines.push(field("Tags", detail.tags.join(", ")));
        }
        if !detail.images.is_empty() {
            lines.push(field("Images", detail.images.len().to_string()));
        }
        if !detail.description.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(detail.description.clone(), t.text)));
        }
        lines
    }
}

impl Default for DetailDrawer {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DetailDrawer {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.is_open() => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.close();
                    Command::message(Message::Closed)
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.scroll = self.scroll.saturating_add(1);
                    Command::none()
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.scroll = self.scroll.saturating_sub(1);
                    Command::none()
                }
                _ => Command::none(),
            },
            Message::Spinner(m) => self.spinner.update(m).map(Message::Spinner),
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.is_open() {
            return;
        }
        let panel = right_panel(45, 36, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .title(" Product ");
        let inner = render_overlay(frame, panel, Some(&block));

        let lines = match &self.state {
            DetailState::Closed => return,
            DetailState::Loading { .. } => vec![Line::from(vec![
                Span::styled(self.spinner.label(), self.theme.accent),
                Span::styled(" Loading product...", self.theme.muted),
            ])],
            DetailState::Failed { reason, .. } => vec![Line::from(Span::styled(
                format!("Failed to load product: {reason}"),
                self.theme.error,
            ))],
            DetailState::Ready(detail) => self.detail_lines(detail),
        };
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0));
        frame.render_widget(body, inner);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        self.spinner
            .subscriptions()
            .into_iter()
            .map(|s| s.map(Message::Spinner))
            .collect()
    }

    fn focused(&self) -> bool {
        self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn detail(id: u64) -> ItemDetail {
        ItemDetail {
            id,
            title: format!("Lamp {id}"),
            description: "A lamp.".into(),
            category: "furniture".into(),
            price: 12.5,
            rating: 4.2,
            brand: Some("Glow".into()),
            stock: Some(7),
            tags: vec!["home".into()],
            images: vec![],
            thumbnail: String::new(),
        }
    }

    #[test]
    fn result_for_open_id_is_applied() {
        let mut drawer = DetailDrawer::new();
        drawer.open(3);
        assert!(drawer.receive(3, Ok(detail(3))));
        assert!(matches!(drawer.state(), DetailState::Ready(d) if d.id == 3));
    }

    #[test]
    fn result_for_another_id_is_dropped() {
        let mut drawer = DetailDrawer::new();
        drawer.open(3);
        drawer.open(4);
        assert!(!drawer.receive(3, Ok(detail(3))));
        assert_eq!(drawer.state(), &DetailState::Loading { id: 4 });
    }

    #[test]
    fn result_after_close_is_dropped() {
        let mut drawer = DetailDrawer::new();
        drawer.open(3);
        drawer.close();
        assert!(!drawer.receive(3, Ok(detail(3))));
        assert!(!drawer.is_open());
    }

    #[test]
    fn failure_keeps_id_and_reason() {
        let mut drawer = DetailDrawer::new();
        drawer.open(9);
        drawer.receive(9, Err(TransportError::new("Failed to fetch product detail")));
        assert_eq!(drawer.open_id(), Some(9));
        assert!(matches!(drawer.state(), DetailState::Failed { reason, .. } if reason.contains("detail")));
    }

    #[test]
    fn esc_closes() {
        let mut drawer = DetailDrawer::new();
        drawer.open(1);
        let cmd = drawer.update(Message::KeyPress(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(matches!(cmd.into_message(), Some(Message::Closed)));
        assert!(!drawer.is_open());
    }

    #[test]
    fn renders_fields() {
        let mut drawer = DetailDrawer::new();
        drawer.open(1);
        drawer.receive(1, Ok(detail(1)));
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| drawer.view(frame, frame.area())).unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = (0..20u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(screen.contains("Lamp 1"));
        assert!(screen.contains("Glow"));
        assert!(screen.contains("$12.50"));
    }
}
