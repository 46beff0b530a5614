//! A one-row status line with left, centre, and right sections.
//!
//! Stateless: the application builds a fresh bar every frame.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// ```ignore
/// StatusBar::new()
///     .left("42 of 194 products")
///     .center("page 3")
///     .right(hint_line(&keys.short_help(), theme.key_hint, theme.status))
///     .style(theme.status)
///     .render(frame, area);
/// ```
#[derive(Default)]
pub struct StatusBar<'a> {
    left: Option<Line<'a>>,
    center: Option<Line<'a>>,
    right: Option<Line<'a>>,
    style: Style,
}

impl<'a> StatusBar<'a> {
    /// Create an empty bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Left-aligned section.
    pub fn left(mut self, content: impl Into<Line<'a>>) -> Self {
        self.left = Some(content.into());
        self
    }

    /// Centred section.
    pub fn center(mut self, content: impl Into<Line<'a>>) -> Self {
        self.center = Some(content.into());
        self
    }

    /// Right-aligned section.
    pub fn right(mut self, content: impl Into<Line<'a>>) -> Self {
        self.right = Some(content.into());
        self
    }

    /// Base style for the whole row; section styles are patched over it.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Draw the bar into `area`, normally a single row.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // The left section usually carries the longest text (errors, links).
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(15),
                Constraint::Percentage(40),
            ])
            .split(area);

        frame.render_widget(Block::default().style(self.style), area);

        let sections = [
            (&self.left, Alignment::Left, chunks[0]),
            (&self.center, Alignment::Center, chunks[1]),
            (&self.right, Alignment::Right, chunks[2]),
        ];
        for (line, alignment, rect) in sections {
            if let Some(line) = line {
                let styled = line.clone().patch_style(self.style);
                frame.render_widget(Paragraph::new(styled).alignment(alignment), rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn default_is_empty() {
        let bar = StatusBar::new();
        assert!(bar.left.is_none());
        assert!(bar.center.is_none());
        assert!(bar.right.is_none());
    }

    #[test]
    fn renders_left_and_right_sections() {
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal
            .draw(|frame| {
                StatusBar::new()
                    .left("20 of 45")
                    .right("q quit")
                    .render(frame, frame.area());
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row: String = (0..60u16).map(|x| buffer[(x, 0)].symbol().to_string()).collect();
        assert!(row.starts_with("20 of 45"));
        assert!(row.trim_end().ends_with("q quit"));
    }
}
