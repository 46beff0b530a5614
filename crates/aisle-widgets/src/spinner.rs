//! Animated loading indicator.

use aisle_runtime::{subscribe, Command, Component, Every, Subscription};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::time::Duration;

/// Frame sets.
pub mod frames {
    /// Braille dots, ten positions.
    pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    /// Classic ASCII line, four positions.
    pub const LINE: &[&str] = &["|", "/", "-", "\\"];
}

/// Messages for [`Spinner`].
#[derive(Debug, Clone)]
pub enum Message {
    Tick,
}

/// Spins only while [`start`](Spinner::start)ed; a stopped spinner drops
/// its timer subscription so an idle screen schedules no wakeups.
pub struct Spinner {
    frames: &'static [&'static str],
    frame_index: usize,
    title: String,
    style: Style,
    interval: Duration,
    spinning: bool,
    id: &'static str,
}

impl Spinner {
    /// `id` keeps concurrent spinners' timers apart.
    pub fn new(id: &'static str) -> Self {
        Self {
            frames: frames::DOTS,
            frame_index: 0,
            title: String::new(),
            style: Style::default(),
            interval: Duration::from_millis(100),
            spinning: false,
            id,
        }
    }

    /// Use a different frame set, see [`frames`].
    pub fn with_frames(mut self, frames: &'static [&'static str]) -> Self {
        self.frames = frames;
        self
    }

    /// Text drawn after the spinner frame.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Style for the frame (builder form).
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Replace the frame style.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Start animating; the timer subscription appears on the next cycle.
    pub fn start(&mut self) {
        self.spinning = true;
    }

    /// Stop animating and rewind to the first frame.
    pub fn stop(&mut self) {
        self.spinning = false;
        self.frame_index = 0;
    }

    /// Whether the spinner is animating.
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Current frame followed by the title.
    pub fn label(&self) -> String {
        let glyph = self.frames.get(self.frame_index).copied().unwrap_or("");
        if self.title.is_empty() {
            glyph.to_string()
        } else {
            format!("{glyph} {}", self.title)
        }
    }
}

impl Component for Spinner {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Tick => {
                if self.spinning && !self.frames.is_empty() {
                    self.frame_index = (self.frame_index + 1) % self.frames.len();
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.render_widget(Paragraph::new(Span::styled(self.label(), self.style)), area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if self.spinning {
            vec![subscribe(Every::new(self.interval, self.id)).map(|_| Message::Tick)]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_while_spinning() {
        let mut spinner = Spinner::new("t").with_frames(frames::LINE);
        spinner.update(Message::Tick);
        assert_eq!(spinner.label(), "|");

        spinner.start();
        spinner.update(Message::Tick);
        assert_eq!(spinner.label(), "/");
    }

    #[test]
    fn frames_wrap() {
        let mut spinner = Spinner::new("t").with_frames(frames::LINE);
        spinner.start();
        for _ in 0..4 {
            spinner.update(Message::Tick);
        }
        assert_eq!(spinner.label(), "|");
    }

    #[test]
    fn subscription_follows_state() {
        let mut spinner = Spinner::new("t");
        assert!(spinner.subscriptions().is_empty());
        spinner.start();
        assert_eq!(spinner.subscriptions().len(), 1);
        spinner.stop();
        assert!(spinner.subscriptions().is_empty());
    }

    #[test]
    fn title_follows_glyph() {
        let spinner = Spinner::new("t").with_frames(frames::LINE).with_title("Loading");
        assert_eq!(spinner.label(), "| Loading");
    }
}
