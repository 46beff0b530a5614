use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`].
///
/// A parent model decides where each child renders by passing it a
/// sub-region of the frame, wraps the child's message type in one of its own
/// variants, and lifts child commands with [`Command::map`]:
///
/// ```rust,ignore
/// Msg::Search(m) => self.search.update(m).map(Msg::Search),
/// ```
pub trait Component: Send + 'static {
    type Message: Send + 'static;

    /// Handle a message, mutate state, and return a [`Command`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area` of the [`Frame`]. Drawing outside `area` is a bug.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions for this component. The parent collects and maps them.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently takes keyboard input.
    fn focused(&self) -> bool {
        false
    }
}
