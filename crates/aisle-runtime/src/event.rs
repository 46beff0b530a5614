use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};

/// Terminal events produced by the runtime's event loop.
///
/// Delivered through the
/// [`terminal_events`](crate::subscriptions::terminal_events) subscription,
/// whose mapping function turns each event into the application's message
/// type. Variants wrap the crossterm payloads, so key codes and modifiers
/// are matched with the full crossterm API.
///
/// ```rust,ignore
/// use aisle_runtime::{terminal_events, Subscription, TerminalEvent};
///
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::Key(key)),
///         _ => None,
///     })]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste content.
    Paste(String),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
}

impl TerminalEvent {
    /// Key releases are reported on some platforms; callers almost always
    /// want presses and repeats only.
    pub fn is_key_press(&self) -> bool {
        matches!(self, TerminalEvent::Key(key) if key.kind != KeyEventKind::Release)
    }
}

impl From<crossterm::event::Event> for TerminalEvent {
    fn from(event: crossterm::event::Event) -> Self {
        match event {
            crossterm::event::Event::Key(k) => TerminalEvent::Key(k),
            crossterm::event::Event::Mouse(m) => TerminalEvent::Mouse(m),
            crossterm::event::Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            crossterm::event::Event::FocusGained => TerminalEvent::FocusGained,
            crossterm::event::Event::FocusLost => TerminalEvent::FocusLost,
            crossterm::event::Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}
