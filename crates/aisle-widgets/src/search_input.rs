//! Single-line query field.
//!
//! Every edit emits [`Message::Changed`] with the full new value; the parent
//! intercepts it and feeds its debouncer. Nothing here knows about timing.

use aisle_runtime::{Command, Component};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

#[derive(Debug, Clone)]
pub struct SearchInputStyle {
    pub prompt: Style,
    pub text: Style,
    pub placeholder: Style,
    pub cursor: Style,
}

impl Default for SearchInputStyle {
    fn default() -> Self {
        Self {
            prompt: Style::default(),
            text: Style::default(),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Messages for [`SearchInput`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw key input routed here by the host.
    KeyPress(KeyEvent),
    /// Bracketed paste; line breaks are dropped.
    Paste(String),
    /// The value changed.
    Changed(String),
    /// Enter was pressed.
    Submit(String),
}

/// Single-line query field.
///
/// Every edit emits [`Message::Changed`] with the full value, so the host can
/// debounce it; Enter emits [`Message::Submit`].
///
/// ```rust,ignore
/// let search = SearchInput::new("Search products").with_prompt("/ ");
/// // in update
/// Msg::Search(search_input::Message::Changed(text)) => { /* debounce */ }
/// Msg::Search(m) => self.search.update(m).map(Msg::Search),
/// ```
pub struct SearchInput {
    value: Vec<char>,
    cursor: usize,
    focus: bool,
    placeholder: String,
    prompt: String,
    char_limit: usize,
    style: SearchInputStyle,
    block: Option<Block<'static>>,
}

impl SearchInput {
    /// Create an empty, unfocused input with the given placeholder text.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            cursor: 0,
            focus: false,
            placeholder: placeholder.into(),
            prompt: String::new(),
            char_limit: 120,
            style: SearchInputStyle::default(),
            block: None,
        }
    }

    /// Set a prompt drawn before the value (e.g. `/ `).
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the maximum number of characters accepted.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    /// Set custom styles (builder form).
    pub fn with_style(mut self, style: SearchInputStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the styles, e.g. after a theme change.
    pub fn set_style(&mut self, style: SearchInputStyle) {
        self.style = style;
    }

    /// Surround the input with `block`, or draw it borderless with `None`.
    pub fn set_block(&mut self, block: Option<Block<'static>>) {
        self.block = block;
    }

    /// Give the input keyboard focus and show the cursor.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// The current text.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replace the value without emitting [`Message::Changed`]. The cursor
    /// moves to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.char_limit).collect();
        self.cursor = self.value.len();
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn changed(&self) -> Command<Message> {
        Command::message(Message::Changed(self.value()))
    }

    fn insert(&mut self, text: impl Iterator<Item = char>) -> Command<Message> {
        let before = self.value.len();
        for c in text {
            if self.value.len() >= self.char_limit {
                break;
            }
            self.value.insert(self.cursor, c);
            self.cursor += 1;
        }
        if self.value.len() == before {
            Command::none()
        } else {
            self.changed()
        }
    }

    fn delete_backward(&mut self) -> Command<Message> {
        if self.cursor == 0 {
            return Command::none();
        }
        self.cursor -= 1;
        self.value.remove(self.cursor);
        self.changed()
    }

    fn delete_forward(&mut self) -> Command<Message> {
        if self.cursor >= self.value.len() {
            return Command::none();
        }
        self.value.remove(self.cursor);
        self.changed()
    }

    fn delete_word_backward(&mut self) -> Command<Message> {
        if self.cursor == 0 {
            return Command::none();
        }
        let mut start = self.cursor;
        while start > 0 && self.value[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && self.value[start - 1] != ' ' {
            start -= 1;
        }
        self.value.drain(start..self.cursor);
        self.cursor = start;
        self.changed()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('w') if ctrl => self.delete_word_backward(),
            KeyCode::Backspace if alt => self.delete_word_backward(),
            KeyCode::Char('u') if ctrl => {
                if self.cursor == 0 {
                    return Command::none();
                }
                self.value.drain(..self.cursor);
                self.cursor = 0;
                self.changed()
            }
            KeyCode::Char('k') if ctrl => {
                if self.cursor == self.value.len() {
                    return Command::none();
                }
                self.value.truncate(self.cursor);
                self.changed()
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                Command::none()
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.value.len();
                Command::none()
            }
            KeyCode::Char(c) if !ctrl && !alt => self.insert(std::iter::once(c)),
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Command::none()
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.len());
                Command::none()
            }
            KeyCode::Home => {
                self.cursor = 0;
                Command::none()
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                Command::none()
            }
            KeyCode::Enter => Command::message(Message::Submit(self.value())),
            _ => Command::none(),
        }
    }
}

impl Component for SearchInput {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::Paste(text) if self.focus => {
                self.insert(text.chars().filter(|c| !c.is_control()))
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                frame.render_widget(block.clone(), area);
                inner
            }
            None => area,
        };

        let mut spans = Vec::new();
        if !self.prompt.is_empty() {
            spans.push(Span::styled(self.prompt.clone(), self.style.prompt));
        }

        if self.value.is_empty() {
            if self.focus {
                spans.push(Span::styled(" ", self.style.cursor));
            }
            spans.push(Span::styled(self.placeholder.clone(), self.style.placeholder));
        } else {
            // Scroll horizontally so the cursor stays in view.
            let available = (inner.width as usize)
                .saturating_sub(self.prompt.chars().count())
                .max(1);
            let offset = (self.cursor + 1).saturating_sub(available);
            let end = (offset + available).min(self.value.len());
            let visible = &self.value[offset..end];

            if self.focus {
                let at = self.cursor - offset;
                let before: String = visible.iter().take(at).collect();
                let under = visible.get(at).map_or(" ".to_string(), char::to_string);
                let after: String = visible.iter().skip(at + 1).collect();
                spans.push(Span::styled(before, self.style.text));
                spans.push(Span::styled(under, self.style.cursor));
                spans.push(Span::styled(after, self.style.text));
            } else {
                spans.push(Span::styled(visible.iter().collect::<String>(), self.style.text));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn key_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn focused() -> SearchInput {
        let mut input = SearchInput::new("Search products...");
        input.focus();
        input
    }

    fn type_str(input: &mut SearchInput, s: &str) {
        for c in s.chars() {
            input.update(Message::KeyPress(key(KeyCode::Char(c))));
        }
    }

    #[test]
    fn typing_emits_changed_with_full_value() {
        let mut input = focused();
        type_str(&mut input, "ph");
        let cmd = input.update(Message::KeyPress(key(KeyCode::Char('o'))));
        match cmd.into_message() {
            Some(Message::Changed(v)) => assert_eq!(v, "pho"),
            other => panic!("expected Changed, got {other:?}"),
        }
    }

    #[test]
    fn unfocused_input_ignores_keys() {
        let mut input = SearchInput::new("");
        let cmd = input.update(Message::KeyPress(key(KeyCode::Char('x'))));
        assert!(cmd.is_none());
        assert_eq!(input.value(), "");
    }

    #[test]
    fn backspace_at_start_is_silent() {
        let mut input = focused();
        assert!(input.update(Message::KeyPress(key(KeyCode::Backspace))).is_none());
    }

    #[test]
    fn cursor_editing_in_the_middle() {
        let mut input = focused();
        type_str(&mut input, "lmp");
        input.update(Message::KeyPress(key(KeyCode::Left)));
        input.update(Message::KeyPress(key(KeyCode::Left)));
        input.update(Message::KeyPress(key(KeyCode::Char('a'))));
        assert_eq!(input.value(), "lamp");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut input = focused();
        type_str(&mut input, "red lamp  ");
        input.update(Message::KeyPress(key_ctrl(KeyCode::Char('w'))));
        assert_eq!(input.value(), "red ");
    }

    #[test]
    fn ctrl_u_clears_to_start() {
        let mut input = focused();
        type_str(&mut input, "phone");
        let cmd = input.update(Message::KeyPress(key_ctrl(KeyCode::Char('u'))));
        assert_eq!(input.value(), "");
        assert!(matches!(cmd.into_message(), Some(Message::Changed(v)) if v.is_empty()));
    }

    #[test]
    fn paste_drops_newlines() {
        let mut input = focused();
        input.update(Message::Paste("mens\nshirts".into()));
        assert_eq!(input.value(), "mensshirts");
    }

    #[test]
    fn char_limit_caps_input() {
        let mut input = SearchInput::new("").with_char_limit(3);
        input.focus();
        type_str(&mut input, "abcd");
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn set_value_is_silent_and_moves_cursor() {
        let mut input = focused();
        input.set_value("shoe");
        assert_eq!(input.value(), "shoe");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn enter_submits() {
        let mut input = focused();
        type_str(&mut input, "tv");
        let cmd = input.update(Message::KeyPress(key(KeyCode::Enter)));
        assert!(matches!(cmd.into_message(), Some(Message::Submit(v)) if v == "tv"));
    }
}
