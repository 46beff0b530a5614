//! Light and dark palettes.
//!
//! A [`Theme`] is plain data handed down from the application context; no
//! widget looks a palette up on its own.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// The other palette.
    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    /// Lower-case name, as used in config files.
    pub fn name(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

/// Resolved styles for every widget in the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub text: Style,
    pub muted: Style,
    pub accent: Style,
    pub error: Style,
    pub header: Style,
    pub selected: Style,
    pub border: Style,
    pub border_focused: Style,
    pub status: Style,
    pub key_hint: Style,
}

impl Theme {
    /// The palette for `kind`.
    pub fn new(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    /// Light text on the terminal's dark background.
    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            text: Style::default().fg(Color::Gray),
            muted: Style::default().fg(Color::DarkGray),
            accent: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::LightRed),
            header: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            status: Style::default().fg(Color::Gray).bg(Color::Rgb(30, 30, 40)),
            key_hint: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        }
    }

    /// Dark text for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            text: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::Gray),
            accent: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red),
            header: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            selected: Style::default().fg(Color::White).bg(Color::Blue),
            border: Style::default().fg(Color::Gray),
            border_focused: Style::default().fg(Color::Blue),
            status: Style::default().fg(Color::Black).bg(Color::Rgb(220, 220, 228)),
            key_hint: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        }
    }

    /// The other palette.
    pub fn toggled(&self) -> Self {
        Self::new(self.kind.toggled())
    }

    /// Border style for a panel depending on focus.
    pub fn border_for(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
