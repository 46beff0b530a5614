//! Geometry for panels drawn on top of the catalog.

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

/// A `width` x `height` rect centred in `area`, clamped to it.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// A full-height panel docked to the right edge of `area`.
///
/// Takes `percent` of the width but never less than `min_width` columns
/// (or more than the area has).
pub fn right_panel(percent: u16, min_width: u16, area: Rect) -> Rect {
    let share = (u32::from(area.width) * u32::from(percent.min(100)) / 100) as u16;
    let w = share.max(min_width).min(area.width);
    Rect::new(area.x + area.width - w, area.y, w, area.height)
}

/// Clear `area`, draw `block` around it, and return the inner rect.
pub fn render_overlay(frame: &mut Frame, area: Rect, block: Option<&Block>) -> Rect {
    frame.render_widget(Clear, area);
    if let Some(block) = block {
        let inner = block.inner(area);
        frame.render_widget(block.clone(), area);
        inner
    } else {
        area
    }
}
