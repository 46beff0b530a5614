use super::{CatalogApp, Focus};
use aisle_engine::LoadState;
use aisle_runtime::Component;
use aisle_widgets::key::{hint_line, KeyMap};
use aisle_widgets::text::truncate;
use aisle_widgets::StatusBar;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const CATEGORY_BOX_COLS: u16 = 28;

pub(super) fn render(app: &CatalogApp, frame: &mut Frame) {
    let theme = app.theme();
    let [top, middle, bottom] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [search_area, category_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(CATEGORY_BOX_COLS)]).areas(top);
    app.search().view(frame, search_area);

    let category_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_for(app.focus() == Focus::Picker))
        .title(" Category ");
    let width = category_block.inner(category_area).width as usize;
    let category_line = match app.categories_error() {
        Some(err) if app.picker().categories().is_empty() => {
            Line::from(Span::styled(truncate(err.reason(), width), theme.error))
        }
        _ => Line::from(Span::styled(
            truncate(app.picker().name_of(app.nav().category()), width),
            theme.text,
        )),
    };
    frame.render_widget(Paragraph::new(category_line).block(category_block), category_area);

    app.table().view(frame, middle);

    StatusBar::new()
        .style(theme.status)
        .left(status_left(app))
        .center(Span::styled(format!("page {}", app.nav().page()), theme.muted))
        .right(hint_line(&app.keys().short_help(), theme.key_hint, theme.muted))
        .render(frame, bottom);

    let area = frame.area();
    app.picker().view(frame, area);
    app.drawer().view(frame, area);
}

fn status_left(app: &CatalogApp) -> Line<'static> {
    let theme = app.theme();
    if let Some(note) = app.note() {
        return Line::from(Span::styled(note.to_string(), theme.accent));
    }
    let cache = app.cache();
    let text = match app.load_state() {
        LoadState::Idle | LoadState::Loading => "Loading products...".to_string(),
        LoadState::Error(err) if cache.items().is_empty() => err.reason().to_string(),
        _ => format!("{} of {} products", cache.items().len(), cache.total()),
    };
    let style = match app.load_state() {
        LoadState::Error(_) => theme.error,
        _ => theme.text,
    };
    Line::from(Span::styled(text, style))
}
