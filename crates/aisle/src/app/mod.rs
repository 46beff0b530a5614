//! The catalog browser as a [`Model`].
//!
//! The model glues the engine to the widgets. The engine owns list state
//! ([`PageCache`]), the load-more decision ([`LoadMoreTrigger`]) and the
//! position ([`NavigationSync`]); widgets only mirror it. Every fetch runs as
//! a keyed command, so a superseded request is aborted, and every result is
//! still checked against its ticket before it touches state.

mod context;
mod keys;
mod msg;
mod view;

pub use context::AppContext;
pub use keys::CatalogKeys;
pub use msg::Msg;

use crate::location;
use aisle_engine::{
    Debounce, DebounceTicket, FetchKey, ItemDetail, LoadState, LoadMoreTrigger, NavigationSync,
    Page, PageCache, PageRequest, PageTicket, PositionParams, PositionWrite, Receipt,
    TransportError, WindowLayout,
};
use aisle_runtime::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};
use aisle_widgets::search_input::SearchInputStyle;
use aisle_widgets::{
    category_picker, detail_drawer, product_table, search_input, CategoryPicker, DetailDrawer,
    ProductTable, SearchInput, Theme,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

const PAGE_KEY: &str = "page";
const QUERY_KEY: &str = "query";
const RESIZE_KEY: &str = "resize";
const DETAIL_KEY: &str = "detail";
const CATEGORIES_KEY: &str = "categories";

/// Lines taken by everything except table rows: the search box (3), the
/// table border (2), the column header (1) and the status bar (1).
pub const CHROME_LINES: u16 = 7;

const WHEEL_LINES: i32 = 3;

/// Which widget receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
    Picker,
    Drawer,
}

pub struct Flags {
    pub context: AppContext,
    /// A location given on the command line. Wins over the stored one and
    /// is written back to the store.
    pub seed: Option<PositionParams>,
    /// Terminal size at startup.
    pub size: (u16, u16),
}

pub struct CatalogApp {
    ctx: AppContext,
    keys: CatalogKeys,
    nav: NavigationSync,
    cache: PageCache,
    trigger: LoadMoreTrigger,
    /// Pages to replay before scroll loads take over.
    catch_up_target: u32,
    search: SearchInput,
    picker: CategoryPicker,
    table: ProductTable,
    drawer: DetailDrawer,
    focus: Focus,
    size: (u16, u16),
    panel_height: Debounce<u16>,
    /// One-shot note for the status bar; replaced by the next one.
    note: Option<String>,
    categories_error: Option<TransportError>,
}

impl CatalogApp {
    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn nav(&self) -> &NavigationSync {
        &self.nav
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn table(&self) -> &ProductTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ProductTable {
        &mut self.table
    }

    pub fn drawer(&self) -> &DetailDrawer {
        &self.drawer
    }

    pub fn picker(&self) -> &CategoryPicker {
        &self.picker
    }

    pub fn search(&self) -> &SearchInput {
        &self.search
    }

    pub fn theme(&self) -> &Theme {
        &self.ctx.theme
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Shareable link for the current position.
    pub fn deep_link(&self) -> Result<String, location::LocationError> {
        location::deep_link(&self.nav.position().to_params())
    }

    fn set_note(&mut self, note: impl Into<String>) {
        self.note = Some(note.into());
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Search {
            self.search.focus();
        } else {
            self.search.blur();
        }
        if focus == Focus::Table {
            self.table.focus();
        } else {
            self.table.blur();
        }
        self.search
            .set_block(Some(search_block(&self.ctx.theme, focus == Focus::Search)));
    }

    fn apply_theme(&mut self) {
        let theme = self.ctx.theme.clone();
        self.search.set_style(search_style(&theme));
        self.search
            .set_block(Some(search_block(&theme, self.focus == Focus::Search)));
        self.picker.set_theme(&theme);
        self.table.set_theme(&theme);
        self.drawer.set_theme(&theme);
    }

    fn fetch_page(&self, request: PageRequest) -> Command<Msg> {
        tracing::debug!(key = %request.key, skip = request.skip, limit = request.limit, "fetching page");
        let ticket = request.ticket;
        let fut = self.ctx.source.fetch_page(&request.key, request.skip, request.limit);
        Command::keyed(PAGE_KEY, fut, move |result| Msg::PageLoaded(ticket, result))
    }

    fn fetch_categories(&self) -> Command<Msg> {
        Command::keyed(CATEGORIES_KEY, self.ctx.source.fetch_categories(), Msg::CategoriesLoaded)
    }

    fn fetch_detail(&self, id: u64) -> Command<Msg> {
        Command::keyed(DETAIL_KEY, self.ctx.source.fetch_item(id), move |result| {
            Msg::DetailLoaded(id, result)
        })
    }

    /// Replace the list when the settled position names a different key.
    fn refresh_key(&mut self) -> Command<Msg> {
        let key = self.nav.fetch_key();
        if key == *self.cache.key() {
            return Command::none();
        }
        self.start_key(key, 1)
    }

    fn start_key(&mut self, key: FetchKey, catch_up_target: u32) -> Command<Msg> {
        tracing::info!(%key, "switching result set");
        self.trigger.reset();
        self.catch_up_target = catch_up_target;
        let request = self.cache.reset(key);
        self.table.sync(&self.cache);
        match request {
            Some(request) => self.fetch_page(request),
            // Restored from retention; nothing is in flight.
            None => Command::batch([Command::cancel(PAGE_KEY), self.check_boundary()]),
        }
    }

    /// Start the next page if the viewport has reached the loader row.
    fn check_boundary(&mut self) -> Command<Msg> {
        let Some(visible) = self.table.visible_range() else {
            return Command::none();
        };
        if !self.trigger.observe(&visible, self.table.row_count(), &self.cache) {
            return Command::none();
        }
        match self.cache.load_next() {
            Some(request) => {
                self.table.sync(&self.cache);
                self.fetch_page(request)
            }
            None => Command::none(),
        }
    }

    fn page_loaded(&mut self, ticket: PageTicket, result: Result<Page, TransportError>) -> Command<Msg> {
        let receipt = self.cache.receive(ticket, result);
        if receipt == Receipt::Stale {
            return Command::none();
        }
        if self.trigger.settle(ticket, &receipt) && self.nav.advance_page() {
            self.persist();
        }
        self.table.sync(&self.cache);

        if let Receipt::Failed(err) = &receipt {
            self.set_note(format!("{} (R to retry)", err.reason()));
            return Command::none();
        }

        if self.trigger.catch_up(self.catch_up_target, &self.cache) {
            if let Some(request) = self.cache.load_next() {
                tracing::debug!(
                    pages = self.cache.pages_loaded(),
                    target = self.catch_up_target,
                    "catching up to saved page"
                );
                self.table.sync(&self.cache);
                return self.fetch_page(request);
            }
        }
        self.check_boundary()
    }

    fn retry(&mut self) -> Command<Msg> {
        match self.cache.retry() {
            Some(request) => {
                self.note = None;
                self.table.sync(&self.cache);
                self.fetch_page(request)
            }
            None => Command::none(),
        }
    }

    /// Flush whatever write the navigation state owes the store.
    fn persist(&mut self) {
        let Some(write) = self.nav.take_write() else {
            return;
        };
        let result = match &write {
            PositionWrite::Replace(params) => self.ctx.store.replace(params),
            PositionWrite::Clear => self.ctx.store.clear(),
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to save location");
            self.set_note(format!("Could not save location: {err}"));
        }
    }

    fn reset(&mut self) -> Command<Msg> {
        self.nav.reset();
        self.trigger.forget_origin();
        self.search.set_value("");
        self.persist();
        self.note = None;
        Command::batch([Command::cancel(QUERY_KEY), self.refresh_key()])
    }

    fn handle_terminal(&mut self, event: TerminalEvent) -> Command<Msg> {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Paste(text) if self.focus == Focus::Search => {
                self.update(Msg::Search(search_input::Message::Paste(text)))
            }
            TerminalEvent::Mouse(mouse) if self.focus == Focus::Table => match mouse.kind {
                MouseEventKind::ScrollDown => {
                    self.update(Msg::Table(product_table::Message::Scroll(WHEEL_LINES)))
                }
                MouseEventKind::ScrollUp => {
                    self.update(Msg::Table(product_table::Message::Scroll(-WHEEL_LINES)))
                }
                _ => Command::none(),
            },
            TerminalEvent::Resize(width, height) => {
                self.size = (width, height);
                let ticket = self.panel_height.push(height);
                Command::debounce(RESIZE_KEY, self.ctx.settings.ui.resize_debounce(), Msg::ResizeSettled(ticket))
            }
            _ => Command::none(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Msg> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Command::quit();
        }
        match self.focus {
            Focus::Search => match key.code {
                KeyCode::Esc => {
                    self.set_focus(Focus::Table);
                    Command::none()
                }
                _ => self.update(Msg::Search(search_input::Message::KeyPress(key))),
            },
            Focus::Picker => self.update(Msg::Picker(category_picker::Message::KeyPress(key))),
            Focus::Drawer => self.update(Msg::Drawer(detail_drawer::Message::KeyPress(key))),
            Focus::Table => self.handle_table_key(key),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Command<Msg> {
        if self.keys.quit.matches(&key) {
            return Command::quit();
        }
        if self.keys.search.matches(&key) {
            self.set_focus(Focus::Search);
            return Command::none();
        }
        if self.keys.category.matches(&key) {
            self.picker.open(self.nav.category());
            self.set_focus(Focus::Picker);
            return Command::none();
        }
        if self.keys.reset.matches(&key) {
            return self.reset();
        }
        if self.keys.retry.matches(&key) {
            return self.retry();
        }
        if self.keys.share.matches(&key) {
            match self.deep_link() {
                Ok(link) => {
                    tracing::info!(%link, "location link");
                    self.set_note(link);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "could not build location link");
                    self.set_note(format!("Could not build link: {err}"));
                }
            }
            return Command::none();
        }
        if self.keys.theme.matches(&key) {
            self.ctx.theme = self.ctx.theme.toggled();
            self.apply_theme();
            self.set_note(format!("{} theme", self.ctx.theme.kind.name()));
            return Command::none();
        }
        self.update(Msg::Table(product_table::Message::KeyPress(key)))
    }

    fn resize_settled(&mut self, ticket: DebounceTicket) -> Command<Msg> {
        let Some(&height) = self.panel_height.settle(ticket) else {
            return Command::none();
        };
        tracing::debug!(height, "viewport resized");
        self.table.set_viewport_height(rows_for(height));
        self.check_boundary()
    }

    fn detail_loaded(&mut self, id: u64, result: Result<ItemDetail, TransportError>) -> Command<Msg> {
        if !self.drawer.receive(id, result) {
            tracing::debug!(id, "dropping detail for a closed drawer");
        }
        Command::none()
    }
}

/// Table rows that fit in a terminal `height` lines tall.
pub fn rows_for(height: u16) -> usize {
    height.saturating_sub(CHROME_LINES).max(1) as usize
}

fn search_style(theme: &Theme) -> SearchInputStyle {
    SearchInputStyle {
        prompt: theme.accent,
        text: theme.text,
        placeholder: theme.muted,
        cursor: theme.selected,
    }
}

fn search_block(theme: &Theme, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_for(focused))
        .title(" Search ")
}

impl Model for CatalogApp {
    type Message = Msg;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Msg>) {
        let Flags {
            mut context,
            seed,
            size,
        } = flags;
        let settings = context.settings.clone();

        let mut note = None;
        let from_cli = seed.is_some();
        let params = match seed {
            Some(params) => params,
            None => context.store.load().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "ignoring saved location");
                note = Some(format!("Ignored saved location: {err}"));
                PositionParams::new()
            }),
        };

        let mut nav = NavigationSync::seeded(&params, settings.ui.query_debounce());
        let position = nav.position();
        tracing::info!(?position, from_cli, "starting");
        if from_cli {
            let canonical = position.to_params();
            let write = if canonical.is_empty() {
                context.store.clear()
            } else {
                context.store.replace(&canonical)
            };
            if let Err(err) = write {
                tracing::warn!(error = %err, "failed to save location");
                note = Some(format!("Could not save location: {err}"));
            }
            // Already written above.
            nav.take_write();
        }

        let layout = WindowLayout::new(settings.ui.row_height, rows_for(size.1), settings.ui.overscan);
        let cache = PageCache::new(settings.api.page_size)
            .with_retention(settings.cache.retain_keys, settings.cache.stale_after());

        let mut search = SearchInput::new("type to search products").with_prompt("/ ");
        search.set_value(nav.query_input());

        let mut app = Self {
            keys: CatalogKeys::default(),
            nav,
            cache,
            trigger: LoadMoreTrigger::new(),
            catch_up_target: 1,
            search,
            picker: CategoryPicker::new(),
            table: ProductTable::new(layout),
            drawer: DetailDrawer::new(),
            focus: Focus::Table,
            size,
            panel_height: Debounce::new(size.1, settings.ui.resize_debounce()),
            note,
            categories_error: None,
            ctx: context,
        };
        app.apply_theme();
        app.set_focus(Focus::Table);
        app.persist();

        let key = app.nav.fetch_key();
        let first = app.start_key(key, position.page);
        let cmd = Command::batch([
            Command::set_title("aisle"),
            app.fetch_categories(),
            first,
        ]);
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Terminal(event) => self.handle_terminal(event),

            Msg::Search(search_input::Message::Changed(text)) => {
                let ticket = self.nav.type_query(text);
                self.trigger.forget_origin();
                self.persist();
                Command::debounce(QUERY_KEY, self.nav.query_delay(), Msg::QuerySettled(ticket))
            }
            Msg::Search(search_input::Message::Submit(_)) => {
                self.set_focus(Focus::Table);
                Command::none()
            }
            Msg::Search(m) => self.search.update(m).map(Msg::Search),
            Msg::QuerySettled(ticket) => {
                if !self.nav.settle_query(ticket) {
                    return Command::none();
                }
                self.persist();
                self.refresh_key()
            }

            Msg::Picker(category_picker::Message::Picked(slug)) => {
                self.picker.close();
                self.set_focus(Focus::Table);
                self.nav.pick_category(slug);
                self.trigger.forget_origin();
                self.persist();
                self.refresh_key()
            }
            Msg::Picker(category_picker::Message::Dismissed) => {
                self.picker.close();
                self.set_focus(Focus::Table);
                Command::none()
            }
            Msg::Picker(m) => self.picker.update(m).map(Msg::Picker),

            Msg::Table(product_table::Message::Open(id)) => {
                self.drawer.open(id);
                self.set_focus(Focus::Drawer);
                self.fetch_detail(id)
            }
            Msg::Table(m) => {
                let is_tick = matches!(m, product_table::Message::Spinner(_));
                let cmd = self.table.update(m).map(Msg::Table);
                if is_tick {
                    return cmd;
                }
                Command::batch([cmd, self.check_boundary()])
            }

            Msg::Drawer(detail_drawer::Message::Closed) => {
                self.set_focus(Focus::Table);
                Command::cancel(DETAIL_KEY)
            }
            Msg::Drawer(m) => self.drawer.update(m).map(Msg::Drawer),

            Msg::ResizeSettled(ticket) => self.resize_settled(ticket),
            Msg::PageLoaded(ticket, result) => self.page_loaded(ticket, result),
            Msg::CategoriesLoaded(Ok(categories)) => {
                tracing::debug!(count = categories.len(), "categories loaded");
                self.categories_error = None;
                self.picker.set_categories(categories);
                Command::none()
            }
            Msg::CategoriesLoaded(Err(err)) => {
                self.set_note(err.reason().to_string());
                self.categories_error = Some(err);
                Command::none()
            }
            Msg::DetailLoaded(id, result) => self.detail_loaded(id, result),
        }
    }

    fn view(&self, frame: &mut Frame) {
        view::render(self, frame);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|event| match event {
            TerminalEvent::Key(_) if !event.is_key_press() => None,
            event => Some(Msg::Terminal(event)),
        })];
        subs.extend(self.table.subscriptions().into_iter().map(|s| s.map(Msg::Table)));
        subs.extend(self.drawer.subscriptions().into_iter().map(|s| s.map(Msg::Drawer)));
        subs
    }
}

impl CatalogApp {
    /// Whether the list is waiting on the network.
    pub fn is_loading(&self) -> bool {
        self.cache.state().is_loading()
    }

    pub(crate) fn load_state(&self) -> &LoadState {
        self.cache.state()
    }

    pub(crate) fn categories_error(&self) -> Option<&TransportError> {
        self.categories_error.as_ref()
    }

    pub(crate) fn keys(&self) -> &CatalogKeys {
        &self.keys
    }

    /// Last reported terminal size. The table height follows it after the
    /// resize debounce.
    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}
