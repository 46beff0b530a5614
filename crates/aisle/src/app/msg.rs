use aisle_engine::{Category, DebounceTicket, ItemDetail, Page, PageTicket, TransportError};
use aisle_runtime::TerminalEvent;
use aisle_widgets::{category_picker, detail_drawer, product_table, search_input};

#[derive(Debug)]
pub enum Msg {
    Terminal(TerminalEvent),
    Search(search_input::Message),
    Picker(category_picker::Message),
    Table(product_table::Message),
    Drawer(detail_drawer::Message),
    /// The query debounce timer fired.
    QuerySettled(DebounceTicket),
    /// The resize debounce timer fired.
    ResizeSettled(DebounceTicket),
    PageLoaded(PageTicket, Result<Page, TransportError>),
    CategoriesLoaded(Result<Vec<Category>, TransportError>),
    DetailLoaded(u64, Result<ItemDetail, TransportError>),
}
