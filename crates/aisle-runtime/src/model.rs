use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait.
///
/// The runtime drives an **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) builds the initial state from `Flags` and may
///    return a [`Command`] (the first page fetch, for instance).
/// 2. [`view`](Model::view) renders the current state to a [`Frame`].
/// 3. Events arrive as messages through [`Subscription`]s and completed
///    commands.
/// 4. [`update`](Model::update) handles each message and returns the next
///    [`Command`].
pub trait Model: Sized + Send + 'static {
    /// Every event that can affect the application state.
    type Message: Send + 'static;

    /// Startup data passed to [`Model::init`]. Use `()` when none is needed.
    type Flags: Send + 'static;

    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Handle a message, mutate state, and return a command for side effects.
    ///
    /// After `update` returns, the runtime re-renders and reconciles
    /// [`subscriptions`](Model::subscriptions).
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Must be a pure function of `&self`.
    fn view(&self, frame: &mut Frame);

    /// Declare active subscriptions. Called after every update.
    ///
    /// The runtime diffs the returned list against the previously active set:
    /// new subscriptions are started and removed ones are cancelled.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
