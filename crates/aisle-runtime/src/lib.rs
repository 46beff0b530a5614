//! Elm-architecture runtime for the **aisle** terminal catalog browser.
//!
//! An application is an **init -> update -> view** cycle with side effects
//! pushed to the edges through [`Command`]s and [`Subscription`]s.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | A side effect for the runtime to execute |
//! | [`Subscription`] | Long-lived event source (terminal input, timers) |
//! | [`Program`] | Wires a [`Model`] to the terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for driving a [`Model`] in tests |
//!
//! # Keyed commands
//!
//! [`Command::keyed`] and [`Command::debounce`] run at most one task per key.
//! Issuing a new command under a key aborts the running one, so a superseded
//! timer or fetch never delivers its message. Models still guard results with
//! their own tokens where ordering matters; aborting only saves the work.

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, TerminalCommand};
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, Every};

/// Run a model with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(flags: M::Flags, options: ProgramOptions) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
