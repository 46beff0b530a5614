use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Model::init`](crate::Model::init).
///
/// # Examples
///
/// ```rust,ignore
/// // Fetch a page and report back:
/// let cmd = Command::perform(source.fetch_page(&key, 0, 20), Msg::PageLoaded);
///
/// // Deliver `Msg::QuerySettled(ticket)` after 300ms, unless another
/// // command keyed "query" replaces it first:
/// let cmd = Command::debounce("query", Duration::from_millis(300), Msg::QuerySettled(ticket));
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Future(BoxFuture<'static, Msg>),
    /// A future that replaces (and aborts) any earlier task with the same key.
    Keyed {
        key: &'static str,
        future: BoxFuture<'static, Msg>,
    },
    /// Abort the task with this key, if one is still running.
    Cancel(&'static str),
    Batch(Vec<Command<Msg>>),
    Terminal(TerminalCommand),
}

/// Actions handled synchronously by the runtime.
pub(crate) enum Action<Msg> {
    Message(Msg),
    Quit,
}

/// Terminal management commands executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Set the terminal window title.
    SetTitle(String),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Run an async future, map the result to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Like [`perform`](Command::perform), but at most one task per `key` is
    /// alive. Issuing a new keyed command aborts the previous one, so its
    /// message is never delivered.
    pub fn keyed<F, T>(
        key: &'static str,
        future: F,
        map: impl FnOnce(T) -> Msg + Send + 'static,
    ) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Keyed {
                key,
                future: Box::pin(async move { map(future.await) }),
            },
        }
    }

    /// Deliver `msg` after `delay`, cancelling any pending delivery under
    /// the same key.
    pub fn debounce(key: &'static str, delay: Duration, msg: Msg) -> Self {
        Command::keyed(key, tokio::time::sleep(delay), move |()| msg)
    }

    /// Abort the keyed task `key`. A no-op when nothing is running under it.
    pub fn cancel(key: &'static str) -> Self {
        Command {
            inner: CommandInner::Cancel(key),
        }
    }

    /// Send a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// Run multiple commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|cmd| !cmd.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Terminal management command.
    pub fn terminal(cmd: TerminalCommand) -> Self {
        Command {
            inner: CommandInner::Terminal(cmd),
        }
    }

    /// Set the terminal window title.
    pub fn set_title(title: impl Into<String>) -> Self {
        Command::terminal(TerminalCommand::SetTitle(title.into()))
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(std::sync::Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: std::sync::Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Action(Action::Message(msg)) => Command::message(f(msg)),
            CommandInner::Action(Action::Quit) => Command::quit(),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Keyed { key, future } => Command {
                inner: CommandInner::Keyed {
                    key,
                    future: Box::pin(async move { f(future.await) }),
                },
            },
            CommandInner::Cancel(key) => Command::cancel(key),
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
            CommandInner::Terminal(tcmd) => Command::terminal(tcmd),
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }

    /// The key of a keyed command.
    pub fn key(&self) -> Option<&'static str> {
        match self.inner {
            CommandInner::Keyed { key, .. } | CommandInner::Cancel(key) => Some(key),
            _ => None,
        }
    }

    /// Whether this command asks the runtime to quit.
    pub fn is_quit(&self) -> bool {
        matches!(self.inner, CommandInner::Action(Action::Quit))
    }
}
