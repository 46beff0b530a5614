use crate::command::{Action, Command, CommandInner, TerminalCommand};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Terminal setup, rendering, or teardown failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// Every field has a default (see the [`Default`] impl). Override only what
/// you need with struct update syntax:
///
/// ```rust,ignore
/// use aisle_runtime::ProgramOptions;
///
/// let options = ProgramOptions {
///     fps: 30,
///     mouse: true,
///     title: Some("aisle".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Start in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse events (default: false).
    pub mouse: bool,
    /// Terminal title set before the first frame.
    pub title: Option<String>,
    /// Restore the terminal before the panic message prints (default: true).
    pub catch_panics: bool,
    /// Quit on Ctrl+C delivered as a signal (default: true).
    pub handle_signals: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse: false,
            title: None,
            catch_panics: true,
            handle_signals: true,
        }
    }
}

/// Wires a [`Model`] to the real terminal and drives the event loop until
/// the model returns [`Command::quit`] or the process is interrupted.
///
/// ```rust,ignore
/// let model = Program::<CatalogApp>::with_options(flags, options)?.run().await?;
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscription_manager: SubscriptionManager<M::Message>,
    keyed: HashMap<&'static str, AbortHandle>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
}

impl<M: Model> Program<M> {
    /// Create a program with [`ProgramOptions::default`].
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Initialize the terminal, call [`Model::init`], and run its command.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = init_terminal(&options)?;
        let subscription_manager = SubscriptionManager::new(msg_tx.clone());

        let mut program = Self {
            model,
            terminal,
            msg_tx,
            msg_rx,
            subscription_manager,
            keyed: HashMap::new(),
            options,
            needs_redraw: true,
            should_quit: false,
        };
        tracing::debug!(fps = program.options.fps, mouse = program.options.mouse, "program initialized");

        program.execute_command(init_cmd);
        let subs = program.model.subscriptions();
        program.subscription_manager.reconcile(subs);

        Ok(program)
    }

    /// Run until quit and hand back the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;

        tracing::debug!("shutting down");
        self.subscription_manager.shutdown();
        for (_, handle) in self.keyed.drain() {
            handle.abort();
        }
        restore_terminal(&self.options)?;

        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.options.handle_signals;

        loop {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    tracing::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);

                    // Micro-batch: drain whatever else is ready within 100µs, up to 100 messages
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut batch_count = 0u32;
                    while Instant::now() < deadline && batch_count < 100 {
                        match self.msg_rx.try_recv() {
                            Ok(msg) => {
                                self.process_message(msg);
                                batch_count += 1;
                            }
                            Err(_) => break,
                        }
                    }

                    if self.should_quit {
                        return Ok(());
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);

        let subs = self.model.subscriptions();
        self.subscription_manager.reconcile(subs);

        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                self.spawn(fut);
            }
            CommandInner::Keyed { key, future } => {
                if let Some(previous) = self.keyed.remove(key) {
                    previous.abort();
                }
                let handle = self.spawn(future);
                self.keyed.insert(key, handle);
            }
            CommandInner::Cancel(key) => {
                if let Some(previous) = self.keyed.remove(key) {
                    tracing::trace!(key, "cancelling keyed task");
                    previous.abort();
                }
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
            CommandInner::Terminal(tcmd) => {
                self.execute_terminal_command(tcmd);
            }
        }
    }

    fn spawn(&self, fut: futures::future::BoxFuture<'static, M::Message>) -> AbortHandle {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = fut.await;
            let _ = tx.send(msg);
        })
        .abort_handle()
    }

    fn execute_terminal_command(&mut self, cmd: TerminalCommand) {
        let mut writer = stdout();
        let result = match cmd {
            TerminalCommand::SetTitle(title) => execute!(writer, SetTitle(title)),
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "terminal command failed");
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Stdout>>, ProgramError> {
    // Installed once so repeated programs do not stack hooks.
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = stdout();

    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    execute!(writer, EnableBracketedPaste)?;
    if options.mouse {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    restore_terminal_minimal(options.alt_screen)?;
    Ok(())
}

/// Best effort: keep going when a step fails so as much state as possible
/// is restored, then report the raw-mode failure.
fn restore_terminal_minimal(alt_screen: bool) -> Result<(), std::io::Error> {
    let raw = disable_raw_mode();
    let mut writer = stdout();
    execute!(writer, DisableBracketedPaste).ok();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}
