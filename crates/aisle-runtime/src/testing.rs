use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use futures::future::BoxFuture;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::task::{AbortHandle, JoinSet};

/// A headless harness that drives a [`Model`] without a real terminal.
///
/// Synchronous messages ([`Command::message`]) queue up until
/// [`drain_messages`](TestProgram::drain_messages). Async commands queue up
/// as well and only start running inside [`settle`](TestProgram::settle) or
/// [`run_for`](TestProgram::run_for), so a plain `#[test]` can inspect state
/// without a tokio runtime. Keyed commands replace and abort each other just
/// as they do under [`Program`](crate::Program).
///
/// Under `#[tokio::test(start_paused = true)]` timers resolve in virtual
/// time, which makes debounce behaviour deterministic:
///
/// ```rust,ignore
/// let mut prog = TestProgram::<App>::new(flags);
/// prog.send(Msg::Typed("a".into()));
/// prog.run_for(Duration::from_millis(50)).await;
/// prog.send(Msg::Typed("ab".into()));
/// prog.settle().await;
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: VecDeque<M::Message>,
    queued: Vec<(Option<&'static str>, BoxFuture<'static, M::Message>)>,
    tasks: JoinSet<M::Message>,
    keyed: HashMap<&'static str, AbortHandle>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] and queue whatever command it returns.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: VecDeque::new(),
            queued: Vec::new(),
            tasks: JoinSet::new(),
            keyed: HashMap::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Run a single update cycle for `msg`.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process queued synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.pending_messages.pop_front() {
            self.send(msg);
        }
    }

    /// Run every queued and in-flight task to completion, feeding each
    /// result back through `update`, until nothing is left.
    ///
    /// Never returns if a task never resolves; use
    /// [`run_for`](TestProgram::run_for) for those.
    pub async fn settle(&mut self) {
        loop {
            self.drain_messages();
            self.spawn_queued();
            match self.tasks.join_next().await {
                None => break,
                Some(result) => self.deliver(result),
            }
        }
    }

    /// Like [`settle`](TestProgram::settle), but stop once `duration` of
    /// (possibly virtual) time has passed.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            self.drain_messages();
            self.spawn_queued();
            match tokio::time::timeout_at(deadline, self.tasks.join_next()).await {
                Err(_elapsed) => break,
                Ok(None) => {
                    tokio::time::sleep_until(deadline).await;
                    break;
                }
                Ok(Some(result)) => self.deliver(result),
            }
        }
    }

    /// Async commands queued or running.
    pub fn in_flight(&self) -> usize {
        self.queued.len() + self.tasks.len()
    }

    /// Whether the model has asked to quit.
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// The model as it stands after the last update.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access for arranging state without going through `update`.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render and return the buffer as text, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn deliver(&mut self, result: Result<M::Message, tokio::task::JoinError>) {
        match result {
            Ok(msg) => self.send(msg),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // aborted by a newer keyed command
            Err(_) => {}
        }
    }

    fn spawn_queued(&mut self) {
        for (key, fut) in self.queued.drain(..) {
            let handle = self.tasks.spawn(fut);
            if let Some(key) = key {
                self.keyed.insert(key, handle);
            }
        }
    }

    fn cancel_key(&mut self, key: &'static str) {
        self.queued.retain(|(queued_key, _)| *queued_key != Some(key));
        if let Some(handle) = self.keyed.remove(key) {
            handle.abort();
        }
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push_back(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.quit = true;
            }
            CommandInner::Future(fut) => {
                self.queued.push((None, fut));
            }
            CommandInner::Keyed { key, future } => {
                self.cancel_key(key);
                self.queued.push((Some(key), future));
            }
            CommandInner::Cancel(key) => self.cancel_key(key),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
            CommandInner::Terminal(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    const DELAY: Duration = Duration::from_millis(300);

    /// Echoes typed text once it has been stable for `DELAY`.
    struct Echo {
        typed: String,
        delivered: Vec<String>,
        fetched: Vec<u32>,
    }

    #[derive(Debug)]
    enum EchoMsg {
        Type(String),
        Settled(String),
        Fetch(u32),
        Fetched(u32),
        Abandon,
        Chain,
        Quit,
    }

    impl Model for Echo {
        type Message = EchoMsg;
        type Flags = ();

        fn init(_: ()) -> (Self, Command<EchoMsg>) {
            let echo = Echo {
                typed: String::new(),
                delivered: Vec::new(),
                fetched: Vec::new(),
            };
            (echo, Command::none())
        }

        fn update(&mut self, msg: EchoMsg) -> Command<EchoMsg> {
            match msg {
                EchoMsg::Type(text) => {
                    self.typed.clone_from(&text);
                    Command::debounce("echo", DELAY, EchoMsg::Settled(text))
                }
                EchoMsg::Settled(text) => {
                    self.delivered.push(text);
                    Command::none()
                }
                EchoMsg::Fetch(n) => Command::keyed(
                    "fetch",
                    async move {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        n
                    },
                    EchoMsg::Fetched,
                ),
                EchoMsg::Fetched(n) => {
                    self.fetched.push(n);
                    Command::none()
                }
                EchoMsg::Abandon => Command::cancel("fetch"),
                EchoMsg::Chain => Command::message(EchoMsg::Settled("chained".into())),
                EchoMsg::Quit => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("typed: {} | seen: {}", self.typed, self.delivered.join(","));
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_last_value_of_a_burst_is_delivered() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Type("a".into()));
        prog.run_for(Duration::from_millis(50)).await;
        prog.send(EchoMsg::Type("ab".into()));
        prog.run_for(Duration::from_millis(50)).await;
        prog.send(EchoMsg::Type("abc".into()));

        prog.run_for(Duration::from_millis(299)).await;
        assert!(prog.model().delivered.is_empty());

        prog.settle().await;
        assert_eq!(prog.model().delivered, vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn values_further_apart_than_the_delay_all_land() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Type("a".into()));
        prog.run_for(Duration::from_millis(400)).await;
        prog.send(EchoMsg::Type("ab".into()));
        prog.settle().await;
        assert_eq!(prog.model().delivered, vec!["a", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn keyed_command_replaces_in_flight_task() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Fetch(1));
        prog.run_for(Duration::from_millis(10)).await;
        prog.send(EchoMsg::Fetch(2));
        prog.settle().await;
        assert_eq!(prog.model().fetched, vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_keyed_task() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Fetch(1));
        assert_eq!(prog.in_flight(), 1);
        prog.send(EchoMsg::Abandon);
        assert_eq!(prog.in_flight(), 0);
        prog.settle().await;
        assert!(prog.model().fetched.is_empty());
    }

    #[test]
    fn sync_messages_chain() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Chain);
        assert!(prog.model().delivered.is_empty());
        prog.drain_messages();
        assert_eq!(prog.model().delivered, vec!["chained"]);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Quit);
        assert!(prog.has_quit());
    }

    #[test]
    fn renders_typed_text_immediately() {
        let mut prog = TestProgram::<Echo>::new(());
        prog.send(EchoMsg::Type("lamp".into()));
        let screen = prog.render_string(40, 1);
        assert!(screen.contains("typed: lamp"));
        assert!(screen.contains("seen: "));
    }
}
