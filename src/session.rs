//! Interactive console loop shared by the `weather`, `browse`, `cua` and
//! `learn` commands.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

pub const TASK_PROMPT: &str = "\nEnter a task ('exit' to quit): ";
pub const EMPTY_INPUT_HINT: &str = "Please enter a task.";
pub const FAREWELL: &str = "Goodbye!";

/// One read from the prompt source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Line(String),
    Eof,
    Interrupted,
}

#[async_trait]
pub trait PromptSource: Send + Sync {
    async fn next_line(&self, prompt: &str) -> io::Result<PromptEvent>;
}

/// Yes/no question put to the operator.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
}

#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Handle one task; the returned text is printed to the console.
    async fn handle(&self, task: &str) -> anyhow::Result<String>;

    /// Called after an interrupted `handle` future was dropped. Resources the
    /// task still holds must be freed here.
    async fn release(&self) {}
}

/// Operator interrupt.
#[async_trait]
pub trait Interrupt: Send + Sync {
    /// Resolves once the interrupt has fired.
    async fn interrupted(&self);
}

#[derive(Default)]
struct FlagState {
    fired: AtomicBool,
    notify: Notify,
}

/// Interrupt that stays fired once raised. Clones share the same state.
#[derive(Clone, Default)]
pub struct InterruptFlag {
    state: Arc<FlagState>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag raised by the first Ctrl-C. Needs a running tokio runtime.
    pub fn on_ctrl_c() -> Self {
        let flag = Self::new();
        let signal = flag.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupt received");
                    signal.fire();
                }
                Err(err) => warn!(?err, "failed to listen for Ctrl-C"),
            }
        });
        flag
    }

    pub fn fire(&self) {
        self.state.fired.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_fired(&self) -> bool {
        self.state.fired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Interrupt for InterruptFlag {
    async fn interrupted(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.is_fired() {
                return;
            }
            notified.await;
        }
    }
}

/// Stdin-backed prompt. Clones share the same line reader and Ctrl-C flag.
#[derive(Clone)]
pub struct Console {
    lines: Arc<tokio::sync::Mutex<Lines<BufReader<Stdin>>>>,
    interrupt: InterruptFlag,
}

impl Console {
    /// Must be called inside a tokio runtime.
    pub fn new() -> Self {
        Self {
            lines: Arc::new(tokio::sync::Mutex::new(
                BufReader::new(tokio::io::stdin()).lines(),
            )),
            interrupt: InterruptFlag::on_ctrl_c(),
        }
    }

    pub fn interrupt(&self) -> &InterruptFlag {
        &self.interrupt
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptSource for Console {
    async fn next_line(&self, prompt: &str) -> io::Result<PromptEvent> {
        {
            let mut stdout = io::stdout();
            write!(stdout, "{prompt}")?;
            stdout.flush()?;
        }
        let mut lines = self.lines.lock().await;
        tokio::select! {
            biased;
            _ = self.interrupt.interrupted() => Ok(PromptEvent::Interrupted),
            line = lines.next_line() => Ok(match line? {
                Some(line) => PromptEvent::Line(line),
                None => PromptEvent::Eof,
            }),
        }
    }
}

#[async_trait]
impl Interrupt for Console {
    async fn interrupted(&self) {
        self.interrupt.interrupted().await
    }
}

#[async_trait]
impl Confirm for Console {
    async fn confirm(&self, question: &str) -> bool {
        match self.next_line(&format!("{question} (y/n): ")).await {
            Ok(PromptEvent::Line(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

/// Only `y` (either case) counts as consent.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Prompt source fed from a fixed list of lines; reports EOF when drained.
#[derive(Default)]
pub struct ScriptedPrompt {
    lines: Mutex<VecDeque<PromptEvent>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(|l| PromptEvent::Line(l.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn then_interrupt(self) -> Self {
        lock(&self.lines)
            .push_back(PromptEvent::Interrupted);
        self
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl PromptSource for ScriptedPrompt {
    async fn next_line(&self, prompt: &str) -> io::Result<PromptEvent> {
        lock(&self.prompts).push(prompt.to_string());
        Ok(lock(&self.lines).pop_front().unwrap_or(PromptEvent::Eof))
    }
}

#[async_trait]
impl Confirm for ScriptedPrompt {
    async fn confirm(&self, question: &str) -> bool {
        match self.next_line(question).await {
            Ok(PromptEvent::Line(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Exit,
    InputClosed,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub handled: usize,
    pub failed: usize,
    pub exit: LoopExit,
}

/// Read tasks until `exit`, EOF or an interrupt. Blank lines never reach the
/// handler; handler errors are printed and the loop goes on. An interrupt
/// while a task runs drops the task and calls [`TaskHandler::release`].
pub async fn run_task_loop(
    source: &dyn PromptSource,
    interrupt: &dyn Interrupt,
    handler: &dyn TaskHandler,
    out: &mut (dyn Write + Send),
) -> io::Result<LoopSummary> {
    let mut handled = 0;
    let mut failed = 0;

    let exit = loop {
        let line = match source.next_line(TASK_PROMPT).await? {
            PromptEvent::Line(line) => line,
            PromptEvent::Eof => {
                writeln!(out, "\nInput closed. {FAREWELL}")?;
                break LoopExit::InputClosed;
            }
            PromptEvent::Interrupted => {
                writeln!(out, "\nInterrupted. {FAREWELL}")?;
                break LoopExit::Interrupted;
            }
        };

        let task = line.trim();
        if task.eq_ignore_ascii_case("exit") {
            writeln!(out, "{FAREWELL}")?;
            break LoopExit::Exit;
        }
        if task.is_empty() {
            debug!("empty input; prompting again");
            writeln!(out, "{EMPTY_INPUT_HINT}")?;
            continue;
        }

        info!(task, "handling task");
        let outcome = tokio::select! {
            biased;
            _ = interrupt.interrupted() => None,
            result = handler.handle(task) => Some(result),
        };
        let Some(result) = outcome else {
            warn!(task, "task interrupted");
            handler.release().await;
            writeln!(out, "\nInterrupted. {FAREWELL}")?;
            break LoopExit::Interrupted;
        };
        match result {
            Ok(output) => {
                handled += 1;
                if !output.is_empty() {
                    writeln!(out, "{output}")?;
                }
            }
            Err(err) => {
                failed += 1;
                error!(error = %err, "task failed");
                writeln!(out, "Error: {err:#}")?;
            }
        }
    };

    Ok(LoopSummary {
        handled,
        failed,
        exit,
    })
}
