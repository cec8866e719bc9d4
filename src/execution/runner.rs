//! Interpreter Runs
//!
//! Each run is a tokio task that exclusively owns one interpreter child
//! process and one temporary script. Output is pushed to the caller as it
//! is read, stop requests arrive as messages, and state changes are
//! published on a watch channel.
//!
//! Event order for a run: stdout pieces (in order), at most one stderr
//! event, then `Completed`. The temporary script is gone before
//! `Completed` is sent.

use chrono::{DateTime, Local};
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use super::decoder::OutputDecoder;
use super::events::{self, EventSender, OutputEvent, RunEvents};
use super::script::ScriptFile;
use super::signals;
use crate::config::{InterpreterConfig, RunnerConfig};
use crate::error::Error;
use crate::models::RunState;

/// Result of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Termination was requested; `Completed` follows once the process exits
    Requested,
    /// No active run, or a stop was already requested
    NothingToStop,
}

/// Starts interpreter runs
#[derive(Debug, Clone, Default)]
pub struct ExecutionManager {
    interpreter: InterpreterConfig,
    runner: RunnerConfig,
}

impl ExecutionManager {
    pub fn new(interpreter: InterpreterConfig, runner: RunnerConfig) -> Self {
        Self {
            interpreter,
            runner,
        }
    }

    /// Replace the interpreter executable used by future runs
    pub fn set_interpreter_path(&mut self, path: PathBuf) {
        self.interpreter.path = path;
    }

    /// Start running `program` in a fresh run
    ///
    /// Must be called from within a tokio runtime. Failures to write the
    /// script or spawn the interpreter are reported as a `Stderr` event
    /// followed by `Completed`.
    pub fn start(&self, program: String) -> (RunSession, RunEvents) {
        let id = Uuid::new_v4().to_string();
        let (events_tx, events_rx) = events::channel(&id);
        let (state_tx, state_rx) = watch::channel(RunState::Starting);
        let (stop_tx, stop_rx) = mpsc::channel(1);

        let task = RunTask {
            id: id.clone(),
            program,
            interpreter: self.interpreter.clone(),
            runner: self.runner.clone(),
            events: events_tx,
            state: state_tx,
            stop_rx,
        };
        tokio::spawn(task.run());

        info!(
            "Run {}: starting '{}'",
            id,
            self.interpreter.path.display()
        );

        let session = RunSession {
            id,
            started_at: Local::now(),
            state_rx,
            stop_tx,
            stop_requested: false,
        };
        (session, events_rx)
    }
}

/// Caller-side handle of one run
///
/// Dropping the handle closes the stop channel, which the run task treats
/// as a stop request: nobody is left to observe the interpreter.
#[derive(Debug)]
pub struct RunSession {
    id: String,
    started_at: DateTime<Local>,
    state_rx: watch::Receiver<RunState>,
    stop_tx: mpsc::Sender<()>,
    stop_requested: bool,
}

impl RunSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Current state of the run
    pub fn state(&self) -> RunState {
        *self.state_rx.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Ask the interpreter to terminate
    ///
    /// Cleanup and `Completed` still happen through the normal path.
    pub fn stop(&mut self) -> StopOutcome {
        if self.stop_requested || !self.is_active() {
            return StopOutcome::NothingToStop;
        }

        match self.stop_tx.try_send(()) {
            Ok(()) => {
                self.stop_requested = true;
                info!("Run {}: stop requested", self.id);
                StopOutcome::Requested
            }
            Err(TrySendError::Full(())) => {
                self.stop_requested = true;
                StopOutcome::NothingToStop
            }
            Err(TrySendError::Closed(())) => StopOutcome::NothingToStop,
        }
    }

    /// Wait until the run reaches a terminal state
    pub async fn wait(&mut self) -> RunState {
        let mut rx = self.state_rx.clone();
        if rx.wait_for(|state| state.is_terminal()).await.is_err() {
            // Task went away without a final state (runtime shutdown).
            debug!("Run {}: state channel closed", self.id);
        }
        let state = *rx.borrow();
        state
    }
}

/// The task side of a run: owns the child process and the script file
struct RunTask {
    id: String,
    program: String,
    interpreter: InterpreterConfig,
    runner: RunnerConfig,
    events: EventSender,
    state: watch::Sender<RunState>,
    stop_rx: mpsc::Receiver<()>,
}

impl RunTask {
    async fn run(mut self) {
        let final_state = match ScriptFile::create(&self.program, &self.interpreter) {
            Ok(mut script) => {
                let state = self.execute(&script).await;
                script.cleanup();
                state
            }
            Err(e) => {
                error!("Run {}: {}", self.id, e);
                self.events.emit(OutputEvent::Stderr(e.to_string()));
                RunState::Failed
            }
        };

        info!("Run {}: {}", self.id, final_state);
        // Publish the terminal state and queue `Completed` under the watch
        // lock, so no observer sees one without the other.
        let events = &self.events;
        self.state.send_modify(|state| {
            *state = final_state;
            events.emit(OutputEvent::Completed);
        });
    }

    async fn execute(&mut self, script: &ScriptFile) -> RunState {
        let Some(path) = script.path() else {
            return RunState::Failed;
        };

        let spawned = Command::new(&self.interpreter.path)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let err = Error::SpawnFailed {
                    interpreter: self.interpreter.path.clone(),
                    reason: e.to_string(),
                };
                warn!("Run {}: {}", self.id, err);
                self.events.emit(OutputEvent::Stderr(err.to_string()));
                return RunState::Failed;
            }
        };

        self.state.send_replace(RunState::Running);
        debug!("Run {}: interpreter pid {:?}", self.id, child.id());

        if self.pump(&mut child).await {
            RunState::Stopped
        } else {
            RunState::Completed
        }
    }

    /// Stream output until stdout is done and the process has exited.
    /// Returns whether a stop was requested.
    async fn pump(&mut self, child: &mut Child) -> bool {
        let drain = self.runner.drain_timeout();
        let mut stdout = child.stdout.take();
        let mut stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Err(e) = stderr.read_to_end(&mut buf).await {
                    debug!("stderr read ended with error: {}", e);
                }
                buf
            })
        });

        let mut decoder = OutputDecoder::new();
        let mut buf = vec![0u8; self.runner.read_buffer_size];
        let mut stopping = false;
        let mut stop_open = true;
        let mut exited = false;

        while stdout.is_some() || !exited {
            // Once the process is gone, only drain what is already queued.
            let deadline = exited.then_some(drain);

            tokio::select! {
                biased;

                msg = self.stop_rx.recv(), if stop_open && !stopping => match msg {
                    Some(()) => {
                        stopping = true;
                        info!("Run {}: sending termination request", self.id);
                        if let Err(e) = signals::request_termination(child) {
                            warn!("Run {}: {}", self.id, e);
                        }
                    }
                    None => {
                        // Handle dropped: the run has no owner left.
                        stop_open = false;
                        stopping = true;
                        info!("Run {}: handle dropped; terminating interpreter", self.id);
                        if let Err(e) = signals::request_termination(child) {
                            warn!("Run {}: {}", self.id, e);
                        }
                    }
                },

                status = child.wait(), if !exited => {
                    exited = true;
                    match status {
                        Ok(status) => info!("Run {}: interpreter exited with {}", self.id, status),
                        Err(e) => warn!("Run {}: failed to wait for interpreter: {}", self.id, e),
                    }
                },

                read = read_chunk(stdout.as_mut(), &mut buf, deadline), if stdout.is_some() => match read {
                    Ok(0) => {
                        self.flush(&mut decoder);
                        stdout = None;
                    }
                    Ok(n) => {
                        for piece in decoder.push(&buf[..n]) {
                            self.events.emit(OutputEvent::Stdout(piece));
                        }
                    }
                    Err(e) => {
                        warn!("Run {}: stdout read failed: {}", self.id, e);
                        self.flush(&mut decoder);
                        stdout = None;
                    }
                },
            }
        }

        if let Some(task) = stderr_task.as_mut() {
            match tokio::time::timeout(drain, &mut *task).await {
                Ok(Ok(bytes)) if !bytes.is_empty() => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    self.events.emit(OutputEvent::Stderr(text));
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("Run {}: stderr reader failed: {}", self.id, e),
                Err(_) => {
                    warn!("Run {}: stderr still open after exit; dropping it", self.id);
                    task.abort();
                }
            }
        }

        stopping
    }

    fn flush(&self, decoder: &mut OutputDecoder) {
        if let Some(rest) = decoder.finish() {
            self.events.emit(OutputEvent::Stdout(rest));
        }
    }
}

/// One stdout read; pending forever without a stream. With a deadline, a
/// read that doesn't complete in time counts as end of stream.
async fn read_chunk(
    stdout: Option<&mut ChildStdout>,
    buf: &mut [u8],
    deadline: Option<Duration>,
) -> io::Result<usize> {
    let Some(stdout) = stdout else {
        return std::future::pending().await;
    };

    match deadline {
        None => stdout.read(buf).await,
        Some(limit) => match tokio::time::timeout(limit, stdout.read(buf)).await {
            Ok(read) => read,
            Err(_) => {
                debug!("stdout still open after exit; treating as closed");
                Ok(0)
            }
        },
    }
}
