//! Session Controller
//!
//! The surface a front end talks to: translate the current source, run the
//! latest translation, stop it, and report its state. At most one run is
//! active per session; a second `run()` is rejected rather than queued.

use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::execution::{ExecutionManager, RunEvents, RunSession, StopOutcome};
use crate::models::RunState;
use crate::translator::Translator;

pub struct Session {
    translator: Translator,
    manager: ExecutionManager,
    translation: Option<String>,
    active: Option<RunSession>,
}

impl Session {
    /// Session using the built-in Korean → Lua vocabulary
    pub fn new(config: Config) -> Self {
        Self::with_translator(config, Translator::korean_lua().clone())
    }

    pub fn with_translator(config: Config, translator: Translator) -> Self {
        Self {
            translator,
            manager: ExecutionManager::new(config.interpreter, config.runner),
            translation: None,
            active: None,
        }
    }

    /// Translate `source`, replacing any previous translation
    pub fn translate(&mut self, source: &str) -> &str {
        let translated = self.translator.translate(source);
        debug!(
            "Translated {} bytes into {} bytes",
            source.len(),
            translated.len()
        );
        self.translation.insert(translated).as_str()
    }

    /// The most recent translation
    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    /// Interpreter used by the next run
    pub fn set_interpreter(&mut self, path: PathBuf) {
        self.manager.set_interpreter_path(path);
    }

    /// Run the latest translation
    ///
    /// Must be called from within a tokio runtime.
    pub fn run(&mut self) -> Result<RunEvents> {
        if let Some(run) = &self.active {
            if run.is_active() {
                warn!("Run {} is still active; rejecting new run", run.id());
                return Err(Error::AlreadyRunning);
            }
        }

        let program = match &self.translation {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => return Err(Error::EmptyProgram),
        };

        let (run, events) = self.manager.start(program);
        self.active = Some(run);
        Ok(events)
    }

    /// Stop the active run, if any
    pub fn stop(&mut self) -> StopOutcome {
        match self.active.as_mut() {
            Some(run) => run.stop(),
            None => {
                debug!("Stop requested with no run");
                StopOutcome::NothingToStop
            }
        }
    }

    /// State of the latest run; `Idle` before the first run
    pub fn status(&self) -> RunState {
        self.active
            .as_ref()
            .map(RunSession::state)
            .unwrap_or_default()
    }

    /// When the latest run was started
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.active.as_ref().map(RunSession::started_at)
    }

    pub fn active_run_id(&self) -> Option<&str> {
        self.active
            .as_ref()
            .filter(|run| run.is_active())
            .map(RunSession::id)
    }

    /// Wait for the latest run to reach a terminal state
    pub async fn wait(&mut self) -> RunState {
        match self.active.as_mut() {
            Some(run) => run.wait().await,
            None => RunState::Idle,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
