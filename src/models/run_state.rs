//! Run State Model
//!
//! Lifecycle of a single interpreter run. Terminal states are final; a new
//! run always starts from a fresh state.

use std::fmt;

/// Execution state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run has been started
    #[default]
    Idle,
    /// Script is being written and the interpreter spawned
    Starting,
    /// Interpreter process is alive
    Running,
    /// Process exited on its own
    Completed,
    /// Process exited after a stop request
    Stopped,
    /// Script could not be written or the interpreter could not be spawned
    Failed,
}

impl RunState {
    /// Whether a run in this state still owns a live (or starting) process
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Starting | RunState::Running)
    }

    /// Whether this state is one of the final states
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Stopped | RunState::Failed
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Starting => "starting",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Stopped => "stopped",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}
