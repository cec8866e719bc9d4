//! Process termination
//!
//! Stop requests ask the interpreter to exit; they never force-kill on
//! platforms that have a graceful termination signal.

use tokio::process::Child;

use crate::error::{Error, Result};

/// Ask a child process to terminate (SIGTERM on Unix)
#[cfg(unix)]
pub fn request_termination(child: &mut Child) -> Result<()> {
    use nix::sys::signal::{kill, Signal as NixSignal};
    use nix::unistd::Pid;

    // `id()` is None once the child has been reaped; nothing left to signal.
    let Some(pid) = child.id() else {
        return Ok(());
    };

    kill(Pid::from_raw(pid as i32), NixSignal::SIGTERM).map_err(|e| Error::SignalSendFailed {
        signal: "SIGTERM".to_string(),
        reason: e.to_string(),
    })
}

/// No graceful termination signal exists here; fall back to a kill
#[cfg(not(unix))]
pub fn request_termination(child: &mut Child) -> Result<()> {
    child.start_kill().map_err(|e| Error::SignalSendFailed {
        signal: "kill".to_string(),
        reason: e.to_string(),
    })
}
