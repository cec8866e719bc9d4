//! Interpreter execution
//!
//! Runs translated programs through an external interpreter as isolated,
//! cancellable, streamed subprocesses.

pub mod decoder;
pub mod events;
pub mod runner;
pub mod script;
pub mod signals;

pub use decoder::OutputDecoder;
pub use events::{OutputEvent, RunEvents};
pub use runner::{ExecutionManager, RunSession, StopOutcome};
pub use script::ScriptFile;
