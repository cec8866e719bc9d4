//! hanlua - write Lua with Korean keywords
//!
//! This library turns source text written with a Korean keyword vocabulary
//! into Lua by whole-word token substitution, then runs the result through
//! an external Lua interpreter while streaming its output back.
//!
//! ## Module Organization
//!
//! - [`vocabulary`] - The Korean → Lua token table
//! - [`translator`] - Whole-word token substitution
//! - [`execution`] - Interpreter runs: temp scripts, streamed output, stop
//! - [`session`] - Translate/run/stop controller, one run at a time
//! - [`config`] - Configuration loading and defaults
//! - [`models`] - Shared data types (run state)
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use hanlua::{OutputEvent, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> hanlua::Result<()> {
//! let mut session = Session::default();
//! session.translate("출력(참)");
//!
//! let mut events = session.run()?;
//! while let Some(event) = events.recv().await {
//!     match event {
//!         OutputEvent::Stdout(text) => print!("{}", text),
//!         OutputEvent::Stderr(text) => eprint!("{}", text),
//!         OutputEvent::Completed => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Translation** is a pure function over one compiled regex.
//! - **Each run** is a tokio task owning the interpreter child and its
//!   temporary script; output events flow to the caller over an
//!   `mpsc` channel, stop requests flow back over another.
//!
//! Nothing in this library exits the host process; run failures arrive as
//! `Stderr` events followed by `Completed`.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod session;
pub mod translator;
pub mod vocabulary;

pub use config::loader::ConfigLoader;
pub use config::Config;
pub use error::{Error, Result};
pub use execution::{OutputEvent, RunEvents, StopOutcome};
pub use models::RunState;
pub use session::Session;
pub use translator::Translator;
pub use vocabulary::{TokenCategory, Vocabulary, VocabularyEntry};

/// The current version of hanlua from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Create a session from the default configuration locations
///
/// Falls back to built-in defaults when no configuration file is found or
/// the one found is unusable.
pub fn init() -> Session {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    Session::new(config)
}

/// Create a session from a specific configuration file
pub fn init_with_config(config_path: &std::path::Path) -> Result<Session> {
    info!(
        "Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    let config = ConfigLoader::load_from_file(config_path)?;
    Ok(Session::new(config))
}
