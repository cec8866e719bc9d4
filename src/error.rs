//! Error types and Result aliases for hanlua

use std::path::PathBuf;

/// Result type alias for hanlua operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hanlua
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Session errors ===
    /// `run()` was called while another run is still active
    #[error("A program is already running; stop it first")]
    AlreadyRunning,

    /// `run()` was called before anything was translated
    #[error("No translated program to run; translate first")]
    EmptyProgram,

    // === Execution errors (reported through the run's output events) ===
    /// The interpreter could not be started
    #[error("Failed to start interpreter '{}': {reason}", interpreter.display())]
    SpawnFailed { interpreter: PathBuf, reason: String },

    /// The temporary script could not be written
    #[error("Failed to write temporary script: {reason}")]
    ScriptWriteFailed { reason: String },

    /// Failed to send signal to process
    #[error("Failed to send signal '{signal}': {reason}")]
    SignalSendFailed { signal: String, reason: String },

    // === Vocabulary errors ===
    /// A surface token appears more than once in a table
    #[error("Surface token '{surface}' is defined more than once")]
    DuplicateSurfaceToken { surface: String },

    /// Regex compilation errors
    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller can simply retry after changing session state
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::Regex(_) | Error::DuplicateSurfaceToken { .. } | Error::ConfigValidationFailed { .. }
        )
    }
}
