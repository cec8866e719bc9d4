//! Configuration management for hanlua
//!
//! Which interpreter runs translated programs, how temporary scripts are
//! named, and the runner's I/O tunables. Loaded from TOML or JSON files by
//! [`loader::ConfigLoader`]; every field has a default.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for hanlua
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter and script settings
    pub interpreter: InterpreterConfig,

    /// Runner I/O settings
    pub runner: RunnerConfig,
}

/// Interpreter invocation and temporary script naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Interpreter executable; looked up on PATH when not absolute
    pub path: PathBuf,

    /// Extension of temporary script files, without the dot
    pub script_extension: String,

    /// File name prefix of temporary script files
    pub script_prefix: String,

    /// Directory for temporary scripts (platform temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lua"),
            script_extension: "lua".to_string(),
            script_prefix: "hanlua-".to_string(),
            temp_dir: None,
        }
    }
}

/// Output reading behaviour of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Bytes requested per stdout read
    pub read_buffer_size: usize,

    /// How long to keep draining pipes after the interpreter has exited
    pub drain_timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 4096,
            drain_timeout_ms: 500,
        }
    }
}

impl RunnerConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}
