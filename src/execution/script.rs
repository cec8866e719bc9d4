//! Temporary Script Files
//!
//! The translated program is written to a uniquely named file that lives
//! exactly as long as its run. Removal is attempted explicitly once the
//! interpreter has exited, and again on drop for any path that skipped it.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use crate::config::InterpreterConfig;
use crate::error::{Error, Result};

/// Scoped on-disk copy of a translated program
#[derive(Debug)]
pub struct ScriptFile {
    path: Option<TempPath>,
}

impl ScriptFile {
    /// Write `source` as UTF-8 to a fresh file named per `config`
    pub fn create(source: &str, config: &InterpreterConfig) -> Result<Self> {
        let suffix = format!(".{}", config.script_extension);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.script_prefix).suffix(&suffix);

        let dir = config
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let mut file = builder
            .tempfile_in(&dir)
            .map_err(|e| Error::ScriptWriteFailed {
                reason: format!("{}: {}", dir.display(), e),
            })?;

        let written = file.write_all(source.as_bytes()).and_then(|_| file.flush());
        if let Err(e) = written {
            return Err(Error::ScriptWriteFailed {
                reason: format!("{}: {}", file.path().display(), e),
            });
        }

        // Close our handle so the interpreter is the only reader.
        let path = file.into_temp_path();
        debug!("Wrote script {} ({} bytes)", path.display(), source.len());

        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remove the file now; failures are logged and swallowed
    pub fn cleanup(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        let removed: PathBuf = path.to_path_buf();
        match path.close() {
            Ok(()) => debug!("Removed script {}", removed.display()),
            Err(e) => warn!("Failed to remove script {}: {}", removed.display(), e),
        }
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        self.cleanup();
    }
}
