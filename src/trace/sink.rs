//! Trace sinks.

use crate::error::{Result, TraceError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only destination for trace statements.
pub trait TraceSink {
    /// Appends one statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be recorded.
    fn append(&mut self, statement: &str) -> Result<()>;
}

/// In-memory trace, mostly for tests and previews.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    statements: Vec<String>,
}

impl TraceLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    /// Recorded statements in order.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Counts statements containing `needle`.
    #[must_use]
    pub fn count_matching(&self, needle: &str) -> usize {
        self.statements.iter().filter(|s| s.contains(needle)).count()
    }
}

impl TraceSink for TraceLog {
    fn append(&mut self, statement: &str) -> Result<()> {
        self.statements.push(statement.to_string());
        Ok(())
    }
}

/// Trace file, one statement per line, opened in append mode.
#[derive(Debug)]
pub struct FileTraceSink {
    file: File,
    path: PathBuf,
}

impl FileTraceSink {
    /// Opens (or creates) a trace file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::WriteFailed`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TraceError::WriteFailed {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { file, path })
    }

    /// Path of the trace file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSink for FileTraceSink {
    fn append(&mut self, statement: &str) -> Result<()> {
        writeln!(self.file, "{statement}").map_err(|e| {
            TraceError::WriteFailed {
                path: self.path.to_string_lossy().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
