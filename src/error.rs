//! Error types for scour
//!
//! This module defines the error hierarchy covering:
//! - Per-stage pipeline failures (rename, scrub, erase)
//! - Configuration and CLI errors
//! - Worker thread errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the path and the underlying cause
//! - Per-file stage failures are recorded and never abort a batch; only the
//!   startup eraser check may terminate the invocation

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for the scour application
#[derive(Error, Debug)]
pub enum ScourError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The external secure-delete utility is missing or unusable.
    /// This is the only error allowed to abort a run before any file
    /// is touched.
    #[error("Secure-delete utility unavailable: {0}")]
    EraserUnavailable(String),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failed to rename a target to its opaque name
#[derive(Error, Debug)]
#[error("Failed to rename '{path}': {source}")]
pub struct RenameError {
    /// The path that could not be renamed
    pub path: PathBuf,

    /// Underlying OS error (permissions, path length, collision)
    #[source]
    pub source: std::io::Error,
}

/// Content scrubbing errors
///
/// Every variant carries the path being scrubbed so the failure can be
/// recorded against the original target.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Could not open the file for in-place rewriting
    #[error("Failed to open '{path}' for scrubbing: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failed mid-scrub
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Write failed mid-scrub (file locked, disk full, permission)
    #[error("Failed to overwrite '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Flush or sync to stable storage failed
    #[error("Failed to sync '{path}' to stable storage: {source}")]
    Sync {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrubError {
    /// The path the failed scrub operated on
    pub fn path(&self) -> &Path {
        match self {
            ScrubError::Open { path, .. }
            | ScrubError::Read { path, .. }
            | ScrubError::Write { path, .. }
            | ScrubError::Sync { path, .. } => path,
        }
    }
}

/// External eraser errors
#[derive(Error, Debug)]
pub enum EraseError {
    /// The eraser process could not be launched at all
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The eraser ran but reported failure
    #[error("'{program}' exited with status {code} for '{path}': {stderr}")]
    CommandFailed {
        program: String,
        path: PathBuf,
        code: i32,
        stderr: String,
    },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid overwrite pass count
    #[error("Invalid pass count {count}: must be between 1 and {max}")]
    InvalidPassCount { count: u32, max: u32 },

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// Flatten mode needs an explicit source tree
    #[error("Flatten mode requires at least one target directory")]
    FlattenRequiresTarget,

    /// Output directory error
    #[error("Invalid output directory '{path}': {reason}")]
    InvalidOutputDir { path: PathBuf, reason: String },

    /// Empty eraser command override
    #[error("Eraser command override is empty")]
    EmptyEraserCommand,
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },

    /// Worker thread could not be spawned
    #[error("Failed to start worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Result type alias for ScourError
pub type Result<T> = std::result::Result<T, ScourError>;
