//! Worker thread logic for parallel file deletion
//!
//! Each worker:
//! - Owns one batch of targets; no two workers ever touch the same file
//! - Applies obfuscate -> scrub -> erase to each target in order
//! - Sends failure records through the shared error channel
//! - Advances its progress bar after every target, success or failure
//!
//! Failures never abort a batch: every stage error is recorded against the
//! target's original path and the pipeline moves on.

use crate::batch::Batch;
use crate::config::RunConfig;
use crate::error::WorkerError;
use crate::eraser::SecureEraser;
use crate::obfuscate;
use crate::report::{ErrorRecord, Stage};
use crate::scrub::Scrubber;
use crossbeam_channel::Sender;
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Counters a worker accumulates locally and hands back at join
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchStats {
    /// Files successfully erased
    pub files_deleted: u64,

    /// Bytes reclaimed from erased files
    pub bytes_freed: u64,
}

/// A worker thread processing one batch of deletion targets
pub struct BatchWorker {
    id: usize,
    handle: Option<JoinHandle<BatchStats>>,
}

impl BatchWorker {
    /// Spawn a worker for `batch`
    pub fn spawn(
        batch: Batch,
        config: Arc<RunConfig>,
        scrubber: Arc<Scrubber>,
        eraser: Arc<dyn SecureEraser>,
        errors: Sender<ErrorRecord>,
        bar: ProgressBar,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, WorkerError> {
        let id = batch.id;

        let handle = thread::Builder::new()
            .name(format!("scour-{id}"))
            .spawn(move || worker_loop(batch, config, scrubber, eraser, errors, bar, shutdown))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    /// Worker ID (same as the batch ID)
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish and collect its counters
    pub fn join(mut self) -> Result<BatchStats, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WorkerError::Panicked { id: self.id }),
            None => Ok(BatchStats::default()),
        }
    }
}

fn worker_loop(
    batch: Batch,
    config: Arc<RunConfig>,
    scrubber: Arc<Scrubber>,
    eraser: Arc<dyn SecureEraser>,
    errors: Sender<ErrorRecord>,
    bar: ProgressBar,
    shutdown: Arc<AtomicBool>,
) -> BatchStats {
    debug!(
        worker = batch.id,
        targets = batch.targets.len(),
        "Batch worker starting"
    );

    let mut stats = BatchStats::default();

    for target in &batch.targets {
        if shutdown.load(Ordering::Relaxed) {
            debug!(worker = batch.id, "Shutdown requested, leaving batch early");
            break;
        }

        let mut records = Vec::new();
        if let Some(bytes) = delete_file(&config, &scrubber, eraser.as_ref(), target.path(), &mut records)
        {
            stats.files_deleted += 1;
            stats.bytes_freed += bytes;
        }

        for record in records {
            // The coordinator outlives every worker, so the channel cannot
            // be closed here; ignore the send result anyway
            let _ = errors.send(record);
        }

        bar.inc(1);
    }

    bar.finish();

    debug!(
        worker = batch.id,
        deleted = stats.files_deleted,
        "Batch worker finished"
    );

    stats
}

/// Run the full per-file pipeline: obfuscate -> scrub -> erase.
///
/// Returns the reclaimed byte count when the eraser succeeds. Every stage
/// failure is pushed to `records` with the file's original path, and later
/// stages still run against whichever path the file currently has.
pub(crate) fn delete_file(
    config: &RunConfig,
    scrubber: &Scrubber,
    eraser: &dyn SecureEraser,
    path: &Path,
    records: &mut Vec<ErrorRecord>,
) -> Option<u64> {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    // Stage 1: decouple the visible name from the content. On failure the
    // original path is kept so the remaining stages still attempt cleanup.
    let work_path = match obfuscate::obfuscate(path) {
        Ok(renamed) => {
            trace!(from = %path.display(), to = %renamed.display(), "Obfuscated");
            renamed
        }
        Err(e) => {
            records.push(ErrorRecord::new(path, Stage::Rename, &e));
            path.to_path_buf()
        }
    };

    // Stage 2: scrub content in place
    if config.scrub_mode.encrypts() {
        if let Err(e) = scrubber.encrypt_in_place(&work_path) {
            records.push(ErrorRecord::new(path, Stage::Scrub, &e));
        }
    }

    if config.scrub_mode.overwrites() {
        if let Err(e) = scrubber.overwrite(&work_path, config.overwrite_passes) {
            records.push(ErrorRecord::new(path, Stage::Scrub, &e));
        }
    }

    // Stage 3: final unlink through the external eraser
    match eraser.erase(&work_path) {
        Ok(()) => {
            trace!(path = %work_path.display(), "Erased");
            Some(size)
        }
        Err(e) => {
            records.push(ErrorRecord::new(path, Stage::Erase, &e));
            None
        }
    }
}
