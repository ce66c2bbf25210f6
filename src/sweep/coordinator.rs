//! Sweep coordinator - orchestrates the parallel secure-delete run
//!
//! The coordinator is responsible for:
//! - The one-time eraser availability check at startup
//! - Enumerating files under each target root
//! - Partitioning targets into batches and spawning one worker per batch
//! - Joining workers and merging their counters and error records
//! - The sequential bottom-up directory sweep after the file phase
//! - Producing the final RunReport

use crate::batch::{self, DeletionTarget};
use crate::config::RunConfig;
use crate::eraser::{CommandEraser, SecureEraser};
use crate::error::Result;
use crate::flatten;
use crate::obfuscate;
use crate::progress::ProgressSet;
use crate::report::{ErrorRecord, RunReport, Stage};
use crate::scrub::Scrubber;
use crate::sweep::worker::{delete_file, BatchWorker};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Coordinates one secure-delete invocation
impl std::fmt::Debug for SweepCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepCoordinator")
            .field("config", &self.config)
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

pub struct SweepCoordinator {
    /// Configuration
    config: Arc<RunConfig>,

    /// Secure-erase backend (real utility or a test double)
    eraser: Arc<dyn SecureEraser>,

    /// Per-process scrubber; its cipher key dies with the process
    scrubber: Arc<Scrubber>,

    /// Shutdown signal, set by the Ctrl-C handler
    shutdown: Arc<AtomicBool>,
}

impl SweepCoordinator {
    /// Create a coordinator with the configured command-line eraser.
    ///
    /// Fails with `ScourError::EraserUnavailable` when the utility is not on
    /// PATH - before any file is touched.
    pub fn new(config: RunConfig) -> Result<Self> {
        let eraser: Arc<dyn SecureEraser> = match &config.eraser_command {
            Some(spec) => Arc::new(CommandEraser::from_spec(spec)?),
            None => Arc::new(CommandEraser::platform_default()),
        };

        Self::with_eraser(config, eraser)
    }

    /// Create a coordinator with a caller-supplied eraser backend
    pub fn with_eraser(config: RunConfig, eraser: Arc<dyn SecureEraser>) -> Result<Self> {
        // Startup dependency check: the only failure allowed to abort the
        // whole invocation
        if !config.dry_run {
            eraser.check()?;
        }

        Ok(Self {
            config: Arc::new(config),
            eraser,
            scrubber: Arc::new(Scrubber::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Describe the active eraser backend for the run header
    pub fn eraser_description(&self) -> String {
        self.eraser.describe()
    }

    /// Run the full invocation over every configured target root
    pub fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        let mut report = RunReport::default();

        info!(
            started_at = %Utc::now().to_rfc3339(),
            targets = self.config.targets.len(),
            workers = self.config.worker_count,
            dry_run = self.config.dry_run,
            "Starting secure-delete run"
        );

        let targets = self.config.targets.clone();
        for root in &targets {
            if self.shutdown.load(Ordering::Relaxed) {
                report.interrupted = true;
                break;
            }

            if !root.exists() {
                warn!(path = %root.display(), "Target not found, skipping");
                continue;
            }

            if let Some(output) = &self.config.flatten_output {
                if root.is_file() {
                    warn!(path = %root.display(), "Flatten mode expects a directory, skipping");
                    continue;
                }
                flatten::flatten_tree(
                    &self.config,
                    self.eraser.as_ref(),
                    root,
                    output,
                    &mut report,
                    &self.shutdown,
                )?;
            } else if root.is_file() {
                self.delete_single_file(root, &mut report);
            } else {
                self.delete_tree(root, &mut report)?;
            }
        }

        if self.shutdown.load(Ordering::Relaxed) {
            report.interrupted = true;
        }

        report.duration = started.elapsed();

        info!(
            files = report.total_files(),
            dirs = report.total_dirs(),
            errors = report.errors.len(),
            duration_secs = report.duration.as_secs(),
            "Run completed"
        );

        Ok(report)
    }

    /// Delete one regular-file root inline, without worker dispatch
    fn delete_single_file(&self, path: &Path, report: &mut RunReport) {
        if self.config.dry_run {
            report.root_mut(path).files = 1;
            return;
        }

        let mut records = Vec::new();
        if let Some(bytes) = delete_file(
            &self.config,
            &self.scrubber,
            self.eraser.as_ref(),
            path,
            &mut records,
        ) {
            report.root_mut(path).files = 1;
            report.bytes_freed += bytes;
        }
        report.errors.append(&mut records);
    }

    /// Delete every file under `root` in parallel, then sweep directories
    fn delete_tree(&self, root: &Path, report: &mut RunReport) -> Result<()> {
        let files = enumerate_files(&self.config, root);

        if files.is_empty() {
            info!(root = %root.display(), "No files to delete");
        } else if self.config.dry_run {
            info!(
                root = %root.display(),
                files = files.len(),
                "Dry run: would delete"
            );
            report.root_mut(root).files = files.len() as u64;
            return Ok(());
        } else {
            self.dispatch_batches(root, files, report)?;
        }

        if self.config.dry_run {
            return Ok(());
        }

        if !self.shutdown.load(Ordering::Relaxed) {
            self.sweep_directories(root, report);
        }

        Ok(())
    }

    /// Partition files into batches, run one worker per batch, merge results
    fn dispatch_batches(
        &self,
        root: &Path,
        files: Vec<DeletionTarget>,
        report: &mut RunReport,
    ) -> Result<()> {
        let total = files.len();
        let size = batch::batch_size(total, self.config.worker_count);
        let batches = batch::partition(files, size);

        info!(
            root = %root.display(),
            files = total,
            batches = batches.len(),
            batch_size = size,
            "Dispatching workers"
        );

        let progress = ProgressSet::new(self.config.show_progress);
        let (err_tx, err_rx) = crossbeam_channel::unbounded::<ErrorRecord>();
        let mut workers = Vec::with_capacity(batches.len());

        for batch in batches {
            let bar = progress.add_batch_bar(batch.id, batch.len() as u64);
            let worker = BatchWorker::spawn(
                batch,
                Arc::clone(&self.config),
                Arc::clone(&self.scrubber),
                Arc::clone(&self.eraser),
                err_tx.clone(),
                bar,
                Arc::clone(&self.shutdown),
            )?;
            workers.push(worker);
        }

        // Join every worker; a failed batch never cancels its siblings
        for worker in workers {
            let id = worker.id();
            match worker.join() {
                Ok(stats) => {
                    report.root_mut(root).files += stats.files_deleted;
                    report.bytes_freed += stats.bytes_freed;
                }
                Err(e) => {
                    warn!(worker = id, error = %e, "Worker failed to join cleanly");
                }
            }
        }

        // All worker senders are dropped after the joins above; draining the
        // channel therefore terminates
        drop(err_tx);
        for record in err_rx {
            report.errors.push(record);
        }

        Ok(())
    }

    /// Remove now-empty directories bottom-up.
    ///
    /// Runs strictly after the file phase joins. Directories left non-empty
    /// by failed file deletions are skipped silently; only a failing removal
    /// of an empty directory is recorded.
    fn sweep_directories(&self, root: &Path, report: &mut RunReport) {
        for entry in WalkDir::new(root)
            .follow_links(false)
            .contents_first(true)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if self.shutdown.load(Ordering::Relaxed) {
                report.interrupted = true;
                return;
            }

            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            let empty = match fs::read_dir(dir) {
                Ok(mut entries) => entries.next().is_none(),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Cannot list directory, skipping");
                    continue;
                }
            };

            if !empty {
                continue;
            }

            let work_path = match obfuscate::obfuscate(dir) {
                Ok(renamed) => renamed,
                Err(e) => {
                    report.errors.push(ErrorRecord::new(dir, Stage::Rename, &e));
                    dir.to_path_buf()
                }
            };

            match self.eraser.erase(&work_path) {
                Ok(()) => {
                    report.root_mut(root).dirs += 1;
                    debug!(dir = %dir.display(), "Removed empty directory");
                }
                Err(e) => {
                    report.errors.push(ErrorRecord::new(dir, Stage::Erase, &e));
                }
            }
        }
    }
}

/// Enumerate every regular file under `root`, top-down.
///
/// Symbolic links are never followed, so link cycles and cross-volume
/// deletions cannot happen. Exclude patterns filter at enumeration time.
/// The tree is assumed quiescent during enumeration; concurrent modification
/// is a documented precondition violation, not an enforced invariant.
pub(crate) fn enumerate_files(config: &RunConfig, root: &Path) -> Vec<DeletionTarget> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Enumeration error, skipping entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !config.is_excluded(entry.path()))
        .map(|entry| DeletionTarget::file(entry.path()))
        .collect()
}
