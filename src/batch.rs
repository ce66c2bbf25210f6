//! Batch partitioning
//!
//! Given a file count and a worker count, pick a batch size that balances
//! parallelism against per-batch overhead, then split the enumerated targets
//! into disjoint batches. Batches are the unit of worker dispatch: no two
//! workers ever touch the same file, which is what makes the delete pipeline
//! lock-free.
//!
//! The sizing policy is a heuristic, not a scheduler. Its only hard contract:
//! the size is never zero, never exceeds the total, and the batches partition
//! the input exactly.

use std::path::{Path, PathBuf};

/// Below this many files, parallelism overhead is not worth it: one batch
const SMALL_SET_FLOOR: usize = 100;

/// Above this, shrink batches with worker count for load balancing
const MEDIUM_THRESHOLD: usize = 20_000;

/// Preferred files-per-worker for small sets
const PER_WORKER_TARGET: usize = 100;

/// Aim for roughly this many batches on medium-sized sets
const TARGET_BATCHES: usize = 15;

const DEFAULT_BATCH: usize = 250;
const MAX_BATCH: usize = 5_000;

/// What kind of filesystem object a target is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// A single file or directory slated for destruction.
///
/// Produced by one enumeration pass over the tree, immutable afterwards, and
/// consumed exactly once by the worker owning its batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTarget {
    /// Absolute path as enumerated
    pub path: PathBuf,

    /// File or directory
    pub kind: TargetKind,
}

impl DeletionTarget {
    /// A regular-file target
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::File,
        }
    }

    /// A directory target
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::Directory,
        }
    }

    /// Borrow the target path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An ordered sequence of targets assigned to one worker
#[derive(Debug)]
pub struct Batch {
    /// Batch index, used for thread naming and progress labels
    pub id: usize,

    /// Targets owned by this batch's worker
    pub targets: Vec<DeletionTarget>,
}

impl Batch {
    /// Number of targets in the batch
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when the batch holds no targets
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Compute the batch size for `total_files` spread over `worker_count`
/// workers.
///
/// Small sets collapse to a single batch; medium sets target roughly
/// [`TARGET_BATCHES`] batches; large sets shrink batches as the worker count
/// grows. Never returns zero and never exceeds `total_files` (except for the
/// degenerate zero-file case, where the returned size is 1 and no batch will
/// be built).
pub fn batch_size(total_files: usize, worker_count: usize) -> usize {
    let workers = worker_count.max(1);

    if total_files <= SMALL_SET_FLOOR {
        return total_files.max(1);
    }

    let size = if total_files < workers * PER_WORKER_TARGET {
        // Favor more, smaller batches so every worker gets work
        (total_files / workers).max(SMALL_SET_FLOOR)
    } else if total_files < MEDIUM_THRESHOLD {
        (total_files / TARGET_BATCHES).max(DEFAULT_BATCH)
    } else {
        (total_files / (workers * 2)).clamp(DEFAULT_BATCH, MAX_BATCH)
    };

    size.min(total_files)
}

/// Split `targets` into batches of at most `size` targets each.
///
/// Order is preserved, every target lands in exactly one batch, and no batch
/// is empty.
pub fn partition(targets: Vec<DeletionTarget>, size: usize) -> Vec<Batch> {
    let size = size.max(1);

    targets
        .chunks(size)
        .enumerate()
        .map(|(id, chunk)| Batch {
            id,
            targets: chunk.to_vec(),
        })
        .collect()
}
