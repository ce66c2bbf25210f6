//! scour - Parallel Secure-Delete Tool
//!
//! A tool for destroying directory trees beyond recovery: every file is
//! renamed to a random opaque name, scrubbed in place, and finally unlinked
//! by an external secure-delete utility, with the per-file work spread over
//! parallel worker batches.
//!
//! # Features
//!
//! - **Name Obfuscation**: targets are renamed to random alphanumeric names
//!   before destruction, so nothing about the original name survives.
//!
//! - **Two Scrub Strategies**: encrypt-and-discard-key (XChaCha20 under a
//!   process-lifetime key) and multi-pass random overwrite with forced sync,
//!   individually selectable or combined.
//!
//! - **Pluggable Eraser**: the final unlink shells out to the platform
//!   secure-delete utility (`sdelete`, `srm`, ...) behind a trait, so the
//!   orchestration is testable without the real binary.
//!
//! - **Parallel Batches**: files are partitioned into disjoint batches, one
//!   worker thread per batch; a failure never aborts a batch or the run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SweepCoordinator                        │
//! │  enumerate ► partition ► dispatch ► join ► sweep ► report   │
//! └───────┬─────────────┬──────────────┬───────────────────────┘
//!         │             │              │
//!   ┌─────▼─────┐ ┌─────▼─────┐  ┌─────▼─────┐
//!   │  Worker 0 │ │  Worker 1 │  │  Worker N │   one per batch
//!   │ obfuscate │ │ obfuscate │  │ obfuscate │
//!   │   scrub   │ │   scrub   │  │   scrub   │
//!   │   erase   │ │   erase   │  │   erase   │
//!   └─────┬─────┘ └─────┬─────┘  └─────┬─────┘
//!         │             │              │
//!         └──────► error channel ◄─────┘
//!                (merged into RunReport)
//! ```
//!
//! # Example
//!
//! ```bash
//! # Scrub and delete a render directory with 8 workers
//! scour -w 8 --passes 3 /data/old-renders
//!
//! # Preview what a browser-cache sweep would remove
//! scour --preset browser-cache --dry-run
//!
//! # Relocate files under opaque names instead of deleting
//! scour --flatten --output staging /data/old-renders
//! ```

pub mod batch;
pub mod config;
pub mod eraser;
pub mod error;
pub mod flatten;
pub mod obfuscate;
pub mod progress;
pub mod report;
pub mod scrub;
pub mod sweep;

pub use batch::{Batch, DeletionTarget, TargetKind};
pub use config::{CliArgs, Preset, RunConfig, ScrubMode};
pub use eraser::{CommandEraser, SecureEraser};
pub use error::{EraseError, RenameError, Result, ScourError, ScrubError};
pub use report::{ErrorRecord, RunReport, Stage};
pub use scrub::Scrubber;
pub use sweep::SweepCoordinator;
