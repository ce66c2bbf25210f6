//! Parallel delete orchestration
//!
//! One invocation moves through a fixed sequence of states:
//!
//! ```text
//! Enumerate ──► Partition ──► Dispatch ──► Join ──► Directory sweep ──► Report
//!                                │
//!                    ┌───────────┼───────────┐
//!              ┌─────▼─────┐┌────▼─────┐┌────▼─────┐
//!              │  Worker 0 ││ Worker 1 ││ Worker N │
//!              │ obfuscate ││obfuscate ││obfuscate │
//!              │   scrub   ││  scrub   ││  scrub   │
//!              │   erase   ││  erase   ││  erase   │
//!              └───────────┘└──────────┘└──────────┘
//! ```
//!
//! Workers own disjoint batches and never wait on each other; the directory
//! sweep is intentionally sequential because it depends on the files being
//! gone first. The only state shared across workers is the error channel and
//! the progress bars.

pub mod coordinator;
pub mod worker;

pub use coordinator::SweepCoordinator;
pub use worker::{BatchStats, BatchWorker};

pub(crate) use coordinator::enumerate_files;
