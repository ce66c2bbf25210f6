//! Integration tests for scour
//!
//! End-to-end scenarios driven through the public SweepCoordinator API with
//! an in-process eraser double, so no external secure-delete utility is
//! required.

use clap::Parser;
use scour::batch;
use scour::config::{CliArgs, RunConfig};
use scour::error::{EraseError, ScourError};
use scour::eraser::SecureEraser;
use scour::sweep::SweepCoordinator;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Eraser double: deletes via std::fs, optionally failing for files of a
/// sentinel length. Scrubbing preserves file length and obfuscation only
/// changes the name, so a unique length survives the earlier pipeline stages
/// and reliably marks the victim at erase time.
struct FakeEraser {
    fail_len: Option<u64>,
    calls: AtomicUsize,
}

impl FakeEraser {
    fn new() -> Self {
        Self {
            fail_len: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_for_len(len: u64) -> Self {
        Self {
            fail_len: Some(len),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SecureEraser for FakeEraser {
    fn describe(&self) -> String {
        "fake-eraser".into()
    }

    fn check(&self) -> Result<(), ScourError> {
        Ok(())
    }

    fn erase(&self, path: &Path) -> Result<(), EraseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(fail_len) = self.fail_len {
            let len = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            if len == fail_len {
                return Err(EraseError::CommandFailed {
                    program: "fake-eraser".into(),
                    path: path.to_path_buf(),
                    code: 1,
                    stderr: "simulated: file is locked by another process".into(),
                });
            }
        }

        let result = if path.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };

        result.map_err(|source| EraseError::Spawn {
            program: "fake-eraser".into(),
            source,
        })
    }
}

fn config_for(target: &Path) -> RunConfig {
    let args = CliArgs::parse_from(["scour", "--quiet", target.to_str().unwrap()]);
    RunConfig::from_args(args).unwrap()
}

#[test]
fn scenario_full_tree_deletion() {
    // A directory containing 3 files and 1 empty subdirectory: after the
    // run everything is gone and the report shows 3 files, 1 directory,
    // 0 errors.
    let dir = tempdir().unwrap();
    let root = dir.path().join("doomed");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.png"), vec![1u8; 300]).unwrap();
    fs::write(root.join("b.png"), vec![2u8; 400]).unwrap();
    fs::write(root.join("c.txt"), vec![3u8; 500]).unwrap();
    fs::create_dir(root.join("empty-sub")).unwrap();

    let eraser = Arc::new(FakeEraser::new());
    let coordinator =
        SweepCoordinator::with_eraser(config_for(&root), eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    assert!(!report.has_errors(), "unexpected errors: {:?}", report.errors);
    let stats = report.roots.get(&root).expect("stats for root");
    assert_eq!(stats.files, 3);
    assert_eq!(stats.dirs, 1);
    assert_eq!(report.bytes_freed, 300 + 400 + 500);

    // The root itself is left in place, but emptied
    assert!(root.exists());
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn scenario_one_locked_file_does_not_stop_the_rest() {
    // One file fails at erase time; it appears in the error list under its
    // original path and every other file is still deleted.
    let dir = tempdir().unwrap();
    let root = dir.path().join("mixed");
    fs::create_dir(&root).unwrap();
    let locked = root.join("locked.dat");
    fs::write(&locked, vec![9u8; 1337]).unwrap();
    fs::write(root.join("one.dat"), vec![1u8; 100]).unwrap();
    fs::write(root.join("two.dat"), vec![2u8; 200]).unwrap();

    let eraser = Arc::new(FakeEraser::failing_for_len(1337));
    let coordinator =
        SweepCoordinator::with_eraser(config_for(&root), eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, locked);
    assert!(report.errors[0].reason.contains("locked"));

    let stats = report.roots.get(&root).expect("stats for root");
    assert_eq!(stats.files, 2);

    // The failed file survives under its obfuscated name; nothing else does
    assert_eq!(fs::read_dir(&root).unwrap().count(), 1);
}

#[test]
fn scenario_empty_directory_dispatches_no_work() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("hollow");
    fs::create_dir(&root).unwrap();

    let eraser = Arc::new(FakeEraser::new());
    let coordinator =
        SweepCoordinator::with_eraser(config_for(&root), eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    assert_eq!(report.total_files(), 0);
    assert_eq!(report.total_dirs(), 0);
    assert!(!report.has_errors());
    assert_eq!(eraser.call_count(), 0);
    assert!(root.exists());
}

#[test]
fn scenario_partition_sizing() {
    // 50 files across 8 workers collapse to a single batch of 50
    let size = batch::batch_size(50, 8);
    assert_eq!(size, 50);

    // 5000 files across 8 workers aim for roughly 15 batches
    let size = batch::batch_size(5_000, 8);
    let batches = 5_000usize.div_ceil(size);
    assert!(
        (10..=20).contains(&batches),
        "expected ~15 batches, got {batches}"
    );
}

#[test]
fn nested_tree_is_swept_bottom_up() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("deep");
    fs::create_dir_all(root.join("outer").join("inner")).unwrap();
    fs::write(root.join("outer").join("inner").join("leaf.dat"), b"leaf").unwrap();
    fs::write(root.join("outer").join("mid.dat"), b"mid").unwrap();

    let eraser = Arc::new(FakeEraser::new());
    let coordinator =
        SweepCoordinator::with_eraser(config_for(&root), eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    assert!(!report.has_errors(), "unexpected errors: {:?}", report.errors);
    let stats = report.roots.get(&root).expect("stats for root");
    assert_eq!(stats.files, 2);
    // inner and outer both become empty and are removed, deepest first
    assert_eq!(stats.dirs, 2);
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_recorded_but_still_erased() {
    use std::os::unix::fs::PermissionsExt;

    // A file the scrubber cannot open still reaches the eraser; the scrub
    // failures are recorded against the original path and the rest of the
    // directory is unaffected.
    let dir = tempdir().unwrap();
    let root = dir.path().join("guarded");
    fs::create_dir(&root).unwrap();
    let readonly = root.join("readonly.dat");
    fs::write(&readonly, b"cannot scrub me").unwrap();
    fs::set_permissions(&readonly, fs::Permissions::from_mode(0o400)).unwrap();
    fs::write(root.join("normal.dat"), b"normal").unwrap();

    let eraser = Arc::new(FakeEraser::new());
    let coordinator =
        SweepCoordinator::with_eraser(config_for(&root), eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    // Both scrub stages fail for the read-only file; the unlink still wins
    assert!(report.has_errors());
    assert!(report.errors.iter().all(|r| r.path == readonly));
    assert_eq!(report.total_files(), 2);
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn missing_eraser_utility_aborts_before_touching_files() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("untouched");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("survivor.dat"), b"still here").unwrap();

    let mut config = config_for(&root);
    config.eraser_command = Some("definitely-not-a-real-eraser-binary".into());

    let err = SweepCoordinator::new(config).unwrap_err();
    assert!(matches!(err, ScourError::EraserUnavailable(_)));
    assert!(root.join("survivor.dat").exists());
}

#[test]
fn multiple_roots_report_separately() {
    let dir = tempdir().unwrap();
    let root_a = dir.path().join("alpha");
    let root_b = dir.path().join("beta");
    fs::create_dir(&root_a).unwrap();
    fs::create_dir(&root_b).unwrap();
    fs::write(root_a.join("one.dat"), vec![0u8; 10]).unwrap();
    fs::write(root_b.join("two.dat"), vec![0u8; 20]).unwrap();
    fs::write(root_b.join("three.dat"), vec![0u8; 30]).unwrap();

    let args = CliArgs::parse_from([
        "scour",
        "--quiet",
        root_a.to_str().unwrap(),
        root_b.to_str().unwrap(),
    ]);
    let config = RunConfig::from_args(args).unwrap();

    let eraser = Arc::new(FakeEraser::new());
    let coordinator = SweepCoordinator::with_eraser(config, eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    assert!(!report.has_errors());
    assert_eq!(report.roots.get(&root_a).unwrap().files, 1);
    assert_eq!(report.roots.get(&root_b).unwrap().files, 2);
    assert_eq!(report.bytes_freed, 60);
}

#[test]
fn dry_run_reports_without_deleting() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("preview");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.dat"), b"a").unwrap();
    fs::write(root.join("b.dat"), b"b").unwrap();

    let args = CliArgs::parse_from([
        "scour",
        "--quiet",
        "--dry-run",
        root.to_str().unwrap(),
    ]);
    let config = RunConfig::from_args(args).unwrap();

    let eraser = Arc::new(FakeEraser::new());
    let coordinator = SweepCoordinator::with_eraser(config, eraser.clone()).unwrap();
    let report = coordinator.run().unwrap();

    assert_eq!(report.total_files(), 2);
    assert_eq!(eraser.call_count(), 0);
    assert!(root.join("a.dat").exists());
    assert!(root.join("b.dat").exists());
}
