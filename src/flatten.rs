//! Flatten mode: relocate and rename instead of deleting
//!
//! Every file under the source tree is moved into a single output directory
//! under a fresh opaque name, destroying both the directory structure and the
//! original names while keeping the content. The emptied source tree is then
//! handed to the external eraser.
//!
//! Renames across filesystems fail rather than fall back to copying; a copy
//! would leave recoverable source bytes behind, which defeats the point.

use crate::config::RunConfig;
use crate::eraser::SecureEraser;
use crate::obfuscate;
use crate::progress::ProgressSet;
use crate::report::{ErrorRecord, RunReport, Stage};
use crate::sweep::enumerate_files;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Move every file under `root` into `output` under opaque names, then erase
/// the emptied source tree.
pub(crate) fn flatten_tree(
    config: &RunConfig,
    eraser: &dyn SecureEraser,
    root: &Path,
    output: &Path,
    report: &mut RunReport,
    shutdown: &AtomicBool,
) -> crate::error::Result<()> {
    let files = enumerate_files(config, root);

    if files.is_empty() {
        info!(root = %root.display(), "No files to flatten");
    }

    if config.dry_run {
        report.root_mut(root).files = files.len() as u64;
        return Ok(());
    }

    fs::create_dir_all(output)?;

    let progress = ProgressSet::new(config.show_progress);
    let bar = progress.add_plain_bar(files.len() as u64);

    for target in &files {
        if shutdown.load(Ordering::Relaxed) {
            report.interrupted = true;
            return Ok(());
        }

        let new_path = output.join(obfuscate::random_name(obfuscate::NAME_LEN));
        match fs::rename(target.path(), &new_path) {
            Ok(()) => {
                debug!(from = %target.path().display(), to = %new_path.display(), "Relocated");
                report.root_mut(root).files += 1;
            }
            Err(e) => {
                report
                    .errors
                    .push(ErrorRecord::new(target.path(), Stage::Flatten, &e));
            }
        }

        bar.inc(1);
    }

    bar.finish();

    // Hand the emptied tree to the eraser so the original names and layout
    // are not left behind in directory metadata
    match eraser.erase(root) {
        Ok(()) => {
            report.root_mut(root).dirs += 1;
        }
        Err(e) => {
            report.errors.push(ErrorRecord::new(root, Stage::Erase, &e));
        }
    }

    Ok(())
}
