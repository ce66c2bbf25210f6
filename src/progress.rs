//! Progress reporting for the delete pipeline
//!
//! Each worker batch gets its own indicatif progress bar inside a shared
//! `MultiProgress`; bars advance by one per processed target, success or
//! failure. The run header and final summary are printed here too.

use crate::report::RunReport;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

/// Owns the terminal progress area for one run
pub struct ProgressSet {
    multi: MultiProgress,
}

impl ProgressSet {
    /// Create a progress set; a disabled set draws nothing
    pub fn new(enabled: bool) -> Self {
        let multi = if enabled {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        Self { multi }
    }

    /// Add one bar for a worker batch of `len` targets
    pub fn add_batch_bar(&self, batch_id: usize, len: u64) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(len));

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:>9} [{elapsed_precise}] {bar:40.green} {pos}/{len}")
                .expect("Invalid progress template"),
        );
        bar.set_prefix(format!("batch {batch_id}"));

        bar
    }

    /// Add a single unlabelled bar (flatten mode, one per root)
    pub fn add_plain_bar(&self, len: u64) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(len));

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:>9} [{elapsed_precise}] {bar:40.cyan} {pos}/{len}")
                .expect("Invalid progress template"),
        );
        bar.set_prefix("flatten");

        bar
    }

    /// Remove a finished bar from the display
    pub fn remove(&self, bar: &ProgressBar) {
        self.multi.remove(bar);
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the run
pub fn print_header(targets: &[impl AsRef<Path>], workers: usize, eraser: &str) {
    println!();
    println!(
        "{} {}",
        style("scour").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    for target in targets {
        println!("  {} {}", style("Target:").bold(), target.as_ref().display());
    }
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Eraser:").bold(), eraser);
    println!();
}

/// Print a summary of the run results
pub fn print_summary(report: &RunReport, dry_run: bool) {
    let duration_secs = report.duration.as_secs_f64();

    println!();
    if dry_run {
        println!("{}", style("Dry Run Complete").yellow().bold());
    } else if report.interrupted {
        println!("{}", style("Run Interrupted").yellow().bold());
    } else {
        println!("{}", style("Run Complete").green().bold());
    }
    println!("{}", style("─".repeat(50)).dim());

    let files_label = if dry_run { "Files found:" } else { "Files:" };
    println!(
        "  {} {}",
        style(files_label).bold(),
        format_number(report.total_files())
    );
    println!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(report.total_dirs())
    );
    println!(
        "  {} {}",
        style("Reclaimed:").bold(),
        format_size(report.bytes_freed, BINARY)
    );
    println!("  {} {:.1}s", style("Duration:").bold(), duration_secs);

    if report.roots.len() > 1 {
        println!();
        for (root, stats) in &report.roots {
            println!(
                "  {} {} files, {} dirs",
                style(format!("{}:", root.display())).dim(),
                format_number(stats.files),
                format_number(stats.dirs)
            );
        }
    }

    if report.has_errors() {
        println!();
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(report.errors.len() as u64)
        );
        for record in &report.errors {
            println!(
                "    {} [{}] {}",
                style(record.path.display()).yellow(),
                record.stage,
                record.reason
            );
        }
    }
    println!();
}
