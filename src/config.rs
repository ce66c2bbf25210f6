//! Configuration types for scour
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Built-in target presets

use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use regex::Regex;
use std::env;
use std::path::{Path, PathBuf};

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Maximum overwrite pass count
const MAX_PASSES: u32 = 16;

/// Securely delete files and directories
#[derive(Parser, Debug, Clone)]
#[command(
    name = "scour",
    version,
    about = "Securely delete files and directories",
    long_about = "Walks the target trees, renames every file to a random opaque name, \
                  scrubs its content in place (encrypt-and-discard and/or random \
                  overwrite), and hands the final unlink to an external secure-delete \
                  utility. File deletion runs in parallel worker batches; empty \
                  directories are swept bottom-up afterwards.",
    after_help = "EXAMPLES:\n    \
        scour /data/old-renders\n    \
        scour -w 8 --passes 3 --scrub both /data/old-renders\n    \
        scour --preset browser-cache\n    \
        scour --flatten --output staging /data/old-renders\n    \
        scour --eraser 'sdelete -s -q' --exclude '\\.keep$' /data/old-renders\n\n\
        CAUTION: scrubbing assumes the filesystem overwrites data in place. \
        Journaling, copy-on-write, and snapshotting filesystems weaken that \
        assumption; the external eraser's free-space wipe is the backstop."
)]
pub struct CliArgs {
    /// Files or directories to securely delete (temp preset when omitted)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<PathBuf>,

    /// Use a built-in target list instead of positional targets
    #[arg(long, value_enum, value_name = "NAME")]
    pub preset: Option<Preset>,

    /// Relocate files under opaque names instead of deleting them
    #[arg(long)]
    pub flatten: bool,

    /// Output directory for --flatten
    #[arg(long, default_value = "flattened", value_name = "DIR")]
    pub output: PathBuf,

    /// Number of worker threads for parallel deletion
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Content scrubbing strategy applied before erasure
    #[arg(long, value_enum, default_value_t = ScrubMode::Both, value_name = "MODE")]
    pub scrub: ScrubMode,

    /// Random-overwrite passes per file
    #[arg(long, default_value = "1", value_name = "NUM")]
    pub passes: u32,

    /// Secure-delete command override (program plus flags)
    #[arg(long, value_name = "CMD")]
    pub eraser: Option<String>,

    /// Exclude paths matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Enumerate and report without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (show per-file debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Exit 0 after a normal run instead of the fixed alert status
    #[arg(long)]
    pub exit_zero: bool,
}

/// Content scrubbing strategy
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubMode {
    /// Skip scrubbing; rely on the eraser alone
    None,

    /// Encrypt in place under a discarded key
    Encrypt,

    /// Overwrite with random data
    Overwrite,

    /// Encrypt, then overwrite
    Both,
}

impl ScrubMode {
    /// Whether the encrypt-and-discard stage runs
    pub fn encrypts(&self) -> bool {
        matches!(self, ScrubMode::Encrypt | ScrubMode::Both)
    }

    /// Whether the random-overwrite stage runs
    pub fn overwrites(&self) -> bool {
        matches!(self, ScrubMode::Overwrite | ScrubMode::Both)
    }
}

/// Built-in target lists
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// The platform temp directory
    Temp,

    /// Browser cache directories
    BrowserCache,
}

impl Preset {
    /// Candidate paths for this preset. Paths that do not exist are skipped
    /// at run time with a warning, not treated as errors.
    pub fn paths(&self) -> Vec<PathBuf> {
        match self {
            Preset::Temp => vec![env::temp_dir()],
            Preset::BrowserCache => {
                let Some(cache) = dirs::cache_dir() else {
                    return Vec::new();
                };
                vec![
                    cache.join("google-chrome"),
                    cache.join("chromium"),
                    cache.join("Microsoft").join("Edge"),
                    cache.join("mozilla").join("firefox"),
                ]
            }
        }
    }
}

fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Top-level roots to process
    pub targets: Vec<PathBuf>,

    /// Flatten output directory; `None` means normal secure deletion
    pub flatten_output: Option<PathBuf>,

    /// Number of worker threads
    pub worker_count: usize,

    /// Scrubbing strategy
    pub scrub_mode: ScrubMode,

    /// Random-overwrite passes
    pub overwrite_passes: u32,

    /// Eraser command override (whitespace-separated spec)
    pub eraser_command: Option<String>,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Enumerate only, touch nothing
    pub dry_run: bool,

    /// Show progress indicators
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,

    /// Exit 0 on success instead of the preserved non-zero convention
    pub exit_zero: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Validate worker count
        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        // Validate overwrite passes
        if args.passes == 0 || args.passes > MAX_PASSES {
            return Err(ConfigError::InvalidPassCount {
                count: args.passes,
                max: MAX_PASSES,
            });
        }

        // Compile exclude patterns
        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Flatten mode only makes sense against explicit targets
        if args.flatten && args.targets.is_empty() {
            return Err(ConfigError::FlattenRequiresTarget);
        }

        if args.flatten && args.output.is_file() {
            return Err(ConfigError::InvalidOutputDir {
                path: args.output.clone(),
                reason: "exists and is not a directory".into(),
            });
        }

        // Presets take precedence; bare invocations fall back to the temp
        // preset
        let targets = if let Some(preset) = args.preset {
            preset.paths()
        } else if !args.targets.is_empty() {
            args.targets
        } else {
            Preset::Temp.paths()
        };

        Ok(Self {
            targets,
            flatten_output: args.flatten.then_some(args.output),
            worker_count: args.workers,
            scrub_mode: args.scrub,
            overwrite_passes: args.passes,
            eraser_command: args.eraser,
            exclude_patterns,
            dry_run: args.dry_run,
            show_progress: !args.quiet,
            verbose: args.verbose,
            exit_zero: args.exit_zero,
        })
    }

    /// Check if a path should be excluded from enumeration
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.exclude_patterns.iter().any(|re| re.is_match(&text))
    }
}
