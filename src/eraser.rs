//! External eraser adapter
//!
//! The final unlink is delegated to a platform secure-delete utility invoked
//! as a subprocess with recursive and quiet flags. The adapter is a trait so
//! the orchestrator can be exercised in tests without the real binary
//! present.
//!
//! Availability is checked once at process startup; a missing utility aborts
//! the whole invocation before any file is touched, rather than failing per
//! file.

use crate::error::{EraseError, ScourError};
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Pluggable secure-erase backend
pub trait SecureEraser: Send + Sync {
    /// Human-readable identifier used in logs and the run header
    fn describe(&self) -> String;

    /// Verify once at startup that the backend can run.
    /// Failure here is fatal to the invocation.
    fn check(&self) -> Result<(), ScourError>;

    /// Securely remove `path` (file or directory)
    fn erase(&self, path: &Path) -> Result<(), EraseError>;
}

/// Eraser that shells out to a command-line utility
///
/// Defaults to `sdelete -s -q` on Windows and `srm -r` elsewhere; both the
/// program and its flags can be overridden from the CLI.
pub struct CommandEraser {
    program: String,
    args: Vec<String>,
}

impl CommandEraser {
    /// The platform's conventional secure-delete utility
    pub fn platform_default() -> Self {
        #[cfg(windows)]
        {
            Self {
                program: "sdelete".into(),
                args: vec!["-s".into(), "-q".into()],
            }
        }

        #[cfg(not(windows))]
        {
            Self {
                program: "srm".into(),
                args: vec!["-r".into()],
            }
        }
    }

    /// Build from a whitespace-separated command spec, e.g. `"sdelete -s -q"`.
    /// The first token is the program, the rest are flags passed before the
    /// target path.
    pub fn from_spec(spec: &str) -> Result<Self, ScourError> {
        let mut tokens = spec.split_whitespace();
        let program = tokens
            .next()
            .ok_or(ScourError::Config(
                crate::error::ConfigError::EmptyEraserCommand,
            ))?
            .to_string();

        Ok(Self {
            program,
            args: tokens.map(str::to_string).collect(),
        })
    }
}

impl SecureEraser for CommandEraser {
    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn check(&self) -> Result<(), ScourError> {
        match find_in_path(&self.program) {
            Some(resolved) => {
                debug!(program = %resolved.display(), "Eraser utility found");
                Ok(())
            }
            None => Err(ScourError::EraserUnavailable(format!(
                "'{}' was not found on PATH; install it or point --eraser at \
                 a different utility",
                self.program
            ))),
        }
    }

    fn erase(&self, path: &Path) -> Result<(), EraseError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| EraseError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(EraseError::CommandFailed {
                program: self.program.clone(),
                path: path.to_path_buf(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Resolve a program name against PATH.
///
/// Paths containing a separator are checked directly. On Windows the `.exe`
/// suffix is also tried, matching how the shell resolves commands.
fn find_in_path(program: &str) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }

        #[cfg(windows)]
        {
            let exe = dir.join(format!("{program}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }

    None
}
