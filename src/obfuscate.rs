//! Name obfuscation
//!
//! Decouples a target's visible name from its content before destruction by
//! renaming it to a random opaque name within its parent directory. Names are
//! fixed-length alphanumeric with no extension, so nothing about the original
//! name or file type survives in directory metadata.
//!
//! No uniqueness check is performed against existing names. With 62^12
//! possible names a collision within one directory is vanishingly unlikely;
//! if one does occur the rename either fails (reported as a `RenameError`)
//! or replaces a sibling that was itself queued for destruction.

use crate::error::RenameError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Length of generated opaque names
pub const NAME_LEN: usize = 12;

/// Generate a random alphanumeric name of `len` characters
pub fn random_name(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Rename `path` (file or directory) to a random opaque name in place.
///
/// Returns the new path on success. On failure the caller should record the
/// error and continue the pipeline with the original path, so downstream
/// stages still get a chance to destroy the content.
pub fn obfuscate(path: &Path) -> Result<PathBuf, RenameError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let new_path = parent.join(random_name(NAME_LEN));

    fs::rename(path, &new_path).map_err(|source| RenameError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(new_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_random_name_shape() {
        let name = random_name(NAME_LEN);
        assert_eq!(name.len(), NAME_LEN);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));

        // Two draws should essentially never collide
        assert_ne!(random_name(NAME_LEN), random_name(NAME_LEN));
    }

    #[test]
    fn test_obfuscate_renames_within_parent() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("secret-notes.txt");
        fs::write(&original, b"contents").unwrap();

        let renamed = obfuscate(&original).unwrap();

        assert!(!original.exists());
        assert!(renamed.exists());
        assert_eq!(renamed.parent().unwrap(), dir.path());

        let name = renamed.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), NAME_LEN);
        assert!(!name.contains('.'));

        // Content is untouched by the rename
        assert_eq!(fs::read(&renamed).unwrap(), b"contents");
    }

    #[test]
    fn test_obfuscate_directory() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("cache");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("entry"), b"x").unwrap();

        let renamed = obfuscate(&sub).unwrap();

        assert!(!sub.exists());
        assert!(renamed.is_dir());
        assert!(renamed.join("entry").exists());
    }

    #[test]
    fn test_obfuscate_missing_target_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = obfuscate(&missing).unwrap_err();
        assert_eq!(err.path, missing);
    }
}
