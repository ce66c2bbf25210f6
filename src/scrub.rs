//! Content scrubbing
//!
//! Two interchangeable strategies for destroying file content in place
//! before the final unlink:
//!
//! - **Encrypt-and-discard**: stream the file through XChaCha20 under a key
//!   generated once per process and never persisted. The per-file nonce is
//!   discarded too, so the plaintext is cryptographically unrecoverable even
//!   while the ciphertext bytes sit in free space waiting for the eraser.
//! - **Random overwrite**: N passes of OS random data over the full length,
//!   with a flush and sync to stable storage after each pass. Covers the case
//!   where the eraser only unlinks without wiping.
//!
//! Both strategies work chunk-wise, preserve file length and name, and may be
//! applied in sequence for defense in depth.

use crate::error::ScrubError;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{Key, XChaCha20, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// In-place file scrubber holding the per-process cipher key.
///
/// The key lives only in this process's memory; it is generated from OS
/// randomness at construction and dropped with the process.
pub struct Scrubber {
    key: [u8; 32],
}

impl Scrubber {
    /// Create a scrubber with a fresh random key
    pub fn new() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Encrypt the file in place under the process key and a discarded
    /// per-file nonce. File length is unchanged.
    pub fn encrypt_in_place(&self, path: &Path) -> Result<(), ScrubError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| ScrubError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let len = file
            .metadata()
            .map_err(|source| ScrubError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        let mut nonce = [0u8; 24];
        OsRng.fill_bytes(&mut nonce);
        let mut cipher = XChaCha20::new(Key::from_slice(&self.key), XNonce::from_slice(&nonce));

        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut pos = 0u64;

        while pos < len {
            let chunk = ((len - pos) as usize).min(CHUNK_SIZE);

            file.seek(SeekFrom::Start(pos))
                .and_then(|_| file.read_exact(&mut buf[..chunk]))
                .map_err(|source| ScrubError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

            cipher.apply_keystream(&mut buf[..chunk]);

            file.seek(SeekFrom::Start(pos))
                .and_then(|_| file.write_all(&buf[..chunk]))
                .map_err(|source| ScrubError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;

            pos += chunk as u64;
        }

        file.flush()
            .and_then(|_| file.sync_all())
            .map_err(|source| ScrubError::Sync {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(())
    }

    /// Overwrite the full file with OS random data for `passes` passes,
    /// syncing to stable storage after each pass. File length is unchanged.
    pub fn overwrite(&self, path: &Path, passes: u32) -> Result<(), ScrubError> {
        let mut file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| ScrubError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let len = file
            .metadata()
            .map_err(|source| ScrubError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        let mut buf = vec![0u8; CHUNK_SIZE];

        for _ in 0..passes {
            file.seek(SeekFrom::Start(0))
                .map_err(|source| ScrubError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;

            let mut remaining = len;
            while remaining > 0 {
                let chunk = (remaining as usize).min(CHUNK_SIZE);
                OsRng.fill_bytes(&mut buf[..chunk]);
                file.write_all(&buf[..chunk])
                    .map_err(|source| ScrubError::Write {
                        path: path.to_path_buf(),
                        source,
                    })?;
                remaining -= chunk as u64;
            }

            file.flush()
                .and_then(|_| file.sync_all())
                .map_err(|source| ScrubError::Sync {
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        Ok(())
    }
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}
