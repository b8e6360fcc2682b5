//! Content-addressed media copies.
//!
//! Attachments are stored under a name derived from a BLAKE2b digest of
//! their bytes, so importing the same file twice yields one copy.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blake2::{Blake2b512, Digest};

/// Bytes read per hashing step.
const CHUNK_SIZE: usize = 8 * 1024;

/// Hex characters of the digest kept in the file name.
const HASH_PREFIX_LEN: usize = 32;

/// Hash a file's full contents and return the first 32 hex characters.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open media file: {}", path.display()))?;

    let mut hasher = Blake2b512::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("failed to read media file: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = format!("{:x}", hasher.finalize());
    Ok(digest[..HASH_PREFIX_LEN].to_string())
}

/// Content-addressed file name for `path`: `<hash-prefix>.<extension>`.
///
/// The extension is whatever follows the last `.` of the file name; a name
/// without a dot is used whole.
pub fn media_filename(path: &Path) -> Result<String> {
    let file_name = path
        .file_name()
        .with_context(|| format!("not a file path: {}", path.display()))?
        .to_string_lossy();
    let extension = file_name.rsplit('.').next().unwrap_or_default();
    Ok(format!("{}.{}", hash_file(path)?, extension))
}

/// Copy `path` into `mediadir` under its content-addressed name.
///
/// Creates `mediadir` if needed. When a file of that name already exists the
/// copy is skipped. Returns the new file name, not the full path.
pub fn copy_to_mediadir(path: &Path, mediadir: &Path) -> Result<String> {
    std::fs::create_dir_all(mediadir)
        .with_context(|| format!("failed to create media directory: {}", mediadir.display()))?;

    let new_filename = media_filename(path)?;
    let target = mediadir.join(&new_filename);

    if target.is_file() {
        tracing::debug!(file = %new_filename, "media file already present");
        return Ok(new_filename);
    }

    std::fs::copy(path, &target).with_context(|| {
        format!(
            "failed to copy {} to {}",
            path.display(),
            target.display()
        )
    })?;
    tracing::info!(source = %path.display(), file = %new_filename, "copied media file");

    Ok(new_filename)
}
