//! Concat-list manifest generation.
//!
//! When source frames are not pattern-addressable (the non-averaging
//! path), the external encoder consumes an explicit ordered manifest
//! instead: one `file <path>` line per frame, in sequence order, with
//! backslashes normalised to forward slashes. [`write_concat_list`]
//! produces that file from every `step`-th path of a sequence.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::TimelapseError;

/// Write a concat-list file selecting every `step`-th path.
///
/// Selection starts at index 0 and keeps original sequence order. Returns
/// the path of the written manifest.
///
/// # Errors
///
/// Returns [`TimelapseError::InvalidStep`] for a zero step, or an I/O
/// error when the manifest cannot be written.
pub fn write_concat_list(
    paths: &[PathBuf],
    step: usize,
    file: &Path,
) -> Result<PathBuf, TimelapseError> {
    if step == 0 {
        return Err(TimelapseError::InvalidStep);
    }

    let mut contents = String::new();
    for path in paths.iter().step_by(step) {
        let line = path.display().to_string().replace('\\', "/");
        contents.push_str("file ");
        contents.push_str(&line);
        contents.push('\n');
    }

    fs::write(file, contents)?;
    debug!(
        "wrote concat list {} ({} of {} frames)",
        file.display(),
        paths.len().div_ceil(step),
        paths.len()
    );
    Ok(file.to_path_buf())
}
