//! Canonical temporal ordering of a folder's images.
//!
//! A *sequence* is the sorted path list of one leaf folder, ascending by
//! capture timestamp. The sort is stable: two images with identical
//! recorded timestamps keep their filesystem-listing relative order, and
//! records with an invalid timestamp sort after every valid record (the
//! maximum-timestamp sentinel policy) while preserving their own discovery
//! order among themselves.

use std::path::PathBuf;

use crate::metadata::ImageInfo;

/// Stable sort of a folder's records by capture timestamp, ascending.
///
/// Invalid-timestamp records come last; see
/// [`CaptureTime`](crate::CaptureTime) for the sentinel policy.
pub fn sort_by_capture_time(mut infos: Vec<ImageInfo>) -> Vec<ImageInfo> {
    infos.sort_by(|a, b| a.capture.sort_key().total_cmp(&b.capture.sort_key()));
    infos
}

/// Strip sorted records down to their ordered path list.
pub fn into_paths(infos: Vec<ImageInfo>) -> Vec<PathBuf> {
    infos.into_iter().map(|info| info.path).collect()
}
