//! Per-folder pipeline orchestration.
//!
//! [`process_folders`] drives the full preprocessing pipeline: leaf-folder
//! discovery, parallel metadata extraction, temporal sorting, resolution
//! reconciliation, and (when requested) sliding-window averaging. Folders
//! are processed sequentially; parallelism lives inside each stage's
//! bounded worker pool, and no state is shared across folders.
//!
//! The result maps each destination folder to its ordered frame list:
//! averaged output paths when averaging, otherwise the sorted source paths
//! themselves. Either form is what the external encoder consumes, directly
//! through pattern addressing or through a
//! [concat list](crate::write_concat_list).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use log::{info, warn};
use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::average::{average_windows, plan_windows};
use crate::error::TimelapseError;
use crate::metadata::{ImageInfo, read_info};
use crate::options::TimelapseOptions;
use crate::resolution::reconcile;
use crate::sequence::{into_paths, sort_by_capture_time};
use crate::walker::FolderWalker;

/// Run the preprocessing pipeline over every leaf folder under the source
/// root.
///
/// Returns a map from destination folder (the source folder's name joined
/// under the destination root) to the ordered frame paths for that folder.
/// With averaging enabled the destination folder is created idempotently
/// and the values are the written `Im_<index>.<ext>` paths; without it the
/// values are the timestamp-sorted source paths, untouched.
///
/// Images whose metadata cannot be read at all are dropped from their
/// sequence with a warning; folders left with no readable images yield no
/// entry. Windows that fail to average are dropped from their folder's
/// value. Neither aborts the run.
///
/// # Errors
///
/// Returns an error on invalid windowing parameters, worker pool
/// construction failure, or when a destination folder cannot be created.
pub fn process_folders(
    options: &TimelapseOptions,
) -> Result<BTreeMap<PathBuf, Vec<PathBuf>>, TimelapseError> {
    let mut processed = BTreeMap::new();

    for paths in FolderWalker::new(&options.source, &options.extension) {
        let Some(folder_name) = leaf_folder_name(&paths) else {
            continue;
        };
        let destination = options.destination.join(&folder_name);
        info!("processing folder {folder_name:?} ({} images)", paths.len());

        let infos = extract_parallel(&paths, options.timezone, options.metadata_workers)?;
        if infos.is_empty() {
            warn!("no readable images in {folder_name:?}, skipping");
            continue;
        }
        let infos = sort_by_capture_time(infos);

        let frames = if options.average {
            let target = reconcile(&infos, options.target_width);
            // Idempotent; pre-existing unrelated files are left alone.
            fs::create_dir_all(&destination)?;

            let ordered = into_paths(infos);
            let windows = plan_windows(
                &ordered,
                options.window,
                options.step,
                &destination,
                &options.extension,
            )?;
            info!(
                "averaging {} windows of {} at {}x{} (step {})",
                windows.len(),
                options.window,
                target.width,
                target.height,
                options.step
            );
            average_windows(&windows, target, options.averaging_workers())?
        } else {
            into_paths(infos)
        };

        processed.insert(destination, frames);
    }

    Ok(processed)
}

/// Extract metadata for a folder's images on a bounded pool.
///
/// Completion order is arbitrary, but the ordered collect pairs every
/// record with its input index, so the returned list matches the
/// filesystem-listing order of `paths`. Unreadable images are dropped
/// with a warning (discovery has already proven they carry the right
/// extension, so this is a metadata error, not a discovery error).
fn extract_parallel(
    paths: &[PathBuf],
    timezone: Option<Tz>,
    workers: usize,
) -> Result<Vec<ImageInfo>, TimelapseError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|error| TimelapseError::WorkerPool(error.to_string()))?;

    let results: Vec<Option<ImageInfo>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| match read_info(path, timezone) {
                Ok(info) => Some(info),
                Err(error) => {
                    warn!("dropping {}: {error}", path.display());
                    None
                }
            })
            .collect()
    });

    Ok(results.into_iter().flatten().collect())
}

/// The name of the leaf folder a path collection came from.
fn leaf_folder_name(paths: &[PathBuf]) -> Option<PathBuf> {
    paths
        .first()
        .and_then(|path| path.parent())
        .and_then(Path::file_name)
        .map(PathBuf::from)
}
