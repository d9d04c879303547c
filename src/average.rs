//! Sliding-window temporal averaging.
//!
//! A sorted sequence is partitioned into [`Window`]s by
//! [`plan_windows`]: window *k* starts at index `k * step` and contains up
//! to `window_size` consecutive paths, so consecutive windows overlap when
//! `step < window_size` and leave gaps when `step > window_size`. The
//! final window may be shorter than `window_size`; that is not an error.
//!
//! [`average_windows`] then renders each window to one output image: every
//! member is decoded to RGB, resampled to the target resolution when its
//! native size differs (Lanczos3), and accumulated into a per-channel
//! floating-point sum. The element-wise mean is rounded half-up, clamped
//! to 8-bit depth, and written to the window's deterministic output path
//! `Im_<index>.<ext>`. That naming is what lets the external encoder
//! consume the frames through a printf-style pattern without a manifest.
//!
//! Failure of one window (a member that will not decode, an unwritable
//! destination) is logged and drops only that window's output; remaining
//! windows keep processing. Each worker decodes one member at a time on
//! top of a single accumulator, so peak memory stays bounded regardless of
//! sequence length.

use std::path::{Path, PathBuf};

use image::{RgbImage, imageops::FilterType};
use log::{debug, error};
use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::TimelapseError;
use crate::resolution::TargetResolution;

/// One averaging window: a contiguous span of sequence members and the
/// output frame they collapse into.
///
/// Constructed by [`plan_windows`] immediately before dispatch; discarded
/// once the averaged image is written.
#[derive(Debug, Clone)]
pub struct Window {
    /// Ordered member paths; `window_size` of them, or fewer at the tail.
    pub members: Vec<PathBuf>,
    /// Sequential window number, starting at zero.
    pub index: usize,
    /// Where the averaged frame is written: `Im_<index>.<ext>`.
    pub output_path: PathBuf,
}

/// Partition a sorted sequence into averaging windows.
///
/// For a sequence of length `N`, produces `ceil(N / step)` windows whose
/// member ranges jointly cover `[0, N)`. Output paths are
/// `destination/Im_<index>.<extension>` in window order.
///
/// # Errors
///
/// Returns [`TimelapseError::InvalidWindowSize`] or
/// [`TimelapseError::InvalidStep`] when either value is zero.
pub fn plan_windows(
    paths: &[PathBuf],
    window_size: usize,
    step: usize,
    destination: &Path,
    extension: &str,
) -> Result<Vec<Window>, TimelapseError> {
    if window_size == 0 {
        return Err(TimelapseError::InvalidWindowSize);
    }
    if step == 0 {
        return Err(TimelapseError::InvalidStep);
    }

    let windows = (0..paths.len())
        .step_by(step)
        .enumerate()
        .map(|(index, start)| {
            let end = (start + window_size).min(paths.len());
            Window {
                members: paths[start..end].to_vec(),
                index,
                output_path: destination.join(format!("Im_{index}.{extension}")),
            }
        })
        .collect();
    Ok(windows)
}

/// Average every window on a bounded worker pool and write the results.
///
/// Workers complete in arbitrary order; outputs are re-associated with
/// their window index and the returned paths are in index order. A window
/// that fails to decode or write is logged and contributes no path.
///
/// # Errors
///
/// Returns [`TimelapseError::WorkerPool`] when the pool itself cannot be
/// built. Per-window failures are not errors at this level.
pub fn average_windows(
    windows: &[Window],
    target: TargetResolution,
    workers: usize,
) -> Result<Vec<PathBuf>, TimelapseError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|error| TimelapseError::WorkerPool(error.to_string()))?;

    // Ordered collect keys each result by its window index even though
    // completion order is arbitrary.
    let results: Vec<Option<PathBuf>> = pool.install(|| {
        windows
            .par_iter()
            .map(|window| match average_window(window, target) {
                Ok(path) => Some(path),
                Err(error) => {
                    error!("{error}");
                    None
                }
            })
            .collect()
    });

    Ok(results.into_iter().flatten().collect())
}

/// Render one window: decode, resample, accumulate, round, write.
fn average_window(window: &Window, target: TargetResolution) -> Result<PathBuf, TimelapseError> {
    let channels = target.width as usize * target.height as usize * 3;
    let mut sums = vec![0.0f32; channels];

    for path in &window.members {
        let member = load_member(path, target).map_err(|error| {
            TimelapseError::WindowAveraging {
                index: window.index,
                reason: format!("member {}: {error}", path.display()),
            }
        })?;
        for (sum, &value) in sums.iter_mut().zip(member.as_raw()) {
            *sum += f32::from(value);
        }
    }

    // plan_windows never produces an empty window.
    let count = window.members.len() as f32;
    let averaged: Vec<u8> = sums
        .iter()
        .map(|sum| (sum / count).round().clamp(0.0, 255.0) as u8)
        .collect();

    let output = RgbImage::from_raw(target.width, target.height, averaged).ok_or_else(|| {
        TimelapseError::WindowAveraging {
            index: window.index,
            reason: "averaged buffer does not match target resolution".to_string(),
        }
    })?;

    output
        .save(&window.output_path)
        .map_err(|error| TimelapseError::WindowAveraging {
            index: window.index,
            reason: format!("write {}: {error}", window.output_path.display()),
        })?;

    debug!(
        "window {} averaged {} members into {}",
        window.index,
        window.members.len(),
        window.output_path.display()
    );
    Ok(window.output_path.clone())
}

/// Decode one member image to RGB8 at the target resolution.
fn load_member(path: &Path, target: TargetResolution) -> Result<RgbImage, TimelapseError> {
    let decoded = image::open(path)?;
    let decoded = if decoded.width() != target.width || decoded.height() != target.height {
        decoded.resize_exact(target.width, target.height, FilterType::Lanczos3)
    } else {
        decoded
    };
    Ok(decoded.into_rgb8())
}
