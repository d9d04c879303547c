//! Per-sequence output resolution reconciliation.
//!
//! Images in one folder are not guaranteed to share dimensions: a rotated
//! frame, a corrupt header, or a stray thumbnail can report something
//! different from the rest of the sequence. [`reconcile`] derives a single
//! [`TargetResolution`] from the **median** width and height of the
//! sequence, which a minority of outlier readings cannot shift the way a
//! mean would be shifted.
//!
//! When a target output width is requested, the median aspect ratio is
//! preserved: height scales by `requested / median_width`. Individual
//! images keep their own data; any whose native size differs from the
//! target are resampled by the window averager.

use crate::metadata::ImageInfo;

/// The reconciled output dimensions applied to every frame of one folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TargetResolution {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Compute the target resolution for a sequence.
///
/// Takes the median width and height across `infos`. With
/// `requested_width`, the width is fixed to the request and the height is
/// `round(median_height * requested_width / median_width)`; without it,
/// the rounded medians are used directly. Rounding is round-half-up, and
/// both dimensions are clamped to at least one pixel.
pub fn reconcile(infos: &[ImageInfo], requested_width: Option<u32>) -> TargetResolution {
    let median_width = median(infos.iter().map(|info| info.width));
    let median_height = median(infos.iter().map(|info| info.height));

    match requested_width {
        Some(width) if median_width > 0.0 => {
            let scale = f64::from(width) / median_width;
            TargetResolution {
                width,
                height: round_dimension(median_height * scale),
            }
        }
        Some(width) => TargetResolution {
            width,
            height: round_dimension(median_height),
        },
        None => TargetResolution {
            width: round_dimension(median_width),
            height: round_dimension(median_height),
        },
    }
}

fn round_dimension(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

/// Median of a set of pixel dimensions. Even-length sets average the two
/// middle values; an empty set yields zero.
fn median(values: impl Iterator<Item = u32>) -> f64 {
    let mut sorted: Vec<u32> = values.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        f64::from(sorted[mid])
    } else {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    }
}
