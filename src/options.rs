//! Pipeline configuration.
//!
//! [`TimelapseOptions`] is a builder carrying the full configuration
//! surface the pipeline needs from its caller: source and destination
//! roots, windowing parameters, the extension filter, whether to average,
//! the target output width, the optional timezone for timestamp
//! localization, and the per-stage worker counts.
//!
//! # Example
//!
//! ```no_run
//! use timelapse::{TimelapseOptions, process_folders};
//!
//! let options = TimelapseOptions::new("/photos", "/out")
//!     .with_window(5)
//!     .with_step(2)
//!     .with_average(true)
//!     .with_target_width(Some(1920))
//!     .with_timezone_name("Europe/Zurich")?;
//!
//! let processed = process_folders(&options)?;
//! # Ok::<(), timelapse::TimelapseError>(())
//! ```

use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::TimelapseError;
use crate::metadata::resolve_timezone;

/// Ceiling on the metadata extraction pool. The stage is I/O-dominated and
/// tolerates high fan-out.
const METADATA_WORKER_CAP: usize = 64;

/// Thread budget the default averaging pool width is derived from. Each
/// averaging worker touches a full window of images, so the default pool
/// narrows as windows grow. A tunable heuristic, not an invariant.
const AVERAGING_POOL_BUDGET: usize = 100;

/// Configuration for a full pipeline run.
///
/// All settings beyond the source and destination roots have defaults
/// matching a plain `timelapse <src> <dst>` invocation: window 3, step 1,
/// `jpg` extension, no averaging, native resolution, no timezone
/// localization.
#[derive(Debug, Clone)]
pub struct TimelapseOptions {
    pub(crate) source: PathBuf,
    pub(crate) destination: PathBuf,
    pub(crate) window: usize,
    pub(crate) step: usize,
    pub(crate) extension: String,
    pub(crate) average: bool,
    pub(crate) target_width: Option<u32>,
    pub(crate) timezone: Option<Tz>,
    pub(crate) metadata_workers: usize,
    pub(crate) averaging_workers: Option<usize>,
}

impl TimelapseOptions {
    /// Create options for the given source and destination roots with all
    /// other settings at their defaults.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            window: 3,
            step: 1,
            extension: "jpg".to_string(),
            average: false,
            target_width: None,
            timezone: None,
            metadata_workers: METADATA_WORKER_CAP,
            averaging_workers: None,
        }
    }

    /// Set the number of images averaged into each output frame.
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the number of images stepped forward between windows.
    #[must_use]
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Set the image file extension to search for (default `jpg`).
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Enable or disable sliding-window averaging.
    #[must_use]
    pub fn with_average(mut self, average: bool) -> Self {
        self.average = average;
        self
    }

    /// Set a target output width. `None` keeps the native (median)
    /// resolution; `Some(w)` fixes the width and scales the height to
    /// preserve the median aspect ratio.
    #[must_use]
    pub fn with_target_width(mut self, width: Option<u32>) -> Self {
        self.target_width = width;
        self
    }

    /// Set the timezone EXIF wall-clock timestamps are interpreted in.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the timezone by IANA name (e.g. `Europe/Zurich`).
    ///
    /// # Errors
    ///
    /// Returns [`TimelapseError::UnknownTimezone`] when the name does not
    /// resolve.
    pub fn with_timezone_name(mut self, name: &str) -> Result<Self, TimelapseError> {
        self.timezone = Some(resolve_timezone(name)?);
        Ok(self)
    }

    /// Override the metadata extraction pool width. Clamped to at least 1.
    #[must_use]
    pub fn with_metadata_workers(mut self, workers: usize) -> Self {
        self.metadata_workers = workers.max(1);
        self
    }

    /// Override the averaging pool width. `None` restores the default
    /// window-derived heuristic.
    #[must_use]
    pub fn with_averaging_workers(mut self, workers: Option<usize>) -> Self {
        self.averaging_workers = workers.map(|count| count.max(1));
        self
    }

    /// The averaging pool width that will be used.
    ///
    /// Defaults to `max(1, 100 / window)`: each averaging worker holds one
    /// window's worth of decode work, so wider windows run with fewer
    /// concurrent workers to bound memory.
    #[must_use]
    pub fn averaging_workers(&self) -> usize {
        self.averaging_workers
            .unwrap_or_else(|| (AVERAGING_POOL_BUDGET / self.window.max(1)).max(1))
    }

    /// The metadata extraction pool width that will be used.
    #[must_use]
    pub fn metadata_workers(&self) -> usize {
        self.metadata_workers
    }
}
