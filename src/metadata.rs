//! Per-image capture-time and dimension extraction.
//!
//! [`read_info`] opens an image container just far enough to read its EXIF
//! capture timestamp and pixel dimensions; it never decodes pixel data.
//! This stage runs once per image before any averaging, so staying
//! header-only is performance-critical.
//!
//! Capture time is an explicit tagged value, [`CaptureTime`]: either a
//! UTC-normalised epoch timestamp or a [`TimestampIssue`] naming exactly
//! why no timestamp could be produced. A record with a missing or
//! unparseable timestamp therefore cannot leak an undefined value into the
//! sort step; the [sequence sorter](crate::sort_by_capture_time) gives
//! invalid records a documented maximum-timestamp position instead.
//!
//! # Example
//!
//! ```no_run
//! use timelapse::read_info;
//!
//! let info = read_info("photos/IMG_0001.jpg".as_ref(), None)?;
//! println!("{}x{} taken at {:?}", info.width, info.height, info.capture);
//! # Ok::<(), timelapse::TimelapseError>(())
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use image::ImageReader;
use log::{debug, warn};

use crate::error::TimelapseError;

/// EXIF datetime fields use this fixed layout: `YYYY:MM:DD HH:MM:SS`.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Why a capture timestamp could not be produced for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimestampIssue {
    /// The file carries no readable EXIF segment.
    NoExif,
    /// EXIF is present but has neither `DateTimeOriginal` nor `DateTime`.
    TagMissing,
    /// The datetime string did not match `YYYY:MM:DD HH:MM:SS`.
    Unparseable,
    /// The wall-clock time is ambiguous or nonexistent in the requested
    /// zone (daylight-saving transitions).
    Unlocalizable,
}

/// The capture moment of an image, or the reason it is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureTime {
    /// UTC epoch seconds the image was recorded.
    At(f64),
    /// No usable timestamp; carries the failure reason.
    Invalid(TimestampIssue),
}

impl CaptureTime {
    /// The UTC epoch seconds, if known.
    pub fn epoch_seconds(&self) -> Option<f64> {
        match self {
            CaptureTime::At(seconds) => Some(*seconds),
            CaptureTime::Invalid(_) => None,
        }
    }

    /// Ordering key used by the sequence sorter.
    ///
    /// Invalid records map to positive infinity, so they sort after every
    /// valid record. Stability of the sort keeps their relative discovery
    /// order intact.
    pub(crate) fn sort_key(&self) -> f64 {
        match self {
            CaptureTime::At(seconds) => *seconds,
            CaptureTime::Invalid(_) => f64::INFINITY,
        }
    }
}

/// Metadata for one source image: path, capture time, and dimensions.
///
/// Produced once per image by [`read_info`], consumed by the sequence
/// sorter and the dimension reconciler, then discarded.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Location of the source image.
    pub path: PathBuf,
    /// When the image was recorded, or why that is unknown.
    pub capture: CaptureTime,
    /// Native pixel width.
    pub width: u32,
    /// Native pixel height.
    pub height: u32,
}

/// Read capture time and pixel dimensions for one image.
///
/// Dimensions come from the container header via
/// [`ImageReader::into_dimensions`]; no pixel data is decoded. The capture
/// timestamp comes from EXIF `DateTimeOriginal`, falling back to
/// `DateTime`. When `localize` is given, the naive EXIF wall-clock time is
/// interpreted in that zone and converted to UTC; otherwise it is
/// interpreted in the system's local zone.
///
/// # Errors
///
/// Returns an error only when the file itself cannot be opened or its
/// dimensions cannot be determined. Missing or malformed EXIF data is not
/// an error; it yields [`CaptureTime::Invalid`] on an otherwise valid
/// record.
pub fn read_info(path: &Path, localize: Option<Tz>) -> Result<ImageInfo, TimelapseError> {
    let reader = ImageReader::open(path).map_err(|error| TimelapseError::ImageOpen {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;
    let (width, height) =
        reader
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|error| TimelapseError::DimensionRead {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;

    let capture = read_capture_time(path, localize);

    Ok(ImageInfo {
        path: path.to_path_buf(),
        capture,
        width,
        height,
    })
}

/// Read and normalise the EXIF capture timestamp of one image.
fn read_capture_time(path: &Path, localize: Option<Tz>) -> CaptureTime {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            debug!("cannot reopen {} for EXIF: {error}", path.display());
            return CaptureTime::Invalid(TimestampIssue::NoExif);
        }
    };

    let mut reader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(error) => {
            debug!("no EXIF in {}: {error}", path.display());
            return CaptureTime::Invalid(TimestampIssue::NoExif);
        }
    };

    let Some(raw) = datetime_field(&exif) else {
        debug!("no datetime tag in {}", path.display());
        return CaptureTime::Invalid(TimestampIssue::TagMissing);
    };

    let capture = parse_capture_time(&raw, localize);
    if let CaptureTime::Invalid(issue) = capture {
        warn!(
            "could not derive capture time for {} from {raw:?}: {issue:?}",
            path.display()
        );
    }
    capture
}

/// The raw EXIF datetime string: `DateTimeOriginal`, else `DateTime`.
fn datetime_field(exif: &exif::Exif) -> Option<String> {
    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .find_map(|tag| {
            let field = exif.get_field(tag, exif::In::PRIMARY)?;
            match &field.value {
                exif::Value::Ascii(values) => values
                    .first()
                    .and_then(|bytes| std::str::from_utf8(bytes).ok())
                    .map(str::to_owned),
                _ => None,
            }
        })
}

/// Parse an EXIF-format datetime string and normalise it to UTC epoch
/// seconds.
///
/// With `localize`, the naive wall-clock time is interpreted in that zone;
/// without it, in the system's local zone. Exposed so timestamp policy can
/// be tested without image fixtures.
pub fn parse_capture_time(raw: &str, localize: Option<Tz>) -> CaptureTime {
    let Ok(naive) = NaiveDateTime::parse_from_str(raw.trim(), EXIF_DATETIME_FORMAT) else {
        return CaptureTime::Invalid(TimestampIssue::Unparseable);
    };
    to_utc_epoch(naive, localize)
}

fn to_utc_epoch(naive: NaiveDateTime, localize: Option<Tz>) -> CaptureTime {
    let resolved = match localize {
        Some(zone) => zone
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.timestamp()),
        None => Local
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.timestamp()),
    };

    match resolved {
        Some(seconds) => CaptureTime::At(seconds as f64),
        None => CaptureTime::Invalid(TimestampIssue::Unlocalizable),
    }
}

/// Resolve an IANA timezone name.
///
/// # Errors
///
/// Returns [`TimelapseError::UnknownTimezone`] when the name is not in the
/// zone database.
pub fn resolve_timezone(name: &str) -> Result<Tz, TimelapseError> {
    name.parse::<Tz>()
        .map_err(|_| TimelapseError::UnknownTimezone(name.to_string()))
}
