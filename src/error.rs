//! Error types for the `timelapse` crate.
//!
//! This module defines [`TimelapseError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry rich context to aid
//! debugging, including file paths, window indices, and upstream error
//! messages.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `timelapse` operations.
///
/// Every public method that can fail returns `Result<T, TimelapseError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimelapseError {
    /// An image file could not be opened for metadata extraction.
    #[error("Failed to open image at {path}: {reason}")]
    ImageOpen {
        /// Path that was passed to [`crate::read_info`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The pixel dimensions of an image could not be determined from its
    /// container header.
    #[error("Failed to read dimensions of {path}: {reason}")]
    DimensionRead {
        /// Path of the offending image.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// A timezone name did not resolve against the IANA database.
    #[error("Unknown timezone identifier: {0}")]
    UnknownTimezone(String),

    /// A window size of zero was provided.
    #[error("Window size must be greater than zero")]
    InvalidWindowSize,

    /// A step of zero was provided.
    #[error("Step must be greater than zero")]
    InvalidStep,

    /// A window could not be averaged.
    ///
    /// Emitted by the window averager when a member image fails to decode
    /// or the averaged buffer cannot be assembled. The averaging loop logs
    /// this and continues with the remaining windows.
    #[error("Failed to average window {index}: {reason}")]
    WindowAveraging {
        /// Index of the window that failed.
        index: usize,
        /// Underlying reason the average could not be produced.
        reason: String,
    },

    /// A bounded worker pool could not be constructed.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    /// The external encoder binary could not be launched.
    #[error("Failed to launch encoder {program}: {reason}")]
    EncoderSpawn {
        /// The executable that was invoked.
        program: String,
        /// Underlying reason the spawn failed.
        reason: String,
    },

    /// The external encoder exited with a non-zero status.
    #[error("Encoder failed for {destination} ({status}): {stderr}")]
    EncoderFailure {
        /// The output video path that was being produced.
        destination: PathBuf,
        /// The encoder's exit status, rendered for display.
        status: String,
        /// Captured standard error output from the encoder.
        stderr: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate during decode, resize, or save.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}
