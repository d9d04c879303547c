//! # timelapse
//!
//! Turn folders of timestamped photographs into timelapse videos.
//!
//! `timelapse` discovers leaf folders of images under a source root,
//! orders each folder's images by EXIF capture time, optionally
//! compresses the sequence into fewer frames by sliding-window pixel
//! averaging, and hands the result to an external encoder (FFmpeg,
//! treated as a black box) to produce one video per folder.
//!
//! ## Quick Start
//!
//! ### Preprocess a photo tree
//!
//! ```no_run
//! use timelapse::{TimelapseOptions, process_folders};
//!
//! let options = TimelapseOptions::new("/photos", "/out")
//!     .with_average(true)
//!     .with_window(5)
//!     .with_step(2);
//!
//! for (folder, frames) in process_folders(&options).unwrap() {
//!     println!("{}: {} frames", folder.display(), frames.len());
//! }
//! ```
//!
//! ### Render a folder's frames to video
//!
//! ```no_run
//! use std::path::Path;
//!
//! use timelapse::{EncoderOptions, run_encoder};
//!
//! let options = EncoderOptions::new().with_target_width(Some(1920));
//! let command = options.command_from_pattern(
//!     Path::new("/out/day1/Im_%d.jpg"),
//!     Path::new("/out/day1/timelapse.mp4"),
//! );
//! run_encoder(command, Path::new("/out/day1/timelapse.mp4")).unwrap();
//! ```
//!
//! ## Pipeline
//!
//! - [`FolderWalker`] — lazy leaf-folder discovery with a documented
//!   first-child heuristic
//! - [`read_info`] — header-only EXIF timestamp and dimension extraction,
//!   with optional IANA timezone localization
//! - [`sort_by_capture_time`] — stable temporal ordering; records without
//!   a usable timestamp sort last
//! - [`reconcile`] — median-based target resolution, robust to outlier
//!   dimension readings
//! - [`plan_windows`] / [`average_windows`] — sliding-window partitioning
//!   and parallel pixel-wise averaging on bounded worker pools
//! - [`process_folders`] — the whole pipeline, one folder at a time
//! - [`write_concat_list`] / [`EncoderOptions`] — the encoder-facing
//!   surface: manifest files and synchronous FFmpeg invocation
//!
//! Per-image and per-window work is parallelised on bounded rayon pools
//! sized independently per stage; completion order never affects output
//! ordering, since every result is re-associated with its input index.

pub mod average;
pub mod concat;
pub mod encoder;
pub mod error;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod resolution;
pub mod sequence;
pub mod walker;

pub use average::{Window, average_windows, plan_windows};
pub use concat::write_concat_list;
pub use encoder::{EncoderOptions, run_encoder};
pub use error::TimelapseError;
pub use metadata::{
    CaptureTime, ImageInfo, TimestampIssue, parse_capture_time, read_info, resolve_timezone,
};
pub use options::TimelapseOptions;
pub use pipeline::process_folders;
pub use resolution::{TargetResolution, reconcile};
pub use sequence::{into_paths, sort_by_capture_time};
pub use walker::FolderWalker;
