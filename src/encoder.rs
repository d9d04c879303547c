//! External encoder invocation.
//!
//! The encoder is a black-box collaborator: given either a printf-style
//! frame pattern or a concat-list manifest, plus a frame rate, an optional
//! target width (height auto-computed by the encoder to preserve aspect
//! ratio), and a bitrate ceiling, it produces one video file. This module
//! only builds and runs the command; codec internals are out of scope.
//!
//! [`EncoderOptions`] carries the invocation surface with defaults
//! matching a 30 fps H.264 render capped at 20M/100M. The call is fully
//! synchronous and runs off the worker pools, once per folder.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::error::TimelapseError;

/// Settings for one encoder invocation.
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// The encoder executable; a bare `ffmpeg` resolves via `PATH`.
    ffmpeg: PathBuf,
    /// Input frame rate.
    frame_rate: u32,
    /// Target output width; `None` keeps the source frame size.
    target_width: Option<u32>,
    /// Video codec passed to `-c:v`.
    codec: String,
    /// Target bitrate (`-b:v`).
    bitrate: String,
    /// Bitrate ceiling (`-maxrate:v`).
    max_bitrate: String,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            frame_rate: 30,
            target_width: None,
            codec: "libx264".to_string(),
            bitrate: "20M".to_string(),
            max_bitrate: "100M".to_string(),
        }
    }
}

impl EncoderOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encoder executable path.
    #[must_use]
    pub fn with_ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg = path.into();
        self
    }

    /// Set the input frame rate. Clamped to at least 1.
    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate.max(1);
        self
    }

    /// Set the target output width (`scale=<w>:-1`, height auto).
    #[must_use]
    pub fn with_target_width(mut self, width: Option<u32>) -> Self {
        self.target_width = width;
        self
    }

    /// Set the video codec (default `libx264`).
    #[must_use]
    pub fn with_codec(mut self, codec: &str) -> Self {
        self.codec = codec.to_string();
        self
    }

    /// Set the target bitrate and its ceiling.
    #[must_use]
    pub fn with_bitrate(mut self, bitrate: &str, max_bitrate: &str) -> Self {
        self.bitrate = bitrate.to_string();
        self.max_bitrate = max_bitrate.to_string();
        self
    }

    /// Build the command for pattern-addressed input
    /// (`-f image2 -i Im_%d.<ext>`).
    #[must_use]
    pub fn command_from_pattern(&self, pattern: &Path, destination: &Path) -> Command {
        let mut command = self.base_command();
        command.args(["-f", "image2", "-r", &self.frame_rate.to_string(), "-i"]);
        command.arg(pattern);
        self.push_output_args(&mut command, destination);
        command
    }

    /// Build the command for concat-list input (`-f concat -safe 0`).
    #[must_use]
    pub fn command_from_concat(&self, list_file: &Path, destination: &Path) -> Command {
        let mut command = self.base_command();
        command.args([
            "-f",
            "concat",
            "-safe",
            "0",
            "-r",
            &self.frame_rate.to_string(),
            "-i",
        ]);
        command.arg(list_file);
        self.push_output_args(&mut command, destination);
        command
    }

    fn base_command(&self) -> Command {
        let mut command = Command::new(&self.ffmpeg);
        command.args(["-hide_banner", "-nostdin", "-loglevel", "error"]);
        command
    }

    fn push_output_args(&self, command: &mut Command, destination: &Path) {
        if let Some(width) = self.target_width {
            command.args(["-vf", &format!("scale={width}:-1")]);
        }
        command.args([
            "-c:v",
            &self.codec,
            "-b:v",
            &self.bitrate,
            "-maxrate:v",
            &self.max_bitrate,
            "-pix_fmt",
            "yuv420p",
        ]);
        command.arg(destination);
    }
}

/// Run a built encoder command to completion.
///
/// Blocks until the encoder exits. Standard error is captured so a
/// failure report carries the encoder's own diagnostics.
///
/// # Errors
///
/// Returns [`TimelapseError::EncoderSpawn`] when the executable cannot be
/// launched (e.g. missing binary) and [`TimelapseError::EncoderFailure`]
/// on a non-zero exit. Both are fatal for the folder being rendered.
pub fn run_encoder(mut command: Command, destination: &Path) -> Result<(), TimelapseError> {
    debug!("invoking encoder: {command:?}");

    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|error| TimelapseError::EncoderSpawn {
            program,
            reason: error.to_string(),
        })?;

    if !output.status.success() {
        return Err(TimelapseError::EncoderFailure {
            destination: destination.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    info!("encoded {}", destination.display());
    Ok(())
}
