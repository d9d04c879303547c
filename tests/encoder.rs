//! Encoder command construction and invocation-failure tests.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use timelapse::{EncoderOptions, TimelapseError, run_encoder};

fn args_of(command: &Command) -> Vec<String> {
    command
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[test]
fn pattern_command_uses_image2_demuxer() {
    let options = EncoderOptions::new().with_target_width(Some(1920));
    let command = options.command_from_pattern(Path::new("out/Im_%d.jpg"), Path::new("out/t.mp4"));

    assert_eq!(command.get_program(), OsString::from("ffmpeg").as_os_str());
    let args = args_of(&command);
    assert!(has_pair(&args, "-f", "image2"));
    assert!(has_pair(&args, "-r", "30"));
    assert!(has_pair(&args, "-i", "out/Im_%d.jpg"));
    assert!(has_pair(&args, "-vf", "scale=1920:-1"));
    assert!(has_pair(&args, "-c:v", "libx264"));
    assert!(has_pair(&args, "-b:v", "20M"));
    assert!(has_pair(&args, "-maxrate:v", "100M"));
    assert!(has_pair(&args, "-pix_fmt", "yuv420p"));
    assert_eq!(args.last().unwrap(), "out/t.mp4");
}

#[test]
fn concat_command_uses_concat_demuxer_unsafely() {
    let options = EncoderOptions::new();
    let command = options.command_from_concat(Path::new("out/path_file.txt"), Path::new("out/t.mp4"));

    let args = args_of(&command);
    assert!(has_pair(&args, "-f", "concat"));
    assert!(has_pair(&args, "-safe", "0"));
    assert!(has_pair(&args, "-i", "out/path_file.txt"));
}

#[test]
fn native_width_omits_the_scale_filter() {
    let options = EncoderOptions::new();
    let command = options.command_from_pattern(Path::new("Im_%d.jpg"), Path::new("t.mp4"));
    assert!(!args_of(&command).iter().any(|arg| arg == "-vf"));
}

#[test]
fn custom_settings_flow_into_the_command() {
    let options = EncoderOptions::new()
        .with_frame_rate(24)
        .with_codec("h264_nvenc")
        .with_bitrate("10M", "50M");
    let command = options.command_from_pattern(Path::new("Im_%d.jpg"), Path::new("t.mp4"));

    let args = args_of(&command);
    assert!(has_pair(&args, "-r", "24"));
    assert!(has_pair(&args, "-c:v", "h264_nvenc"));
    assert!(has_pair(&args, "-b:v", "10M"));
    assert!(has_pair(&args, "-maxrate:v", "50M"));
}

#[test]
fn missing_binary_surfaces_as_spawn_error() {
    let options = EncoderOptions::new().with_ffmpeg("/no/such/ffmpeg-binary");
    let command = options.command_from_pattern(Path::new("Im_%d.jpg"), Path::new("t.mp4"));

    let result = run_encoder(command, Path::new("t.mp4"));
    assert!(matches!(result, Err(TimelapseError::EncoderSpawn { .. })));
}

#[test]
fn nonzero_exit_surfaces_as_encoder_failure() {
    // `false` ignores its arguments and exits 1; a stand-in for a failing
    // encoder without needing ffmpeg installed.
    let options = EncoderOptions::new().with_ffmpeg("false");
    let command = options.command_from_pattern(Path::new("Im_%d.jpg"), Path::new("t.mp4"));

    let result = run_encoder(command, Path::new("t.mp4"));
    match result {
        Err(TimelapseError::EncoderFailure { destination, .. }) => {
            assert_eq!(destination, Path::new("t.mp4"));
        }
        other => panic!("expected EncoderFailure, got {other:?}"),
    }
}
