use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn};
use serde_json::json;
use timelapse::{
    EncoderOptions, TimelapseOptions, process_folders, run_encoder, write_concat_list,
};

const CLI_AFTER_HELP: &str = "Examples:\n  timelapse /photos /videos --average --window 5 --step 2\n  timelapse /photos /videos --filetype png --width 1920 --timezone Europe/Zurich\n  timelapse /photos /videos --no-encode --json";

#[derive(Debug, Parser)]
#[command(
    name = "timelapse",
    version,
    about = "Average timestamped photo folders into timelapse videos",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Source root containing photo folders.
    src: PathBuf,

    /// Destination root for frames and videos.
    dst: PathBuf,

    /// Number of images to average into one output frame.
    #[arg(long, default_value_t = 3)]
    window: usize,

    /// Number of images to step forward between windows.
    #[arg(long, default_value_t = 1)]
    step: usize,

    /// Image filetype to search for.
    #[arg(long, default_value = "jpg")]
    filetype: String,

    /// Average [window] images into one output frame.
    #[arg(long)]
    average: bool,

    /// Target output width in pixels; height preserves aspect ratio.
    /// Omit to keep the native (median) resolution.
    #[arg(long)]
    width: Option<u32>,

    /// IANA timezone the EXIF timestamps were recorded in
    /// (e.g. Europe/Zurich). Defaults to the system zone.
    #[arg(long)]
    timezone: Option<String>,

    /// Path to the ffmpeg executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Output video frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Video codec handed to the encoder.
    #[arg(long, default_value = "libx264")]
    codec: String,

    /// Stop after preprocessing; do not invoke the encoder.
    #[arg(long)]
    no_encode: bool,

    /// Print a machine-readable JSON run summary.
    #[arg(long)]
    json: bool,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL", hide = true)]
    completions: Option<Shell>,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "timelapse", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let mut options = TimelapseOptions::new(&cli.src, &cli.dst)
        .with_window(cli.window)
        .with_step(cli.step)
        .with_extension(&cli.filetype)
        .with_average(cli.average)
        .with_target_width(cli.width);
    if let Some(name) = &cli.timezone {
        options = options.with_timezone_name(name)?;
    }

    let started = Instant::now();
    println!("Start: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let processed = process_folders(&options)?;
    println!(
        "{}",
        format!("Preprocessing done ({} folders).", processed.len()).green()
    );

    let mut videos: Vec<PathBuf> = Vec::new();
    if cli.no_encode {
        println!("Skipping video creation (--no-encode).");
    } else {
        videos = encode_folders(&cli, &processed)?;
    }

    if cli.json {
        let summary = json!({
            "folders": processed
                .iter()
                .map(|(folder, frames)| json!({
                    "destination": folder,
                    "frames": frames,
                }))
                .collect::<Vec<_>>(),
            "videos": videos,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    let elapsed = started.elapsed().as_secs();
    println!("End: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Processing time: {}min {}s", elapsed / 60, elapsed % 60);
    Ok(())
}

/// Render one video per processed folder, continuing past per-folder
/// encoder failures.
fn encode_folders(
    cli: &Cli,
    processed: &std::collections::BTreeMap<PathBuf, Vec<PathBuf>>,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let encoder = EncoderOptions::new()
        .with_ffmpeg(&cli.ffmpeg)
        .with_frame_rate(cli.fps)
        .with_codec(&cli.codec)
        .with_target_width(cli.width);

    let bar = ProgressBar::new(processed.len() as u64);
    let style = ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    bar.set_style(style.progress_chars("##-"));

    let mut videos = Vec::new();
    for (folder, frames) in processed {
        bar.set_message(folder.display().to_string());

        if frames.is_empty() {
            warn!("no frames for {}, skipping video", folder.display());
            bar.inc(1);
            continue;
        }

        std::fs::create_dir_all(folder)?;
        let video = video_path(folder);
        let command = if cli.average {
            let pattern = folder.join(format!("Im_%d.{}", cli.filetype));
            encoder.command_from_pattern(&pattern, &video)
        } else {
            // Frames are unprocessed source paths; hand the encoder an
            // explicit manifest with the step applied.
            let list_file = write_concat_list(frames, cli.step, &folder.join("path_file.txt"))?;
            encoder.command_from_concat(&list_file, &video)
        };

        match run_encoder(command, &video) {
            Ok(()) => videos.push(video),
            Err(err) => {
                error!("video creation failed for {}: {err}", folder.display());
                eprintln!("{} {err}", "error:".red().bold());
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(videos)
}

fn video_path(folder: &Path) -> PathBuf {
    folder.join(format!(
        "timelapse_{}.mp4",
        Local::now().format("%Y%m%d%H%M%S")
    ))
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
