//! End-to-end pipeline tests over generated photo trees.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::TempDir;
use timelapse::{TimelapseOptions, process_folders};

/// Write `count` small solid PNGs named `1.png` .. `count.png` into a
/// fresh leaf folder under `root`.
fn make_leaf(root: &Path, name: &str, count: usize) {
    let folder = root.join(name);
    fs::create_dir_all(&folder).unwrap();
    for i in 1..=count {
        RgbImage::from_pixel(4, 4, Rgb([i as u8 * 10, 0, 0]))
            .save(folder.join(format!("{i}.png")))
            .unwrap();
    }
}

#[test]
fn flat_folder_without_averaging_returns_sorted_source_paths() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    make_leaf(src.path(), "flat", 5);

    let options = TimelapseOptions::new(src.path().join("flat"), dst.path())
        .with_extension("png")
        .with_window(2)
        .with_step(1);
    let processed = process_folders(&options).unwrap();

    assert_eq!(processed.len(), 1);
    let (folder, frames) = processed.iter().next().unwrap();
    assert_eq!(folder, &dst.path().join("flat"));

    // No EXIF in the fixtures: every record is invalid, and the stable
    // sort preserves the filesystem-listing order.
    let names: Vec<_> = frames
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["1.png", "2.png", "3.png", "4.png", "5.png"]);
    // The sources themselves, untouched.
    assert!(frames.iter().all(|p| p.starts_with(src.path())));
}

#[test]
fn averaging_writes_one_frame_per_window_under_the_destination() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    make_leaf(src.path(), "day1", 5);

    let options = TimelapseOptions::new(src.path(), dst.path())
        .with_extension("png")
        .with_average(true)
        .with_window(2)
        .with_step(1);
    let processed = process_folders(&options).unwrap();

    let frames = &processed[&dst.path().join("day1")];
    assert_eq!(frames.len(), 5);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame, &dst.path().join("day1").join(format!("Im_{i}.png")));
        assert!(frame.exists());
    }
}

#[test]
fn nested_tree_mirrors_folder_names() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    make_leaf(src.path(), "day1", 2);
    make_leaf(src.path(), "day2", 3);

    let options = TimelapseOptions::new(src.path(), dst.path()).with_extension("png");
    let processed = process_folders(&options).unwrap();

    assert_eq!(processed.len(), 2);
    assert!(processed.contains_key(&dst.path().join("day1")));
    assert!(processed.contains_key(&dst.path().join("day2")));
}

#[test]
fn destination_creation_is_idempotent_and_preserves_unrelated_files() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    make_leaf(src.path(), "day1", 3);

    let existing = dst.path().join("day1");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("unrelated.txt"), b"keep me").unwrap();

    let options = TimelapseOptions::new(src.path(), dst.path())
        .with_extension("png")
        .with_average(true)
        .with_window(2)
        .with_step(2);

    process_folders(&options).unwrap();
    process_folders(&options).unwrap();

    assert_eq!(
        fs::read_to_string(existing.join("unrelated.txt")).unwrap(),
        "keep me"
    );
}

#[test]
fn empty_source_yields_an_empty_map() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let options = TimelapseOptions::new(src.path(), dst.path()).with_extension("png");
    assert!(process_folders(&options).unwrap().is_empty());
}
