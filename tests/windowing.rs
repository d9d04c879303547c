//! Window partitioning and concat-list tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use timelapse::{TimelapseError, plan_windows, write_concat_list};

fn paths(count: usize) -> Vec<PathBuf> {
    (0..count).map(|i| PathBuf::from(format!("{i}.jpg"))).collect()
}

#[test]
fn window_count_is_ceil_n_over_step() {
    let sequence = paths(5);
    let windows = plan_windows(&sequence, 2, 1, Path::new("out"), "jpg").unwrap();
    assert_eq!(windows.len(), 5);

    let windows = plan_windows(&sequence, 3, 2, Path::new("out"), "jpg").unwrap();
    assert_eq!(windows.len(), 3);

    let windows = plan_windows(&sequence, 2, 5, Path::new("out"), "jpg").unwrap();
    assert_eq!(windows.len(), 1);
}

#[test]
fn final_window_may_be_short() {
    let sequence = paths(5);
    let windows = plan_windows(&sequence, 2, 1, Path::new("out"), "jpg").unwrap();
    assert_eq!(windows[3].members.len(), 2);
    assert_eq!(windows[4].members.len(), 1);
}

#[test]
fn overlapping_windows_cover_the_whole_sequence() {
    let sequence = paths(7);
    let windows = plan_windows(&sequence, 3, 2, Path::new("out"), "jpg").unwrap();

    let mut covered = vec![false; sequence.len()];
    for window in &windows {
        for member in &window.members {
            let index: usize = member
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .parse()
                .unwrap();
            covered[index] = true;
        }
    }
    assert!(covered.iter().all(|&seen| seen));
}

#[test]
fn step_larger_than_window_leaves_gaps() {
    let sequence = paths(6);
    let windows = plan_windows(&sequence, 1, 2, Path::new("out"), "jpg").unwrap();
    assert_eq!(windows.len(), 3);
    assert_eq!(windows[0].members, vec![PathBuf::from("0.jpg")]);
    assert_eq!(windows[1].members, vec![PathBuf::from("2.jpg")]);
    assert_eq!(windows[2].members, vec![PathBuf::from("4.jpg")]);
}

#[test]
fn output_paths_are_sequentially_named() {
    let sequence = paths(3);
    let windows = plan_windows(&sequence, 2, 1, Path::new("out"), "png").unwrap();
    for (i, window) in windows.iter().enumerate() {
        assert_eq!(window.index, i);
        assert_eq!(window.output_path, Path::new("out").join(format!("Im_{i}.png")));
    }
}

#[test]
fn zero_window_or_step_is_rejected() {
    let sequence = paths(3);
    assert!(matches!(
        plan_windows(&sequence, 0, 1, Path::new("out"), "jpg"),
        Err(TimelapseError::InvalidWindowSize)
    ));
    assert!(matches!(
        plan_windows(&sequence, 2, 0, Path::new("out"), "jpg"),
        Err(TimelapseError::InvalidStep)
    ));
}

#[test]
fn concat_list_selects_every_step_th_path() {
    let dir = TempDir::new().unwrap();
    let sequence = paths(3);
    let file = dir.path().join("path_file.txt");

    write_concat_list(&sequence, 2, &file).unwrap();

    let contents = fs::read_to_string(&file).unwrap();
    assert_eq!(contents, "file 0.jpg\nfile 2.jpg\n");
}

#[test]
fn concat_list_normalises_backslashes() {
    let dir = TempDir::new().unwrap();
    let sequence = vec![PathBuf::from(r"day1\1.jpg")];
    let file = dir.path().join("path_file.txt");

    write_concat_list(&sequence, 1, &file).unwrap();

    let contents = fs::read_to_string(&file).unwrap();
    assert_eq!(contents, "file day1/1.jpg\n");
}

#[test]
fn concat_list_rejects_zero_step() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("path_file.txt");
    assert!(matches!(
        write_concat_list(&paths(3), 0, &file),
        Err(TimelapseError::InvalidStep)
    ));
}
