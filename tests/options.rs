//! TimelapseOptions builder and pool-sizing tests.

use timelapse::TimelapseOptions;

#[test]
fn defaults_match_a_plain_invocation() {
    let options = TimelapseOptions::new("/src", "/dst");
    // Window 3 with the default 100-thread budget: 33 averaging workers.
    assert_eq!(options.averaging_workers(), 33);
    assert_eq!(options.metadata_workers(), 64);
}

#[test]
fn averaging_pool_narrows_as_windows_grow() {
    let narrow = TimelapseOptions::new("/src", "/dst").with_window(10);
    assert_eq!(narrow.averaging_workers(), 10);

    let huge = TimelapseOptions::new("/src", "/dst").with_window(500);
    // Never below one worker.
    assert_eq!(huge.averaging_workers(), 1);
}

#[test]
fn explicit_pool_widths_override_the_heuristic() {
    let options = TimelapseOptions::new("/src", "/dst")
        .with_window(3)
        .with_averaging_workers(Some(4))
        .with_metadata_workers(8);
    assert_eq!(options.averaging_workers(), 4);
    assert_eq!(options.metadata_workers(), 8);
}

#[test]
fn zero_worker_overrides_are_clamped() {
    let options = TimelapseOptions::new("/src", "/dst")
        .with_averaging_workers(Some(0))
        .with_metadata_workers(0);
    assert_eq!(options.averaging_workers(), 1);
    assert_eq!(options.metadata_workers(), 1);
}

#[test]
fn extension_loses_its_leading_dot() {
    // Observable through the walker: covered there; here just ensure the
    // builder accepts dotted input without panicking.
    let _ = TimelapseOptions::new("/src", "/dst").with_extension(".png");
}

#[test]
fn bad_timezone_name_is_rejected() {
    assert!(
        TimelapseOptions::new("/src", "/dst")
            .with_timezone_name("Nowhere/Null")
            .is_err()
    );
}
