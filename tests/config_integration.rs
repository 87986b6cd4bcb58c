//! Round-trip tests for persisted CLI defaults.

use std::path::PathBuf;

use reel::config::{
    ConfigFlags, clear_config_flags, load_config_flags, parse_flag_tokens, save_config_flags,
};

#[test]
fn test_save_then_load_round_trips_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");

    let flags = ConfigFlags {
        watch: true,
        no_images: false,
        perf: true,
        force_half_cell: false,
        slide_width: Some(32),
        render_debug_log: Some(PathBuf::from("render.log")),
    };
    save_config_flags(&path, &flags).unwrap();

    let loaded = load_config_flags(&path).unwrap();
    assert_eq!(loaded, flags);
}

#[test]
fn test_load_missing_config_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-config");
    let loaded = load_config_flags(&path).unwrap();
    assert_eq!(loaded, ConfigFlags::default());
}

#[test]
fn test_clear_removes_saved_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");

    let flags = ConfigFlags {
        watch: true,
        ..ConfigFlags::default()
    };
    save_config_flags(&path, &flags).unwrap();
    assert!(path.exists());

    clear_config_flags(&path).unwrap();
    assert!(!path.exists());
    // Clearing an absent config is not an error
    clear_config_flags(&path).unwrap();
}

#[test]
fn test_saved_file_is_reparsable_as_flag_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");

    save_config_flags(
        &path,
        &ConfigFlags {
            watch: true,
            slide_width: Some(40),
            ..ConfigFlags::default()
        },
    )
    .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let tokens: Vec<String> = content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(ToOwned::to_owned)
        .collect();
    let flags = parse_flag_tokens(&tokens);
    assert!(flags.watch);
    assert_eq!(flags.slide_width, Some(40));
}

#[test]
fn test_nested_config_dir_is_created_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deep").join("nested").join("config");
    save_config_flags(&path, &ConfigFlags::default()).unwrap();
    assert!(path.exists());
}
