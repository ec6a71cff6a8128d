//! Config tests - JSON files on disk

use std::fs;
use std::path::PathBuf;

use cat_shelf::config::{load_config, load_level};
use cat_shelf::core::SimpleRng;
use cat_shelf::engine::{design_level, LayoutGenerator};
use cat_shelf::types::{Color, GameConfig, GROUP_SIZE};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cat-shelf-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_overrides_defaults() {
    let path = temp_file(
        "config.json",
        r##"{
            "palette": { "entries": [
                { "color": "red", "display": "#f00" },
                { "color": "blue", "display": "#00f" },
                { "color": "green", "display": "#0f0" },
                { "color": "yellow", "display": "#ff0" },
                { "color": "purple", "display": "#a0f" }
            ] },
            "layout": { "total_shelf_count": 6, "total_box_count": 20, "hidden_fraction": 0.25 },
            "session": { "daily_attempt_limit": 3 }
        }"##,
    );
    let config = load_config(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.palette.enabled_colors().len(), 5);
    assert!(config.palette.contains(Color::Purple));
    assert!(!config.palette.contains(Color::Pink));
    assert_eq!(config.layout.total_shelf_count, 6);
    assert_eq!(config.layout.max_boxes_per_shelf, 4);
    assert_eq!(config.session.daily_attempt_limit, 3);
    assert_eq!(config.group_size, GROUP_SIZE);

    let generator = LayoutGenerator::from_config(&config);
    let designed = design_level(&generator, &config.layout, &mut SimpleRng::new(4)).unwrap();
    assert_eq!(designed.definition.total_boxes(), 20);
    assert_eq!(designed.occlusion.allocated, 5);
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let path = temp_file("bad-config.json", r#"{ "palette": { "entries": [] } }"#);
    let result = load_config(&path);
    fs::remove_file(&path).ok();
    assert!(result.is_err());
}

#[test]
fn test_level_file_round_trips_through_designer_output() {
    let config = GameConfig::default();
    let generator = LayoutGenerator::from_config(&config);
    let designed = design_level(&generator, &config.layout, &mut SimpleRng::new(12)).unwrap();

    let json = serde_json::to_string(&designed.definition).unwrap();
    let path = temp_file("level.json", &json);
    let loaded = load_level(&path, GROUP_SIZE).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(loaded, designed.definition);
}

#[test]
fn test_level_file_must_fill_whole_groups() {
    let path = temp_file(
        "short-level.json",
        r#"{ "shelves": [ { "capacity": 4, "boxes": [ { "color": "red" }, { "color": "red" } ] } ] }"#,
    );
    let result = load_level(&path, GROUP_SIZE);
    fs::remove_file(&path).ok();
    assert!(result.is_err());
}
