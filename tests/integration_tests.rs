use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    cargo_bin_cmd!("huepick")
}

/// Write a colorful PNG into `dir` and return its path.
fn varied_png(dir: &Path) -> PathBuf {
    let path = dir.join("varied.png");
    RgbImage::from_fn(300, 200, |x, y| {
        Rgb([(x * 255 / 300) as u8, (y * 255 / 200) as u8, 160])
    })
    .save(&path)
    .unwrap();
    path
}

fn store_arg(dir: &Path) -> String {
    dir.join("store.json").display().to_string()
}

#[test]
fn test_cli_prints_hex_list() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());

    let output = cmd()
        .arg(&image)
        .args(["-n", "4", "--seed", "1", "--store", &store_arg(dir.path())])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    for line in lines {
        assert!(line.starts_with('#') && line.len() == 7, "bad line {line}");
        assert!(u32::from_str_radix(&line[1..], 16).is_ok());
    }
}

#[test]
fn test_cli_same_seed_same_output() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());
    let store = store_arg(dir.path());

    let run = || {
        cmd()
            .arg(&image)
            .args(["--seed", "9", "--store", &store])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_cli_css_format() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());

    cmd()
        .arg(&image)
        .args(["--seed", "2", "--format", "css", "--store", &store_arg(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(":root {"))
        .stdout(predicate::str::contains("--color-1: #"))
        .stdout(predicate::str::contains("--color-5: #"));
}

#[test]
fn test_cli_gradient() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());

    cmd()
        .arg(&image)
        .args(["--seed", "2", "--gradient", "--direction", "45deg"])
        .args(["--store", &store_arg(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("linear-gradient(45deg, #"))
        .stdout(predicate::str::contains("100%)"));
}

#[test]
fn test_cli_move_is_clamped() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());

    let output = cmd()
        .arg(&image)
        .args(["--seed", "3", "--move=0:-50,-50", "--format", "json"])
        .args(["--store", &store_arg(dir.path())])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let points: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(points[0]["position"]["x"].as_f64(), Some(0.0));
    assert_eq!(points[0]["position"]["y"].as_f64(), Some(0.0));
    assert_eq!(points[0]["dragging"], false);
}

#[test]
fn test_cli_save_rejects_duplicate() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());
    let store = store_arg(dir.path());

    cmd()
        .arg(&image)
        .args(["--seed", "4", "--save", "--store", &store])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved palette 'Palette 1'"));

    cmd()
        .arg(&image)
        .args(["--seed", "4", "--save", "--name", "Again", "--store", &store])
        .assert()
        .success()
        .stderr(predicate::str::contains("already saved as 'Palette 1'"));

    let content = std::fs::read_to_string(&store).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["savedPalettes"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_cli_list_and_delete_palettes() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());
    let store = store_arg(dir.path());

    cmd()
        .arg(&image)
        .args(["--seed", "5", "-n", "3", "--save", "--name", "Field"])
        .args(["--store", &store])
        .assert()
        .success();

    cmd()
        .args(["--list-palettes", "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^Field: #[0-9a-f]{6} #[0-9a-f]{6} #[0-9a-f]{6}\n$").unwrap());

    cmd()
        .args(["--delete-palette", "Field", "--store", &store])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted palette 'Field'"));

    cmd()
        .args(["--list-palettes", "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_all_black_image_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("black.png");
    RgbImage::new(120, 120).save(&path).unwrap();

    cmd()
        .arg(&path)
        .args(["--store", &store_arg(dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No distinct colors"));
}

#[test]
fn test_cli_invalid_image_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    cmd()
        .arg(&path)
        .args(["--store", &store_arg(dir.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load image"));
}

#[test]
fn test_cli_requires_image() {
    cmd().assert().failure();
}

#[test]
fn test_cli_writes_swatch() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());
    let swatch = dir.path().join("swatch.png");

    cmd()
        .arg(&image)
        .args(["--seed", "6", "-n", "4", "--swatch"])
        .arg(&swatch)
        .args(["--store", &store_arg(dir.path())])
        .assert()
        .success();

    let img = image::open(&swatch).unwrap();
    assert_eq!(img.width(), 480);
    assert_eq!(img.height(), 120);
}

#[test]
fn test_cli_save_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huepick.toml");

    cmd()
        .args(["-n", "9", "--save-config"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("count = 9"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("huepick"));
}

#[test]
fn test_cli_many_points_without_gradient() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());
    let store = store_arg(dir.path());

    // 102 stops cannot keep a 1% gap, but a plain list needs no gradient
    let output = cmd()
        .arg(&image)
        .args(["-n", "102", "--seed", "1", "--store", &store])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(output).unwrap().lines().count(), 102);

    cmd()
        .arg(&image)
        .args(["-n", "102", "--seed", "1", "--gradient", "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Cannot build gradient"));
}

#[test]
fn test_cli_rejects_infinite_min_distance() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());

    cmd()
        .arg(&image)
        .args(["--min-distance", "inf", "--store", &store_arg(dir.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid setting"));
}

#[test]
fn test_cli_negative_coordinates() {
    let dir = TempDir::new().unwrap();
    let image = varied_png(dir.path());

    let output = cmd()
        .arg(&image)
        .args(["--seed", "3", "--move", "0:-50,-50", "--drag", "-5,-5:10,10"])
        .args(["--format", "json", "--store", &store_arg(dir.path())])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // The move parks point 0 in the corner, the drag grabs it just outside
    let points: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let x = points[0]["position"]["x"].as_f64().unwrap();
    let y = points[0]["position"]["y"].as_f64().unwrap();
    assert!((x - 100.0 / 30.0).abs() < 1e-3, "x = {x}");
    assert!((y - 5.0).abs() < 1e-3, "y = {y}");
    assert_eq!(points[0]["dragging"], false);
}
