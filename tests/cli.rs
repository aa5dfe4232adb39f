use std::path::Path;

use assert_cmd::Command;
use image::{ImageBuffer, Rgb};
use predicates::prelude::*;
use tempfile::TempDir;

fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
    ImageBuffer::from_pixel(width, height, Rgb([30u8, 60, 90]))
        .save(dir.join(name))
        .unwrap();
}

fn squarepad() -> Command {
    let mut cmd = Command::cargo_bin("squarepad").unwrap();
    cmd.env_remove("SQUAREPAD_CONFIG");
    cmd
}

#[test]
fn letterboxes_folder_into_timestamped_run() {
    let src = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_image(src.path(), "wide.png", 120, 60);
    write_image(src.path(), "tall.png", 60, 120);
    std::fs::create_dir(src.path().join("subdir")).unwrap();

    squarepad()
        .arg(src.path())
        .args(["--size", "48", "--quiet"])
        .arg("--output-root")
        .arg(root.path())
        .assert()
        .success();

    let runs: Vec<_> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(runs.len(), 1);

    let name = runs[0].file_name().unwrap().to_str().unwrap();
    assert_eq!(name.len(), 14);
    assert!(name.chars().all(|c| c.is_ascii_digit()));

    for file in ["wide.png", "tall.png"] {
        let saved = image::open(runs[0].join(file)).unwrap();
        assert_eq!((saved.width(), saved.height()), (48, 48));
    }
    assert_eq!(std::fs::read_dir(&runs[0]).unwrap().count(), 2);
}

#[test]
fn json_report_lists_processed_files() {
    let src = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_image(src.path(), "only.png", 80, 40);

    squarepad()
        .arg(src.path())
        .args(["--size", "40", "--json", "--fill", "0"])
        .arg("--output-root")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"orientation\": \"wide\""))
        .stdout(predicate::str::contains("only.png"));
}

#[test]
fn dry_run_writes_nothing() {
    let src = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_image(src.path(), "a.png", 10, 10);
    write_image(src.path(), "b.png", 10, 20);

    squarepad()
        .arg(src.path())
        .arg("--dry-run")
        .arg("--output-root")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files would be letterboxed"))
        .stdout(predicate::str::contains("a.png"));

    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn corrupt_image_fails_the_run() {
    let src = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    std::fs::write(src.path().join("broken.png"), b"garbage").unwrap();

    squarepad()
        .arg(src.path())
        .args(["--size", "32", "--quiet"])
        .arg("--output-root")
        .arg(root.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.png"));
}

#[test]
fn missing_source_is_an_error() {
    squarepad()
        .assert()
        .failure()
        .stderr(predicate::str::contains("source folder is required"));
}

#[test]
fn rejects_zero_size() {
    let src = TempDir::new().unwrap();

    squarepad()
        .arg(src.path())
        .args(["--size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target size"));
}

#[test]
fn example_config_round_trips_through_validation() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("squarepad.toml");

    squarepad()
        .arg("example-config")
        .arg("--output")
        .arg(&config)
        .assert()
        .success();

    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("target_size = 640"));
    assert!(content.contains("fill = 114"));

    squarepad()
        .arg("config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn config_file_sets_target_size() {
    let src = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let config = src.path().join("settings.yaml");
    write_image(src.path(), "pic.png", 30, 90);
    std::fs::write(
        &config,
        format!(
            "processing:\n  target_size: 24\n  output_root: {:?}\n",
            root.path().display().to_string()
        ),
    )
    .unwrap();

    // The config file lives in the source folder and is not an image.
    squarepad()
        .arg(src.path())
        .arg("--dry-run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("to 24px"));
}
