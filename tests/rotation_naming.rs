//! Tests for archive names and size parsing.

use chrono::{Local, TimeZone};
use std::fs;
use std::path::Path;
use strandlog::rotation::naming::{archive_suffix, unique_path, with_suffix};
use strandlog::rotation::{
    RotationStrategy, archive_path, format_size, highest_generation, parse_size,
};
use tempfile::TempDir;

#[test]
fn size_archive_uses_generation() {
    let now = Local::now();
    let path = archive_path(
        Path::new("/var/log/app.log"),
        RotationStrategy::BySize { max_bytes: 1 },
        now,
        7,
    );
    assert_eq!(path, Path::new("/var/log/app.log.7"));
}

#[test]
fn time_archive_uses_timestamp() {
    let now = Local.with_ymd_and_hms(2025, 3, 9, 13, 0, 1).unwrap();
    let path = archive_path(Path::new("app.log"), RotationStrategy::Hourly, now, 1);
    assert_eq!(path, Path::new("app.log.20250309-130001"));
}

#[test]
fn with_suffix_keeps_extension() {
    assert_eq!(with_suffix(Path::new("a/b.log"), "3"), Path::new("a/b.log.3"));
}

#[test]
fn unique_path_disambiguates() {
    let tmp = TempDir::new().unwrap();
    let wanted = tmp.path().join("app.log.20250101-000000");
    assert_eq!(unique_path(wanted.clone()), wanted);

    fs::write(&wanted, "x").unwrap();
    let second = unique_path(wanted.clone());
    assert_eq!(second, with_suffix(&wanted, "1"));

    fs::write(&second, "x").unwrap();
    assert_eq!(unique_path(wanted.clone()), with_suffix(&wanted, "2"));
}

#[test]
fn archive_suffix_extraction() {
    assert_eq!(archive_suffix("app.log", "app.log.12"), Some("12"));
    assert_eq!(archive_suffix("app.log", "app.log"), None);
    assert_eq!(archive_suffix("app.log", "app.log."), None);
    assert_eq!(archive_suffix("app.log", "other.log.1"), None);
}

#[test]
fn highest_generation_scans_directory() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    assert_eq!(highest_generation(&base), 0);

    for name in ["app.log", "app.log.2", "app.log.11", "app.log.20250101-000000", "app.log.x"] {
        fs::write(tmp.path().join(name), "x").unwrap();
    }
    assert_eq!(highest_generation(&base), 11);
}

#[test]
fn parse_size_units() {
    assert_eq!(parse_size("512"), Some(512));
    assert_eq!(parse_size("64K"), Some(64 * 1024));
    assert_eq!(parse_size("10M"), Some(10 * 1024 * 1024));
    assert_eq!(parse_size("10mb"), Some(10 * 1024 * 1024));
    assert_eq!(parse_size("1.5G"), Some(1024 * 1024 * 1024 * 3 / 2));
}

#[test]
fn parse_size_rejects_garbage() {
    assert_eq!(parse_size(""), None);
    assert_eq!(parse_size("-1M"), None);
    assert_eq!(parse_size("lots"), None);
}

#[test]
fn format_size_units() {
    assert_eq!(format_size(100), "100 B");
    assert_eq!(format_size(2048), "2.00 KB");
    assert_eq!(format_size(10 * 1024 * 1024), "10.00 MB");
}
