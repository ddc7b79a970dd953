//! Tests for the rotating file writer.

use chrono::{Duration, Local, TimeZone};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use strandlog::clock::ManualClock;
use strandlog::level::Level;
use strandlog::rotation::RotationPolicy;
use strandlog::sink::{RecordWriter, RotatingFileWriter};
use strandlog::Error;
use tempfile::TempDir;

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn lines(path: &Path) -> Vec<String> {
    read(path).lines().map(str::to_string).collect()
}

#[test]
fn size_rotation_puts_triggering_record_in_new_file() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(50, 5)).unwrap();

    // 10 bytes per line including the newline
    for i in 0..5 {
        writer.write_line(Level::Info, &format!("line-{i:04}")).unwrap();
    }
    assert_eq!(writer.rotation_count(), 0);
    assert_eq!(writer.current_size(), 50);

    writer.write_line(Level::Info, "line-0005").unwrap();
    writer.flush().unwrap();

    assert_eq!(writer.rotation_count(), 1);
    assert_eq!(lines(&tmp.path().join("app.log.1")).len(), 5);
    assert_eq!(lines(&base), ["line-0005"]);
    assert_eq!(writer.current_size(), 10);
}

#[test]
fn oversized_record_is_written_whole() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("big.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(8, 5)).unwrap();

    writer.write_line(Level::Info, "far longer than eight bytes").unwrap();
    writer.flush().unwrap();

    assert_eq!(writer.rotation_count(), 0);
    assert_eq!(lines(&base), ["far longer than eight bytes"]);
}

#[test]
fn rotating_empty_file_creates_no_archive() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(100, 5)).unwrap();

    assert_eq!(writer.rotate_now().unwrap(), None);
    assert_eq!(writer.rotate_now().unwrap(), None);

    assert!(writer.archives().unwrap().is_empty());
    assert_eq!(read(&base), "");
    assert_eq!(writer.current_size(), 0);
}

#[test]
fn hourly_rotation_with_manual_clock() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("hourly.log");
    let start = Local.with_ymd_and_hms(2025, 1, 15, 12, 59, 59).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let mut writer =
        RotatingFileWriter::with_clock(&base, RotationPolicy::hourly(10), clock.clone()).unwrap();

    writer.write_line(Level::Info, "before").unwrap();
    clock.advance(Duration::seconds(2));
    writer.write_line(Level::Info, "after").unwrap();
    writer.flush().unwrap();

    assert_eq!(writer.rotation_count(), 1);
    assert_eq!(
        writer.next_deadline(),
        Some(Local.with_ymd_and_hms(2025, 1, 15, 14, 0, 0).unwrap())
    );
    assert_eq!(lines(&tmp.path().join("hourly.log.20250115-130001")), ["before"]);
    assert_eq!(lines(&base), ["after"]);
}

#[test]
fn time_archives_in_same_second_do_not_collide() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("daily.log");
    let now = Local.with_ymd_and_hms(2025, 1, 15, 0, 0, 5).unwrap();
    let clock = Arc::new(ManualClock::new(now));
    let mut writer =
        RotatingFileWriter::with_clock(&base, RotationPolicy::daily(10), clock).unwrap();

    writer.write_line(Level::Info, "first").unwrap();
    let a = writer.rotate_now().unwrap().unwrap();
    writer.write_line(Level::Info, "second").unwrap();
    let b = writer.rotate_now().unwrap().unwrap();

    assert_ne!(a, b);
    assert_eq!(lines(&a), ["first"]);
    assert_eq!(lines(&b), ["second"]);
    assert!(b.to_string_lossy().ends_with("daily.log.20250115-000005.1"));
}

#[test]
fn retention_keeps_three_most_recent() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(10, 3)).unwrap();

    // Every write after the first rotates: 6 writes, 5 rotations
    for i in 0..6 {
        writer.write_line(Level::Info, &format!("record-{i}")).unwrap();
    }
    writer.flush().unwrap();
    assert_eq!(writer.rotation_count(), 5);

    let archives: Vec<String> = writer
        .archives()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(archives, ["app.log.5", "app.log.4", "app.log.3"]);
    assert_eq!(lines(&tmp.path().join("app.log.5")), ["record-4"]);
    assert_eq!(lines(&base), ["record-5"]);
}

#[test]
fn zero_retention_deletes_every_archive() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(10, 0)).unwrap();

    for i in 0..3 {
        writer.write_line(Level::Info, &format!("record-{i}")).unwrap();
    }
    writer.flush().unwrap();

    assert_eq!(writer.rotation_count(), 2);
    assert!(writer.archives().unwrap().is_empty());
    assert_eq!(lines(&base), ["record-2"]);
}

#[test]
fn generation_resumes_after_restart() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    fs::write(tmp.path().join("app.log.4"), "old\n").unwrap();
    fs::write(&base, "existing\n").unwrap();

    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(1000, 10)).unwrap();
    let archived = writer.rotate_now().unwrap().unwrap();

    assert_eq!(archived, tmp.path().join("app.log.5"));
    assert_eq!(read(&archived), "existing\n");
    assert_eq!(read(&tmp.path().join("app.log.4")), "old\n");
}

#[test]
fn existing_size_counts_toward_threshold() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    fs::write(&base, "x".repeat(45)).unwrap();

    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(50, 5)).unwrap();
    assert_eq!(writer.current_size(), 45);

    writer.write_line(Level::Info, "123456789").unwrap();
    writer.flush().unwrap();

    assert_eq!(writer.rotation_count(), 1);
    assert_eq!(read(&tmp.path().join("app.log.1")), "x".repeat(45));
}

#[test]
fn escapes_never_reach_the_file() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(1000, 5)).unwrap();

    writer.write_line(Level::Error, "\x1b[31mred\x1b[0m alert").unwrap();
    writer.flush().unwrap();

    assert_eq!(read(&base), "red alert\n");
    assert_eq!(writer.current_size(), 10);
}

#[test]
fn size_threshold_counts_bytes_after_escapes_are_removed() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(20, 5)).unwrap();

    // "red alert\n" is 10 bytes once the color codes are gone
    writer.write_line(Level::Error, "\x1b[31mred\x1b[0m alert").unwrap();
    writer.write_line(Level::Error, "\x1b[31mred\x1b[0m alert").unwrap();
    assert_eq!(writer.current_size(), 20);
    assert_eq!(writer.rotation_count(), 0);

    writer.write_line(Level::Error, "\x1b[31mred\x1b[0m alert").unwrap();
    writer.flush().unwrap();
    assert_eq!(writer.rotation_count(), 1);
    assert_eq!(writer.current_size(), 10);
    assert_eq!(read(&tmp.path().join("app.log.1")), "red alert\nred alert\n");
    assert_eq!(read(&base), "red alert\n");
}

#[test]
fn reopen_failure_is_permanent() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("sub");
    let base = dir.join("app.log");
    let mut writer = RotatingFileWriter::open(&base, RotationPolicy::by_size(1000, 5)).unwrap();
    writer.write_line(Level::Info, "hello").unwrap();
    writer.flush().unwrap();

    fs::remove_dir_all(&dir).unwrap();

    let err = writer.rotate_now().unwrap_err();
    assert!(matches!(err, Error::Rotation { .. }));
    assert!(writer.failure().is_some());

    let err = writer.write_line(Level::Info, "after").unwrap_err();
    assert!(matches!(err, Error::SinkFailed(_)));
    assert!(!dir.exists());
}

#[test]
fn invalid_policy_is_rejected_before_opening() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("never.log");
    let err = RotatingFileWriter::open(&base, RotationPolicy::by_size(0, 5)).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(!base.exists());
}

#[test]
fn daily_rotation_at_midnight() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("daily.log");
    let clock = Arc::new(ManualClock::new(
        Local.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap(),
    ));
    let mut writer =
        RotatingFileWriter::with_clock(&base, RotationPolicy::daily(7), clock.clone()).unwrap();

    writer.write_line(Level::Info, "late evening").unwrap();
    clock.set(Local.with_ymd_and_hms(2025, 3, 10, 23, 59, 59).unwrap());
    writer.write_line(Level::Info, "last second").unwrap();
    assert_eq!(writer.rotation_count(), 0);

    clock.set(Local.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());
    writer.write_line(Level::Info, "new day").unwrap();
    writer.flush().unwrap();

    assert_eq!(writer.rotation_count(), 1);
    assert_eq!(
        lines(&tmp.path().join("daily.log.20250311-000000")),
        ["late evening", "last second"]
    );
    assert_eq!(lines(&base), ["new day"]);
    assert_eq!(
        writer.next_deadline(),
        Some(Local.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap())
    );
}
