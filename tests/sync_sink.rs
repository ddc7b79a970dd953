//! Tests for the synchronous sink and the console and file writers.

use std::fs;
use std::sync::Arc;
use std::thread;
use strandlog::fmt::MessageFormatter;
use strandlog::fmt::color::{RED, RESET, YELLOW};
use strandlog::sink::{ConsoleWriter, FileWriter, MemoryBuffer, Sink, SinkStatus, Stream, SyncSink};
use strandlog::{Error, Level, Record};
use tempfile::TempDir;

fn memory_writer(buf: &MemoryBuffer, colors: bool) -> ConsoleWriter {
    ConsoleWriter::new()
        .stream(Stream::Memory(buf.clone()))
        .colors(colors)
}

#[test]
fn console_wraps_lines_in_level_color() {
    let buf = MemoryBuffer::new();
    let sink = SyncSink::new(memory_writer(&buf, true)).with_formatter(MessageFormatter);

    sink.submit(Record::new(Level::Warning, "careful")).unwrap();
    sink.submit(Record::new(Level::Error, "broken")).unwrap();

    assert_eq!(
        buf.contents(),
        format!("{YELLOW}careful{RESET}\n{RED}broken{RESET}\n")
    );
}

#[test]
fn console_without_colors_is_plain() {
    let buf = MemoryBuffer::new();
    let sink = SyncSink::new(memory_writer(&buf, false)).with_formatter(MessageFormatter);
    sink.submit(Record::new(Level::Fatal, "plain")).unwrap();
    assert_eq!(buf.contents(), "plain\n");
}

#[test]
fn sync_sink_filters_by_level() {
    let buf = MemoryBuffer::new();
    let sink = SyncSink::new(memory_writer(&buf, false))
        .with_formatter(MessageFormatter)
        .with_level(Level::Error);

    sink.submit(Record::new(Level::Warning, "skip")).unwrap();
    sink.submit(Record::new(Level::Error, "keep")).unwrap();
    assert_eq!(buf.contents(), "keep\n");
    assert_eq!(sink.level(), Level::Error);
}

#[test]
fn sync_sink_refuses_after_close() {
    let buf = MemoryBuffer::new();
    let sink = SyncSink::new(memory_writer(&buf, false));
    assert_eq!(sink.status(), SinkStatus::Open);

    sink.close().unwrap();
    sink.close().unwrap();
    assert_eq!(sink.status(), SinkStatus::Closed);
    assert!(matches!(
        sink.submit(Record::new(Level::Info, "late")),
        Err(Error::Closed)
    ));
}

#[test]
fn file_writer_strips_escapes_and_appends() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("dir").join("plain.log");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "earlier\n").unwrap();

    let sink = SyncSink::new(FileWriter::open(&path).unwrap())
        .with_formatter(MessageFormatter)
        .flush_each(true);
    sink.submit(Record::new(Level::Error, format!("{RED}red{RESET}"))).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nred\n");
}

#[test]
fn file_writer_creates_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("a").join("b").join("new.log");
    let writer = FileWriter::open(&path).unwrap();
    assert_eq!(writer.path(), path);
    assert!(path.exists());
}

#[test]
fn sync_sink_is_shared_between_threads() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("shared.log");
    let sink = Arc::new(
        SyncSink::new(FileWriter::open(&path).unwrap()).with_formatter(MessageFormatter),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for i in 0..250 {
                    sink.submit(Record::new(Level::Info, format!("{t}-{i}"))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    sink.close().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1000);
    assert!(content.lines().all(|l| l.split_once('-').is_some()));
}
