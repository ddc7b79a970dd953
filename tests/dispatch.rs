//! Tests for the asynchronous sink.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use strandlog::fmt::{Formatter, MessageFormatter, PatternFormatter};
use strandlog::sink::{
    AsyncSink, ConsoleWriter, FileWriter, MemoryBuffer, OverflowPolicy, QueueConfig,
    RotatingFileWriter, ShutdownPolicy, Sink, SinkStatus, Stream,
};
use strandlog::{Error, Level, Record, RotationPolicy};
use tempfile::TempDir;

fn memory_sink(config: QueueConfig) -> (AsyncSink, MemoryBuffer) {
    let buf = MemoryBuffer::new();
    let writer = ConsoleWriter::new()
        .stream(Stream::Memory(buf.clone()))
        .colors(false);
    let sink = AsyncSink::new("test", writer, config)
        .unwrap()
        .with_formatter(MessageFormatter);
    (sink, buf)
}

fn file_sink(path: &Path, config: QueueConfig) -> AsyncSink {
    let writer = FileWriter::open(path).unwrap();
    AsyncSink::new("file", writer, config)
        .unwrap()
        .with_formatter(MessageFormatter)
}

fn record(level: Level, text: impl Into<String>) -> Record {
    Record::new(level, text)
}

#[test]
fn eight_producers_keep_their_order() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 1250;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("concurrent.log");
    let sink = Arc::new(file_sink(&path, QueueConfig::default().capacity(64)));

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    sink.submit(record(Level::Info, format!("{p}:{seq}"))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    sink.close().unwrap();

    let stats = sink.stats();
    assert_eq!(stats.submitted, 10_000);
    assert_eq!(stats.written, 10_000);
    assert_eq!(stats.dropped(), 0);

    let content = fs::read_to_string(&path).unwrap();
    let mut last_seen: HashMap<usize, usize> = HashMap::new();
    let mut total = 0;
    for line in content.lines() {
        let (p, seq) = line.split_once(':').unwrap();
        let (p, seq): (usize, usize) = (p.parse().unwrap(), seq.parse().unwrap());
        if let Some(prev) = last_seen.get(&p) {
            assert!(seq > *prev, "producer {p} out of order: {seq} after {prev}");
        }
        last_seen.insert(p, seq);
        total += 1;
    }
    assert_eq!(total, PRODUCERS * PER_PRODUCER);
    assert!(last_seen.values().all(|&last| last == PER_PRODUCER - 1));
}

#[test]
fn records_below_sink_level_are_filtered() {
    let (sink, buf) = memory_sink(QueueConfig::default());
    let sink = sink.with_level(Level::Warning);

    sink.submit(record(Level::Info, "quiet")).unwrap();
    sink.submit(record(Level::Error, "loud")).unwrap();
    sink.close().unwrap();

    assert_eq!(buf.contents(), "loud\n");
    let stats = sink.stats();
    assert_eq!(stats.filtered, 1);
    assert_eq!(stats.written, 1);
}

#[test]
fn flush_waits_for_earlier_records() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("flush.log");
    let sink = file_sink(&path, QueueConfig::default());

    for i in 0..100 {
        sink.submit(record(Level::Info, format!("r{i}"))).unwrap();
    }
    sink.flush().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 100);
    assert_eq!(sink.pending(), 0);
}

#[test]
fn drain_on_close_writes_everything() {
    let (sink, buf) = memory_sink(QueueConfig::unbounded());
    for i in 0..1000 {
        sink.submit(record(Level::Debug, format!("r{i}"))).unwrap();
    }
    sink.close().unwrap();

    assert_eq!(buf.contents().lines().count(), 1000);
    assert_eq!(sink.stats().written, 1000);
}

#[test]
fn discard_on_close_accounts_for_every_record() {
    let (sink, buf) =
        memory_sink(QueueConfig::unbounded().on_close(ShutdownPolicy::Discard));
    for i in 0..1000 {
        sink.submit(record(Level::Info, format!("r{i}"))).unwrap();
    }
    sink.close().unwrap();

    let stats = sink.stats();
    assert_eq!(stats.written + stats.discarded, 1000);
    assert_eq!(buf.contents().lines().count() as u64, stats.written);
}

#[test]
fn submit_after_close_is_refused() {
    let (sink, buf) = memory_sink(QueueConfig::default());
    sink.submit(record(Level::Info, "before")).unwrap();
    sink.close().unwrap();

    let err = sink.submit(record(Level::Info, "after")).unwrap_err();
    assert!(matches!(err, Error::Closed));
    assert_eq!(sink.stats().dropped_closed, 1);
    assert_eq!(sink.status(), SinkStatus::Closed);
    assert_eq!(buf.contents(), "before\n");
}

#[test]
fn close_is_idempotent() {
    let (sink, _buf) = memory_sink(QueueConfig::default());
    sink.close().unwrap();
    sink.close().unwrap();
    sink.flush().unwrap();
}

#[test]
fn reject_accounts_for_every_record() {
    let (sink, buf) = memory_sink(
        QueueConfig::default()
            .capacity(1)
            .overflow(OverflowPolicy::Reject),
    );

    let mut refused = 0;
    for i in 0..2000 {
        match sink.submit(record(Level::Info, format!("r{i}"))) {
            Ok(()) => {}
            Err(Error::QueueFull) => refused += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    sink.close().unwrap();

    let stats = sink.stats();
    assert_eq!(stats.submitted, 2000);
    assert_eq!(stats.dropped_overflow, refused);
    assert_eq!(stats.written + stats.dropped_overflow, 2000);
    assert_eq!(buf.contents().lines().count() as u64, stats.written);
}

#[test]
fn drop_oldest_never_loses_the_newest() {
    let (sink, buf) = memory_sink(
        QueueConfig::default()
            .capacity(2)
            .overflow(OverflowPolicy::DropOldest),
    );

    for i in 0..2000 {
        sink.submit(record(Level::Info, format!("r{i}"))).unwrap();
    }
    sink.close().unwrap();

    let stats = sink.stats();
    assert_eq!(stats.written + stats.dropped_overflow, 2000);
    let content = buf.contents();
    assert_eq!(content.lines().last(), Some("r1999"));
    assert_eq!(content.lines().count() as u64, stats.written);
}

#[test]
fn formatter_swap_applies_to_later_records() {
    let (sink, buf) = memory_sink(QueueConfig::default());
    sink.submit(record(Level::Info, "plain")).unwrap();
    sink.set_formatter(Arc::new(PatternFormatter::new("[{level}] {msg}")));
    sink.submit(record(Level::Warning, "shaped")).unwrap();
    sink.close().unwrap();

    assert_eq!(buf.contents(), "plain\n[WARN] shaped\n");
}

#[test]
fn level_can_change_while_running() {
    let (sink, buf) = memory_sink(QueueConfig::default());
    assert_eq!(sink.level(), Level::Debug);
    sink.submit(record(Level::Debug, "one")).unwrap();
    sink.set_level(Level::Error);
    sink.submit(record(Level::Debug, "two")).unwrap();
    sink.close().unwrap();

    assert_eq!(buf.contents(), "one\n");
}

#[test]
fn rotation_failure_moves_sink_to_failed() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("logs");
    let writer = RotatingFileWriter::open(dir.join("app.log"), RotationPolicy::by_size(10, 3)).unwrap();
    let sink = AsyncSink::new("rotating", writer, QueueConfig::default())
        .unwrap()
        .with_formatter(MessageFormatter);

    sink.submit(record(Level::Info, "record-0")).unwrap();
    sink.flush().unwrap();
    fs::remove_dir_all(&dir).unwrap();

    // Pushes past the threshold; the reopen inside the vanished directory fails
    sink.submit(record(Level::Info, "record-1")).unwrap();
    assert!(matches!(sink.flush(), Err(Error::SinkFailed(_))));
    assert!(matches!(sink.status(), SinkStatus::Failed(_)));

    let err = sink.submit(record(Level::Info, "record-2")).unwrap_err();
    assert!(matches!(err, Error::SinkFailed(_)));
    assert!(matches!(sink.close(), Err(Error::SinkFailed(_))));
    assert!(sink.stats().failed >= 2);
}

#[test]
fn drop_closes_and_drains() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("drop.log");
    {
        let sink = file_sink(&path, QueueConfig::default());
        for i in 0..50 {
            sink.submit(record(Level::Info, format!("r{i}"))).unwrap();
        }
    }
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 50);
}

/// Renders the text, except for `"boom"`, which it refuses by panicking.
#[derive(Debug)]
struct Fragile;

impl Formatter for Fragile {
    fn format(&self, record: &Record) -> String {
        assert!(record.text != "boom", "formatter cannot render boom");
        record.text.clone()
    }
}

#[test]
fn panicking_formatter_fails_the_sink_without_hanging() {
    let (sink, buf) = memory_sink(QueueConfig::default().capacity(4));
    sink.set_formatter(Arc::new(Fragile));

    sink.submit(record(Level::Info, "before")).unwrap();
    sink.submit(record(Level::Info, "boom")).unwrap();

    // The flush ack still arrives, carrying the failure
    assert!(matches!(sink.flush(), Err(Error::SinkFailed(_))));
    assert!(matches!(sink.status(), SinkStatus::Failed(_)));

    // A full queue of Block producers would otherwise wait forever
    for i in 0..20 {
        let err = sink.submit(record(Level::Info, format!("after-{i}"))).unwrap_err();
        assert!(matches!(err, Error::SinkFailed(_)));
    }
    assert!(matches!(sink.close(), Err(Error::SinkFailed(_))));

    assert_eq!(buf.contents(), "before\n");
    let stats = sink.stats();
    assert_eq!(stats.written, 1);
    assert_eq!(stats.failed, 21);
}
