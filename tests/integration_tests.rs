//! Integration tests for the log stream
//!
//! These tests verify:
//! - Level filtering and the returned emission decision
//! - JSON line format and field merging
//! - Reopen to files, handles and unwritable paths
//! - Configuration at creation time
//! - Writer-attached dispatch inside a tokio runtime

use rust_log_stream::core::timestamp::parse_timestamp;
use rust_log_stream::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn read_events(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Each line should be valid JSON"))
        .collect()
}

#[test]
fn test_log_levels() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("levels_test.log");
    let stream = LogStream::builder().file(&log_file).build();

    assert!(!stream.debug_with("some debug info", json!({"foo": "bar"})));
    assert!(stream.info_with("some info", json!({"foo": "bar"})));
    assert!(stream.warn_with("a warning", json!({"foo": "bar"})));
    assert!(stream.error_with("an error", json!({"foo": "bar"})));
    assert!(stream.fatal_with("something exploded", json!({"foo": "bar"})));

    stream.set_level(LogLevel::Debug);
    assert!(stream.debug_with("some debug info", json!({"foo": "bar"})));
    assert!(stream.info_with("some info", json!({"foo": "bar"})));

    stream.set_level(LogLevel::Warn);
    assert!(!stream.info_with("some info", json!({"foo": "bar"})));
    assert!(stream.warn_with("a warning", json!({"foo": "bar"})));

    let levels: Vec<String> = read_events(&log_file)
        .iter()
        .map(|event| event["level"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        levels,
        vec!["info", "warn", "error", "fatal", "debug", "info", "warn"]
    );
}

#[test]
fn test_event_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("format_test.log");
    let stream = LogStream::builder().file(&log_file).build();

    stream.info_with("some info", json!({"foo": "bar", "nested": {"a": [1, 2]}}));

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.starts_with("{\"timestamp\":\""));
    assert!(content.contains("\"level\":\"info\",\"message\":\"some info\",\"foo\":\"bar\""));

    let events = read_events(&log_file);
    let timestamp = events[0]["timestamp"].as_str().unwrap();
    assert!(parse_timestamp(timestamp).is_some(), "bad timestamp {}", timestamp);
    assert_eq!(events[0]["nested"]["a"][1], 2);
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");
    let stream = LogStream::builder().file(&log_file).build();

    stream.info("User login\n{\"level\":\"error\",\"message\":\"fake\"}\nINFO Continuation");

    let events = read_events(&log_file);
    assert_eq!(events.len(), 1, "Log should be a single line, not multiple");
    assert_eq!(events[0]["level"], "info");
}

#[test]
fn test_reopen_redirects_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("reopen_test.log");
    let buf = SharedBuf::default();
    let stream = LogStream::builder()
        .output(ReopenTarget::handle(buf.clone()))
        .build();

    stream.reopen(&log_file);
    assert!(stream.info_with("some info", json!({"foo": "bar"})));
    stream.reopen(ReopenTarget::handle(buf.clone()));

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("timestamp"));
    assert!(content.contains("\"message\":\"some info\""));
    assert!(content.contains("\"foo\":\"bar\""));

    stream.reopen("/nonexistent-log-dir/untouchable.log");
    assert!(stream.info_with("some info", json!({"foo": "bar"})));

    let captured = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    let events: Vec<Value> = captured
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["level"], "error");
    assert_eq!(events[0]["log_file"], "/nonexistent-log-dir/untouchable.log");
    assert_eq!(events[1]["message"], "some info");

    // The file saw exactly one event
    assert_eq!(read_events(&log_file).len(), 1);
}

#[test]
fn test_reopen_appends_to_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("append_test.log");
    fs::write(&log_file, "{\"message\":\"existing\"}\n").unwrap();

    let stream = LogStream::builder().file(&log_file).build();
    stream.warn("appended");

    let events = read_events(&log_file);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["message"], "existing");
    assert_eq!(events[1]["message"], "appended");
}

#[test]
fn test_setup_with_level_and_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("setup_test.log");

    let config: StreamConfig = serde_json::from_value(json!({
        "level": "warn",
        "file": log_file,
    }))
    .unwrap();
    let stream = LogStream::setup(config);

    assert!(!stream.info_with("some info", json!({"foo": "bar"})));
    assert!(stream.warn_with("a warning", json!({"foo": "bar"})));
    assert!(fs::read_to_string(&log_file).unwrap().contains("a warning"));

    stream.reopen(ReopenTarget::handle(io::sink()));
    assert!(stream.warn_with("a warning", json!({"foo": "bar"})));
    assert_eq!(read_events(&log_file).len(), 1);
}

#[test]
fn test_setup_with_unwritable_file_keeps_stdout() {
    let stream = LogStream::setup(
        StreamConfig::new().with_file("/nonexistent-log-dir/untouchable.log"),
    );
    assert_eq!(stream.log_file(), None);
    assert_eq!(stream.metrics().emitted(), 1, "the reopen failure is self-reported");
}

#[tokio::test]
async fn test_operates_within_runtime() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("runtime_test.log");
    let stream = LogStream::builder().file(&log_file).build();
    let writer = stream.start_writer().expect("Failed to start writer");

    assert!(!stream.debug_with("some debug info", json!({"foo": "bar"})));
    assert!(stream.info_with("some info", json!({"foo": "bar"})));
    assert!(stream.warn_with("a warning", json!({"foo": "bar"})));
    assert!(stream.error_with("an error", json!({"foo": "bar"})));

    tokio::time::sleep(Duration::from_millis(50)).await;
    writer.shutdown().await.expect("Failed to shut down writer");

    let parsed: Vec<Value> = read_events(&log_file)
        .into_iter()
        .map(|mut event| {
            event.as_object_mut().unwrap().remove("timestamp");
            event
        })
        .collect();
    assert_eq!(
        parsed,
        vec![
            json!({"level": "info", "message": "some info", "foo": "bar"}),
            json!({"level": "warn", "message": "a warning", "foo": "bar"}),
            json!({"level": "error", "message": "an error", "foo": "bar"}),
        ]
    );
}

#[tokio::test]
async fn test_reopen_while_writer_attached() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = temp_dir.path().join("first.log");
    let second = temp_dir.path().join("second.log");
    let stream = LogStream::builder().file(&first).build();
    let writer = stream.start_writer().unwrap();

    stream.info("to first");
    while stream.metrics().written() < 1 {
        tokio::task::yield_now().await;
    }
    stream.reopen(&second);
    stream.info("to second");
    writer.shutdown().await.unwrap();

    assert_eq!(read_events(&first).len(), 1);
    assert_eq!(read_events(&second)[0]["message"], "to second");
}

#[test]
fn test_mirror_writes_to_current_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("mirror_test.log");
    let stream = LogStream::builder().file(&log_file).build();

    let mut mirror = stream.mirror();
    writeln!(mirror, "panic output").unwrap();
    stream.info("structured");

    let content = fs::read_to_string(&log_file).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("panic output"));
    assert!(lines.next().unwrap().contains("structured"));
}

#[test]
fn test_concurrent_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent_test.log");
    let stream = LogStream::builder().file(&log_file).build();

    let mut handles = vec![];
    for thread_id in 0..5 {
        let stream = Arc::clone(&stream);
        handles.push(std::thread::spawn(move || {
            for i in 0..10 {
                stream.info(format!("Thread {} - Message {}", thread_id, i));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(read_events(&log_file).len(), 50);
}
