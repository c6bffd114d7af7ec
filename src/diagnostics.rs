//! Diagnostic event log — records everything that was absorbed silently.
//!
//! Stream-level problems never reach the user: a malformed line is skipped,
//! an unknown event tag is ignored, an empty lookup shows a neutral notice.
//! Each of those is recorded here so that they can be inspected later with
//! `tubeseo diagnostics`.
//!
//! Log file: `~/.tubeseo/diagnostics.jsonl` (configurable via `[logging]`).
//! Writing is best-effort — failures are silently ignored.

use std::cell::RefCell;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// What kind of problem was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    DecodeError,
    UnrecognizedEvent,
    RejectedEvent,
    TransportError,
    EmptyResult,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecodeError => write!(f, "decode_error"),
            Self::UnrecognizedEvent => write!(f, "unrecognized_event"),
            Self::RejectedEvent => write!(f, "rejected_event"),
            Self::TransportError => write!(f, "transport_error"),
            Self::EmptyResult => write!(f, "empty_result"),
        }
    }
}

/// One line of the diagnostic log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub timestamp: String,
    pub kind: DiagnosticKind,
    pub detail: String,
    /// The offending stream line, truncated (decode errors only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<String>,
}

/// Longest stream line excerpt kept in a decode-error entry.
const MAX_LINE_EXCERPT: usize = 200;

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Sink {
    Disabled,
    File(PathBuf),
    Memory(RefCell<Vec<DiagnosticEvent>>),
}

/// Destination for diagnostic events, passed to the stream consumer and the
/// dispatcher.
#[derive(Debug)]
pub struct Recorder {
    sink: Sink,
}

impl Recorder {
    /// Build a recorder from the resolved `[logging]` section.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        match config.resolved_path() {
            Some(path) => Self::to_file(path),
            None => Self::disabled(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            sink: Sink::Disabled,
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            sink: Sink::File(path.into()),
        }
    }

    /// Keep events in memory instead of writing them out.
    pub fn in_memory() -> Self {
        Self {
            sink: Sink::Memory(RefCell::new(Vec::new())),
        }
    }

    /// Events captured by an in-memory recorder (empty for other sinks).
    pub fn recorded(&self) -> Vec<DiagnosticEvent> {
        match &self.sink {
            Sink::Memory(events) => events.borrow().clone(),
            _ => Vec::new(),
        }
    }

    pub fn decode_error(&self, line: &str, error: &str) {
        let excerpt: String = line.chars().take(MAX_LINE_EXCERPT).collect();
        self.record(DiagnosticKind::DecodeError, error.to_string(), Some(excerpt));
    }

    pub fn unrecognized_event(&self, tag: &str) {
        self.record(
            DiagnosticKind::UnrecognizedEvent,
            format!("unknown SEO data type: {tag}"),
            None,
        );
    }

    pub fn rejected_event(&self, tag: &str, reason: &str) {
        self.record(DiagnosticKind::RejectedEvent, format!("{tag}: {reason}"), None);
    }

    pub fn transport_error(&self, error: &dyn std::fmt::Display) {
        self.record(DiagnosticKind::TransportError, error.to_string(), None);
    }

    pub fn empty_result(&self, keyword: &str) {
        self.record(
            DiagnosticKind::EmptyResult,
            format!("no related videos for '{keyword}'"),
            None,
        );
    }

    fn record(&self, kind: DiagnosticKind, detail: String, line: Option<String>) {
        let event = DiagnosticEvent {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            detail,
            line,
        };
        match &self.sink {
            Sink::Disabled => {}
            Sink::File(path) => {
                let _ = append_event(path, &event);
            }
            Sink::Memory(events) => events.borrow_mut().push(event),
        }
    }
}

fn append_event(path: &Path, event: &DiagnosticEvent) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read the last `limit` entries of a diagnostic log, oldest first.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_recent(path: &Path, limit: usize) -> Vec<DiagnosticEvent> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let entries: Vec<DiagnosticEvent> = BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect();

    let skip = entries.len().saturating_sub(limit);
    entries.into_iter().skip(skip).collect()
}

/// Default log location: `~/.tubeseo/diagnostics.jsonl`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tubeseo").join("diagnostics.jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_recorder_keeps_nothing() {
        let recorder = Recorder::disabled();
        recorder.unrecognized_event("foo");
        assert!(recorder.recorded().is_empty());
    }

    #[test]
    fn memory_recorder_captures_kinds() {
        let recorder = Recorder::in_memory();
        recorder.decode_error("{oops", "expected value");
        recorder.unrecognized_event("foo");
        let events = recorder.recorded();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, DiagnosticKind::DecodeError);
        assert_eq!(events[0].line.as_deref(), Some("{oops"));
        assert!(events[1].detail.contains("foo"));
    }

    #[test]
    fn decode_error_truncates_long_lines() {
        let recorder = Recorder::in_memory();
        recorder.decode_error(&"x".repeat(1000), "bad");
        let line = recorder.recorded()[0].line.clone().unwrap();
        assert_eq!(line.len(), MAX_LINE_EXCERPT);
    }

    #[test]
    fn file_recorder_round_trips_through_read_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("diag.jsonl");
        let recorder = Recorder::to_file(&path);
        recorder.unrecognized_event("a");
        recorder.unrecognized_event("b");
        recorder.empty_result("cats");

        let recent = read_recent(&path, 2);
        assert_eq!(recent.len(), 2);
        assert!(recent[0].detail.contains("b"));
        assert_eq!(recent[1].kind, DiagnosticKind::EmptyResult);
    }

    #[test]
    fn read_recent_missing_file_is_empty() {
        assert!(read_recent(Path::new("/nonexistent/tubeseo/diag.jsonl"), 10).is_empty());
    }
}
