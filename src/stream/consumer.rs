//! Incremental consumption of the newline-delimited event stream.
//!
//! [`EventStream`] wraps any [`Read`] (normally an HTTP response body) and
//! yields one [`StreamItem`] per non-empty line, in arrival order. It owns the
//! reader, so the body is released as soon as the stream is dropped, whether
//! the caller stops early, reaches the end, or hits an error.
//!
//! [`scan_top_videos`] is the "first match wins" lookup built on top of it.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use serde_json::Value;

use super::lines::LineBuffer;
use crate::diagnostics::Recorder;
use crate::error::FetchError;
use crate::events::{EventKind, RawEvent, VideoRef, video_list};

/// Read size used when the caller has no preference.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// One non-empty line of the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    Event(RawEvent),
    /// The line was not a JSON event object. Processing continues.
    Malformed { line: String, error: String },
}

/// Iterator over the events of a chunked body.
pub struct EventStream<R> {
    reader: R,
    lines: LineBuffer,
    ready: VecDeque<String>,
    chunk: Vec<u8>,
    chunks_read: usize,
    done: bool,
}

impl<R: Read> EventStream<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            lines: LineBuffer::new(),
            ready: VecDeque::new(),
            chunk: vec![0; chunk_size.max(1)],
            chunks_read: 0,
            done: false,
        }
    }

    /// Number of non-empty reads performed so far.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }
}

impl<R: Read> Iterator for EventStream<R> {
    type Item = Result<StreamItem, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(line) = self.ready.pop_front() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                return Some(Ok(parse_line(line)));
            }

            if self.done {
                return None;
            }

            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    self.done = true;
                    self.ready.extend(self.lines.finish());
                }
                Ok(n) => {
                    self.chunks_read += 1;
                    let completed = self.lines.push(&self.chunk[..n]);
                    self.ready.extend(completed);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(FetchError::Read(e)));
                }
            }
        }
    }
}

/// Only JSON objects are events; any other JSON value is malformed.
fn parse_line(line: &str) -> StreamItem {
    let malformed = |error: String| StreamItem::Malformed {
        line: line.to_string(),
        error,
    };
    match serde_json::from_str::<Value>(line) {
        Ok(value @ Value::Object(_)) => match serde_json::from_value::<RawEvent>(value) {
            Ok(event) => StreamItem::Event(event),
            Err(e) => malformed(e.to_string()),
        },
        Ok(_) => malformed("expected a JSON object".to_string()),
        Err(e) => malformed(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Top-videos lookup
// ---------------------------------------------------------------------------

/// Result of scanning a stream for the `top_videos` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopVideosScan {
    /// The record was found; the list may be empty.
    Found(Vec<VideoRef>),
    /// The stream ended without the record.
    NotFound,
}

impl TopVideosScan {
    /// The videos to show, treating "missing" and "empty" alike.
    pub fn videos(&self) -> &[VideoRef] {
        match self {
            Self::Found(videos) => videos,
            Self::NotFound => &[],
        }
    }
}

/// Read `stream` until the first `top_videos` record and stop.
///
/// Malformed lines are reported to `recorder` and skipped. A read failure
/// aborts the scan.
pub fn scan_top_videos<R: Read>(
    stream: EventStream<R>,
    recorder: &Recorder,
) -> Result<TopVideosScan, FetchError> {
    for item in stream {
        match item? {
            StreamItem::Malformed { line, error } => recorder.decode_error(&line, &error),
            StreamItem::Event(event) if event.tag == EventKind::TOP_VIDEOS_TAG => {
                return Ok(TopVideosScan::Found(top_videos_payload(&event.content, recorder)));
            }
            StreamItem::Event(_) => {}
        }
    }
    Ok(TopVideosScan::NotFound)
}

fn top_videos_payload(content: &Value, recorder: &Recorder) -> Vec<VideoRef> {
    match video_list(content) {
        Some(videos) => videos,
        None => {
            recorder.rejected_event(EventKind::TOP_VIDEOS_TAG, "expected a list of videos");
            Vec::new()
        }
    }
}
