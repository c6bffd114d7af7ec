/// Related-videos lookup tests.
///
/// Drives `display_top_videos` end to end against in-memory sources: the
/// backend body is served in fixed-size chunks so that records straddle
/// read boundaries the way they do on a real connection.
use std::cell::Cell;
use std::io::{self, Read};

use tubeseo::api::{EventBody, SeoSource};
use tubeseo::diagnostics::{DiagnosticKind, Recorder};
use tubeseo::error::FetchError;
use tubeseo::render::{Region, RegionName, Surface};
use tubeseo::stream::{EventStream, TopVideosOutcome, TopVideosScan, display_top_videos, scan_top_videos};

// ---------------------------------------------------------------------------
// Test sources
// ---------------------------------------------------------------------------

/// Serves a fixed body at most `chunk` bytes per read, then optionally fails.
struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    fail_at_end: bool,
}

impl ChunkedReader {
    fn new(body: &str, chunk: usize) -> Self {
        Self {
            data: body.as_bytes().to_vec(),
            pos: 0,
            chunk,
            fail_at_end: false,
        }
    }

    fn failing_after(body: &str, chunk: usize) -> Self {
        Self {
            fail_at_end: true,
            ..Self::new(body, chunk)
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            if self.fail_at_end {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
            }
            return Ok(0);
        }
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// A backend that always answers with the same body.
struct FixedSource {
    body: String,
    chunk: usize,
    opened: Cell<usize>,
}

impl FixedSource {
    fn new(body: &str, chunk: usize) -> Self {
        Self {
            body: body.to_string(),
            chunk,
            opened: Cell::new(0),
        }
    }
}

impl SeoSource for FixedSource {
    fn open_generate_stream(&self, _keyword: &str) -> Result<EventBody, FetchError> {
        self.opened.set(self.opened.get() + 1);
        Ok(Box::new(ChunkedReader::new(&self.body, self.chunk)))
    }
}

/// A backend that cannot be reached.
struct DownSource;

impl SeoSource for DownSource {
    fn open_generate_stream(&self, _keyword: &str) -> Result<EventBody, FetchError> {
        Err(FetchError::Transport {
            url: "http://127.0.0.1:5000/api/seo/generate".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

const THREE_VIDEOS: &str = concat!(
    r#"{"type":"titles","data":["a","b"]}"#,
    "\n",
    r#"{"type":"top_videos","data":[{"url":"https://y/1","title":"One"},{"url":"https://y/2","title":"Two"},{"url":"https://y/3","title":"Three"}]}"#,
    "\n",
);

fn lookup(source: &dyn SeoSource, region: &mut Region, recorder: &Recorder) -> TopVideosOutcome {
    display_top_videos(source, "cats", region, 4096, recorder)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn renders_one_link_per_video_in_order() {
    let source = FixedSource::new(THREE_VIDEOS, 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    let outcome = lookup(&source, &mut region, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::Rendered(3)));
    let html = region.markup();
    assert!(html.contains("Top Related Videos"));
    assert_eq!(html.matches("<a href=").count(), 3);
    assert_eq!(html.matches("target=\"_blank\"").count(), 3);
    let one = html.find(">One</a>").unwrap();
    let two = html.find(">Two</a>").unwrap();
    let three = html.find(">Three</a>").unwrap();
    assert!(one < two && two < three);
    assert!(html.contains("href=\"https://y/2\""));
}

#[test]
fn appends_after_existing_content() {
    let source = FixedSource::new(THREE_VIDEOS, 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();
    region.replace("<p>earlier</p>\n");

    lookup(&source, &mut region, &recorder);

    assert!(region.markup().starts_with("<p>earlier</p>"));
    assert!(region.markup().contains("Top Related Videos"));
}

#[test]
fn missing_record_shows_no_results_notice() {
    let body = "{\"type\":\"titles\",\"data\":[\"a\"]}\n{\"type\":\"tags\",\"data\":[\"b\"]}\n";
    let source = FixedSource::new(body, 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    let outcome = lookup(&source, &mut region, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::NoResults));
    assert!(region.markup().contains("No related videos found."));
    assert!(!region.markup().contains("<a "));
    assert!(
        recorder
            .recorded()
            .iter()
            .any(|e| e.kind == DiagnosticKind::EmptyResult)
    );
}

#[test]
fn empty_list_shows_no_results_notice() {
    let source = FixedSource::new("{\"type\":\"top_videos\",\"data\":[]}\n", 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    let outcome = lookup(&source, &mut region, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::NoResults));
    assert!(region.markup().contains("No related videos found."));
}

#[test]
fn malformed_line_is_skipped_and_later_record_found() {
    let body = concat!(
        "this is not json\n",
        r#"{"type":"top_videos","data":[{"url":"https://y/1","title":"Only"}]}"#,
        "\n"
    );
    let source = FixedSource::new(body, 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    let outcome = lookup(&source, &mut region, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::Rendered(1)));
    assert!(region.markup().contains(">Only</a>"));
    let recorded = recorder.recorded();
    assert_eq!(recorded[0].kind, DiagnosticKind::DecodeError);
    assert_eq!(recorded[0].line.as_deref(), Some("this is not json"));
}

#[test]
fn record_split_across_chunks_is_found() {
    let body = concat!(
        r#"{"type":"top_videos","data":[{"url":"https://y/1","title":"Café ☕ crème"}]}"#,
        "\n"
    );
    for chunk in [1, 2, 3, 7, 16] {
        let source = FixedSource::new(body, chunk);
        let recorder = Recorder::in_memory();
        let mut region = Region::default();

        let outcome = display_top_videos(&source, "cats", &mut region, chunk, &recorder);

        assert!(matches!(outcome, TopVideosOutcome::Rendered(1)), "chunk size {chunk}");
        assert!(region.markup().contains("Café ☕ crème"), "chunk size {chunk}");
        assert!(recorder.recorded().is_empty(), "chunk size {chunk}");
    }
}

#[test]
fn last_record_without_trailing_newline_is_found() {
    let body = r#"{"type":"top_videos","data":[{"url":"https://y/1","title":"Tail"}]}"#;
    let source = FixedSource::new(body, 5);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    let outcome = display_top_videos(&source, "cats", &mut region, 5, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::Rendered(1)));
}

#[test]
fn video_text_is_escaped() {
    let body = r#"{"type":"top_videos","data":[{"url":"https://y/?a=1&b=2","title":"<script>x</script>"}]}"#;
    let source = FixedSource::new(body, 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    lookup(&source, &mut region, &recorder);

    assert!(region.markup().contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(region.markup().contains("href=\"https://y/?a=1&amp;b=2\""));
    assert!(!region.markup().contains("<script>"));
}

#[test]
fn video_without_url_is_listed_as_text() {
    let body = r#"{"type":"top_videos","data":[{"url":null,"title":"No link"}]}"#;
    let source = FixedSource::new(body, 4096);
    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    lookup(&source, &mut region, &recorder);

    assert!(region.markup().contains("<li>No link</li>"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn transport_failure_replaces_region_with_error_notice() {
    let recorder = Recorder::in_memory();
    let mut region = Region::default();
    region.replace("<p>stale results</p>\n");

    let outcome = lookup(&DownSource, &mut region, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::Failed(FetchError::Transport { .. })));
    let html = region.markup();
    assert!(html.starts_with("<div class=\"error\">Error fetching top videos: "));
    assert!(html.contains("connection refused"));
    assert!(!html.contains("stale results"));
    assert_eq!(recorder.recorded()[0].kind, DiagnosticKind::TransportError);
}

#[test]
fn read_failure_before_record_is_reported() {
    struct Flaky;
    impl SeoSource for Flaky {
        fn open_generate_stream(&self, _keyword: &str) -> Result<EventBody, FetchError> {
            Ok(Box::new(ChunkedReader::failing_after(
                "{\"type\":\"titles\",\"data\":[\"a\"]}\n",
                8,
            )))
        }
    }

    let recorder = Recorder::in_memory();
    let mut region = Region::default();

    let outcome = lookup(&Flaky, &mut region, &recorder);

    assert!(matches!(outcome, TopVideosOutcome::Failed(FetchError::Read(_))));
    assert!(region.markup().contains("connection reset"));
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

#[test]
fn scan_stops_at_first_record() {
    // The reader fails once the first line has been served; a scan that kept
    // reading past the record would surface that error.
    let first = concat!(
        r#"{"type":"top_videos","data":[{"url":"https://y/1","title":"First"}]}"#,
        "\n"
    );
    let reader = ChunkedReader::failing_after(first, first.len());
    let recorder = Recorder::in_memory();

    let scan = scan_top_videos(EventStream::with_chunk_size(reader, first.len()), &recorder).unwrap();

    assert_eq!(scan.videos().len(), 1);
    assert_eq!(scan.videos()[0].title, "First");
}

#[test]
fn first_record_wins_even_if_empty() {
    let body = concat!(
        r#"{"type":"top_videos","data":[]}"#,
        "\n",
        r#"{"type":"top_videos","data":[{"url":"https://y/1","title":"Late"}]}"#,
        "\n"
    );
    let recorder = Recorder::in_memory();

    let scan = scan_top_videos(EventStream::new(ChunkedReader::new(body, 4096)), &recorder).unwrap();

    assert_eq!(scan, TopVideosScan::Found(Vec::new()));
}

#[test]
fn content_field_is_accepted_like_data() {
    let body = r#"{"type":"top_videos","content":[{"url":"https://y/1","title":"Named content"}]}"#;
    let recorder = Recorder::in_memory();

    let scan = scan_top_videos(EventStream::new(ChunkedReader::new(body, 4096)), &recorder).unwrap();

    assert_eq!(scan.videos()[0].title, "Named content");
}

#[test]
fn non_object_lines_are_not_events() {
    let body = concat!(
        r#"["top_videos", [{"title":"A","url":"u"}]]"#,
        "\n",
        "42\n",
        r#""top_videos""#,
        "\n"
    );
    let recorder = Recorder::in_memory();

    let scan = scan_top_videos(EventStream::new(ChunkedReader::new(body, 4096)), &recorder).unwrap();

    assert_eq!(scan, TopVideosScan::NotFound);
    let recorded = recorder.recorded();
    assert_eq!(recorded.len(), 3);
    assert!(recorded.iter().all(|e| e.kind == DiagnosticKind::DecodeError));
}

#[test]
fn record_with_both_payload_fields_uses_data() {
    let body = concat!(
        r#"{"type":"top_videos","data":[{"title":"A","url":"u"}],"content":"x"}"#,
        "\n"
    );
    let recorder = Recorder::in_memory();

    let scan = scan_top_videos(EventStream::new(ChunkedReader::new(body, 4096)), &recorder).unwrap();

    assert_eq!(scan.videos().len(), 1);
    assert_eq!(scan.videos()[0].url, "u");
    assert!(recorder.recorded().is_empty());
}

#[test]
fn lookup_opens_one_stream_per_call() {
    let source = FixedSource::new(THREE_VIDEOS, 4096);
    let recorder = Recorder::disabled();
    let mut surface = Surface::new();

    lookup(&source, surface.region_mut(RegionName::TopVideos), &recorder);

    assert_eq!(source.opened.get(), 1);
    assert!(surface.markup(RegionName::Titles).is_empty());
}
