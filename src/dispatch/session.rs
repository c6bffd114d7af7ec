//! Full generation session: stream every event of one keyword into a surface.

use crate::api::SeoSource;
use crate::diagnostics::Recorder;
use crate::error::FetchError;
use crate::render::html;
use crate::render::{RegionName, Surface};
use crate::stream::{EventStream, StreamItem};

use super::{DispatchOutcome, Dispatcher};

/// Counters for one session, for terminal summaries and tests.
#[derive(Debug, Default)]
pub struct SessionReport {
    pub rendered: usize,
    pub ignored: usize,
    pub rejected: usize,
    pub malformed: usize,
    /// The failure that ended the session early, if any.
    pub error: Option<FetchError>,
}

impl SessionReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Open the generation stream for `keyword` and dispatch each event, in
/// arrival order, into `surface`.
///
/// A transport or read failure stops the session and replaces the status
/// region with an error notice; regions rendered before the failure keep
/// their content.
pub fn run_generate(
    source: &dyn SeoSource,
    keyword: &str,
    surface: &mut Surface,
    recorder: &Recorder,
    chunk_size: usize,
) -> SessionReport {
    let mut report = SessionReport::default();
    let dispatcher = Dispatcher::new(source, recorder).with_chunk_size(chunk_size);

    let body = match source.open_generate_stream(keyword) {
        Ok(body) => body,
        Err(err) => {
            fail(surface, recorder, &mut report, err);
            return report;
        }
    };

    for item in EventStream::with_chunk_size(body, chunk_size) {
        match item {
            Ok(StreamItem::Event(event)) => match dispatcher.dispatch(&event, surface) {
                DispatchOutcome::Rendered(_) | DispatchOutcome::TopVideos(_) => {
                    report.rendered += 1
                }
                DispatchOutcome::Ignored { .. } => report.ignored += 1,
                DispatchOutcome::Rejected { .. } => report.rejected += 1,
            },
            Ok(StreamItem::Malformed { line, error }) => {
                recorder.decode_error(&line, &error);
                report.malformed += 1;
            }
            Err(err) => {
                fail(surface, recorder, &mut report, err);
                break;
            }
        }
    }

    report
}

fn fail(surface: &mut Surface, recorder: &Recorder, report: &mut SessionReport, err: FetchError) {
    recorder.transport_error(&err);
    surface
        .region_mut(RegionName::Status)
        .replace(html::error_notice("Error generating SEO content", &err.to_string()));
    report.error = Some(err);
}
