//! Stream consumer — find the related-videos record in the generation stream
//! and render it.
//!
//! The flow for one lookup:
//!
//! 1. Open `POST /api/seo/generate` for the keyword through a [`SeoSource`].
//! 2. Read the body chunk by chunk, reassembling lines across chunk
//!    boundaries ([`lines::LineBuffer`]).
//! 3. Skip (and record) lines that are not JSON.
//! 4. Stop at the first `top_videos` record.
//! 5. Render a link list, a "no results" notice, or an error notice into the
//!    target region.

pub mod consumer;
pub mod lines;

use crate::api::SeoSource;
use crate::diagnostics::Recorder;
use crate::error::FetchError;
use crate::render::Region;
use crate::render::html;

pub use consumer::{DEFAULT_CHUNK_SIZE, EventStream, StreamItem, TopVideosScan, scan_top_videos};

/// What a top-videos lookup ended up rendering.
#[derive(Debug)]
pub enum TopVideosOutcome {
    /// A link list with this many entries was appended.
    Rendered(usize),
    /// The record was missing or empty; the "no results" notice was appended.
    NoResults,
    /// The lookup failed; the region now holds only the error notice.
    Failed(FetchError),
}

/// Fetch the related videos for `keyword` and render them into `region`.
///
/// On success the result is appended after whatever the region already
/// holds. On failure the region's content is replaced by the error notice.
pub fn display_top_videos(
    source: &dyn SeoSource,
    keyword: &str,
    region: &mut Region,
    chunk_size: usize,
    recorder: &Recorder,
) -> TopVideosOutcome {
    let scan = source
        .open_generate_stream(keyword)
        .and_then(|body| scan_top_videos(EventStream::with_chunk_size(body, chunk_size), recorder));

    match scan {
        Ok(scan) => render_scan(&scan, keyword, region, recorder),
        Err(err) => {
            recorder.transport_error(&err);
            region.replace(html::error_notice("Error fetching top videos", &err.to_string()));
            TopVideosOutcome::Failed(err)
        }
    }
}

/// Render the outcome of a completed scan (found, empty, or missing).
pub fn render_scan(
    scan: &TopVideosScan,
    keyword: &str,
    region: &mut Region,
    recorder: &Recorder,
) -> TopVideosOutcome {
    let videos = scan.videos();
    if videos.is_empty() {
        recorder.empty_result(keyword);
        region.append(&html::no_videos_notice());
        TopVideosOutcome::NoResults
    } else {
        region.append(&html::top_videos_block(videos));
        TopVideosOutcome::Rendered(videos.len())
    }
}
