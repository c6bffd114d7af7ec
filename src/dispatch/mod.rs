//! Event dispatcher — map one tagged SEO event to a region update.
//!
//! Every recognized tag replaces exactly one region of the [`Surface`]. The
//! only tag that performs I/O is `top_videos` with a keyword payload, which
//! delegates to the stream consumer. Unknown tags and malformed payloads are
//! recorded and otherwise ignored; dispatch never fails.

pub mod session;

use crate::api::SeoSource;
use crate::diagnostics::Recorder;
use crate::events::{EventError, RawEvent, SeoEvent, TopVideosPayload};
use crate::render::html;
use crate::render::{RegionName, Surface};
use crate::stream::{self, TopVideosOutcome, TopVideosScan};

/// What a single dispatch did.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The region was replaced.
    Rendered(RegionName),
    /// A top-videos lookup ran against the top-videos region.
    TopVideos(TopVideosOutcome),
    /// The tag is not one we render.
    Ignored { tag: String },
    /// The tag is known but its payload had the wrong shape.
    Rejected { tag: String, reason: String },
}

/// Renders events into a surface.
pub struct Dispatcher<'a> {
    source: &'a dyn SeoSource,
    recorder: &'a Recorder,
    chunk_size: usize,
}

impl<'a> Dispatcher<'a> {
    pub fn new(source: &'a dyn SeoSource, recorder: &'a Recorder) -> Self {
        Self {
            source,
            recorder,
            chunk_size: stream::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Read size for delegated top-videos lookups.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Decode `raw` and render it into `surface`.
    pub fn dispatch(&self, raw: &RawEvent, surface: &mut Surface) -> DispatchOutcome {
        match SeoEvent::decode(raw) {
            Ok(event) => self.render(event, surface),
            Err(EventError::Unrecognized(tag)) => {
                self.recorder.unrecognized_event(&tag);
                DispatchOutcome::Ignored { tag }
            }
            Err(EventError::Payload { tag, reason }) => {
                self.recorder.rejected_event(&tag, &reason);
                DispatchOutcome::Rejected { tag, reason }
            }
        }
    }

    /// Render an already-decoded event.
    pub fn render(&self, event: SeoEvent, surface: &mut Surface) -> DispatchOutcome {
        let name = RegionName::for_event(event.kind());

        let markup = match event {
            SeoEvent::Titles(titles) => {
                html::heading_list("Title Suggestions", "seo-titles-list", &titles)
            }
            SeoEvent::SelectedTitle(title) => {
                html::heading_block("Selected Title", "seo-selected-title", &title)
            }
            SeoEvent::Description(text) => {
                html::heading_block("Description", "seo-description", &text)
            }
            SeoEvent::Tags(tags) => html::heading_block("Tags", "seo-tags", &tags.join(", ")),
            SeoEvent::Hashtags(tags) => {
                html::heading_block("Hashtags", "seo-hashtags", &tags.join(" "))
            }
            SeoEvent::Score(score) => {
                html::heading_block("SEO Score", "seo-score", &format!("{score}/100"))
            }
            SeoEvent::Analytics(text) => {
                html::heading_block("Analytics Insights", "seo-analytics", &text)
            }
            SeoEvent::TopVideos(TopVideosPayload::Keyword(keyword)) => {
                let region = surface.region_mut(name);
                return DispatchOutcome::TopVideos(stream::display_top_videos(
                    self.source,
                    &keyword,
                    region,
                    self.chunk_size,
                    self.recorder,
                ));
            }
            SeoEvent::TopVideos(TopVideosPayload::Videos(videos)) => {
                let region = surface.region_mut(name);
                region.replace(String::new());
                return DispatchOutcome::TopVideos(stream::render_scan(
                    &TopVideosScan::Found(videos),
                    "",
                    region,
                    self.recorder,
                ));
            }
        };

        surface.region_mut(name).replace(markup);
        DispatchOutcome::Rendered(name)
    }
}
