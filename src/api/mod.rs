//! Backend HTTP API.
//!
//! The backend owns every endpoint; this crate only consumes them:
//!
//! - `GET  /api/videos` — selectable videos
//! - `POST /api/analytics` — one [`AnalyticsSnapshot`](crate::analytics::AnalyticsSnapshot)
//! - `POST /api/seo/generate` — chunked, newline-delimited SEO events
//!
//! [`SeoSource`] is the seam between the stream consumer and the network, so
//! the consumer can be driven by any byte source.

pub mod client;

use std::io::Read;

use crate::error::FetchError;

pub use client::ApiClient;

/// A body of newline-delimited events, read incrementally.
pub type EventBody = Box<dyn Read + Send>;

/// Something that can open the SEO generation stream for a keyword.
pub trait SeoSource {
    fn open_generate_stream(&self, keyword: &str) -> Result<EventBody, FetchError>;
}
