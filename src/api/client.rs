/// Backend HTTP client.
///
/// Uses the synchronous `ureq` client. A client is cheap: it holds the base
/// URL and timeout and is created per command invocation (or per dashboard
/// request) from the resolved [`ApiConfig`].
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{EventBody, SeoSource};
use crate::analytics::{AnalyticsQuery, AnalyticsSnapshot, VideoSummary};
use crate::config::schema::ApiConfig;
use crate::error::FetchError;

/// Timeout for the reachability probe, independent of the request timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body for `POST /api/seo/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    keyword: &'a str,
}

/// Synchronous client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the backend answers `GET /api/videos` with a 2xx.
    pub fn is_reachable(&self) -> bool {
        let url = self.url("/api/videos");
        ureq::get(&url).timeout(HEALTH_TIMEOUT).call().is_ok()
    }

    /// `GET /api/videos` — the videos available for analysis.
    pub fn list_videos(&self) -> Result<Vec<VideoSummary>, FetchError> {
        let url = self.url("/api/videos");
        let resp = ureq::get(&url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| FetchError::from_ureq(&url, e))?;
        decode_json(&url, resp)
    }

    /// `POST /api/analytics` — a complete snapshot for the query.
    pub fn fetch_analytics(&self, query: &AnalyticsQuery) -> Result<AnalyticsSnapshot, FetchError> {
        let url = self.url("/api/analytics");
        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(query)
            .map_err(|e| FetchError::from_ureq(&url, e))?;
        decode_json(&url, resp)
    }

    fn url(&self, path: &str) -> String {
        let url = format!("{}{}", self.base_url, path);
        // On Windows, "localhost" may try IPv6 (::1) first, causing delays
        // when the backend only binds to IPv4.
        url.replace("://localhost", "://127.0.0.1")
    }
}

impl SeoSource for ApiClient {
    /// `POST /api/seo/generate` — returns the unread body.
    ///
    /// The timeout applies to the whole exchange, including reading the
    /// stream.
    fn open_generate_stream(&self, keyword: &str) -> Result<EventBody, FetchError> {
        let url = self.url("/api/seo/generate");
        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(GenerateRequest { keyword })
            .map_err(|e| FetchError::from_ureq(&url, e))?;
        Ok(resp.into_reader())
    }
}

fn decode_json<T: DeserializeOwned>(url: &str, resp: ureq::Response) -> Result<T, FetchError> {
    resp.into_json().map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Trim whitespace and trailing slashes so paths can be appended directly.
fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = ApiConfig::default();
        let client = ApiClient::from_config(&config);
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn client_strips_trailing_slashes() {
        let client = ApiClient::new(" http://example.test:8080// ", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://example.test:8080");
        assert_eq!(
            client.url("/api/videos"),
            "http://example.test:8080/api/videos"
        );
    }

    #[test]
    fn localhost_is_pinned_to_ipv4() {
        let client = ApiClient::new("http://localhost:5000", Duration::from_secs(1));
        assert_eq!(
            client.url("/api/seo/generate"),
            "http://127.0.0.1:5000/api/seo/generate"
        );
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        // port 9 (discard) is essentially never listening on loopback
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(500));
        match client.open_generate_stream("cats") {
            Err(FetchError::Transport { url, .. }) => {
                assert!(url.ends_with("/api/seo/generate"));
            }
            Err(other) => panic!("expected transport error, got {other}"),
            Ok(_) => panic!("expected transport error"),
        }
    }
}
