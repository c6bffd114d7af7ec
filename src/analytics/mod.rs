//! SEO analytics — snapshot fetch and derived report.
//!
//! - [`snapshot`]: wire types for `GET /api/videos` and `POST /api/analytics`
//! - [`report`]: chart series and the sortable performance table
//!
//! [`AnalyticsView`] holds the current snapshot for one dashboard view. Each
//! successful refresh replaces it wholesale; a failed refresh leaves the
//! previous snapshot in place.

pub mod report;
pub mod snapshot;

pub use snapshot::{
    AnalyticsQuery, AnalyticsSnapshot, EngagementMetrics, KeywordStat, TitleStat, VideoStat,
    VideoSummary, ViewsPoint,
};

use crate::api::ApiClient;
use crate::error::FetchError;

/// The analytics state behind one dashboard view.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsView {
    snapshot: AnalyticsSnapshot,
    query: Option<AnalyticsQuery>,
}

impl AnalyticsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &AnalyticsSnapshot {
        &self.snapshot
    }

    /// The query that produced the current snapshot, if any.
    pub fn query(&self) -> Option<&AnalyticsQuery> {
        self.query.as_ref()
    }

    /// Install a freshly fetched snapshot, discarding the previous one.
    pub fn replace(&mut self, query: AnalyticsQuery, snapshot: AnalyticsSnapshot) {
        self.query = Some(query);
        self.snapshot = snapshot;
    }

    /// Fetch a snapshot for `query` and install it.
    ///
    /// Nothing is fetched when the query selects no videos.
    pub fn refresh(&mut self, client: &ApiClient, query: AnalyticsQuery) -> Result<(), FetchError> {
        if query.video_ids.is_empty() {
            return Ok(());
        }
        let snapshot = client.fetch_analytics(&query)?;
        self.replace(query, snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(ids: &[&str]) -> AnalyticsQuery {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        AnalyticsQuery::last_days(ids.iter().map(|s| s.to_string()).collect(), today, 30)
    }

    #[test]
    fn replace_is_wholesale() {
        let mut view = AnalyticsView::new();
        view.replace(
            query(&["a"]),
            AnalyticsSnapshot {
                views_over_time: vec![ViewsPoint {
                    date: "2024-04-01".into(),
                    views: 5,
                }],
                engagement_metrics: EngagementMetrics {
                    likes: 3,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        view.replace(query(&["b"]), AnalyticsSnapshot::default());

        assert!(view.snapshot().views_over_time.is_empty());
        assert_eq!(view.snapshot().engagement_metrics.likes, 0);
        assert_eq!(view.query().unwrap().video_ids, vec!["b"]);
    }

    #[test]
    fn refresh_without_selection_is_a_noop() {
        let client = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_millis(100));
        let mut view = AnalyticsView::new();
        assert!(view.refresh(&client, query(&[])).is_ok());
        assert!(view.query().is_none());
    }
}
