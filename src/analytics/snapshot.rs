use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot (POST /api/analytics response)
// ---------------------------------------------------------------------------

/// The full set of computed metrics for a set of videos and a date range.
///
/// Every field defaults when absent, so a partial response still renders.
/// A snapshot is replaced wholesale on each fetch; nothing is merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub video_performance: Vec<VideoStat>,
    pub keyword_performance: Vec<KeywordStat>,
    pub title_effectiveness: Vec<TitleStat>,
    pub views_over_time: Vec<ViewsPoint>,
    pub engagement_metrics: EngagementMetrics,
}

/// Per-video performance row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoStat {
    pub video_id: String,
    pub title: String,
    pub views: u64,
    /// Click-through rate as a fraction (0.05 = 5%).
    pub ctr: f64,
    /// Average watch time in seconds.
    pub avg_watch_time: f64,
    pub seo_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordStat {
    pub keyword: String,
    pub ctr: f64,
    /// Seconds.
    pub avg_watch_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleStat {
    pub title: String,
    pub impressions: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsPoint {
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementMetrics {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
}

// ---------------------------------------------------------------------------
// Video list (GET /api/videos response)
// ---------------------------------------------------------------------------

/// An entry of the selectable video list. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Video ids arrive as strings or numbers depending on the backend.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Query (POST /api/analytics request)
// ---------------------------------------------------------------------------

/// Request body for `POST /api/analytics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub video_ids: Vec<String>,
    #[serde(serialize_with = "ymd")]
    pub start_date: NaiveDate,
    #[serde(serialize_with = "ymd")]
    pub end_date: NaiveDate,
}

fn ymd<S: serde::Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

impl AnalyticsQuery {
    /// Query the last `days` days ending on `today` (inclusive).
    pub fn last_days(video_ids: Vec<String>, today: NaiveDate, days: u32) -> Self {
        Self {
            video_ids,
            start_date: today - Duration::days(i64::from(days)),
            end_date: today,
        }
    }

    /// Build a query from optional `YYYY-MM-DD` bounds.
    ///
    /// A missing start defaults to `default_days` before the end; a missing
    /// end defaults to `today`.
    pub fn from_bounds(
        video_ids: Vec<String>,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        default_days: u32,
    ) -> anyhow::Result<Self> {
        let end_date = match end {
            Some(s) => parse_date(s)?,
            None => today,
        };
        let start_date = match start {
            Some(s) => parse_date(s)?,
            None => end_date - Duration::days(i64::from(default_days)),
        };
        if start_date > end_date {
            anyhow::bail!("start date {start_date} is after end date {end_date}");
        }
        Ok(Self {
            video_ids,
            start_date,
            end_date,
        })
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}
