//! Analytics report — chart series and the performance table derived from a
//! snapshot.
//!
//! Provides:
//! - **Views over time**: one line series (date → views)
//! - **Keyword performance**: CTR % and average watch time in minutes
//! - **Title effectiveness**: impressions and clicks per (shortened) title
//! - **Engagement**: likes / comments / shares / saves slices
//! - **Performance table**: formatted rows, sortable by one numeric column

use std::cmp::Ordering;

use super::snapshot::{AnalyticsSnapshot, VideoStat};

/// Title length shown on chart axes before eliding.
const CHART_TITLE_CHARS: usize = 20;

/// Title length shown in the performance table before eliding.
const TABLE_TITLE_CHARS: usize = 40;

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// A named sequence of values aligned with a chart's labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// Labels plus one or more series.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl Chart {
    /// Largest value across all series (0.0 for an empty chart).
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

pub fn views_over_time(snapshot: &AnalyticsSnapshot) -> Chart {
    let points = &snapshot.views_over_time;
    Chart {
        title: "Views Over Time",
        labels: points.iter().map(|p| p.date.clone()).collect(),
        series: vec![Series {
            label: "Views",
            values: points.iter().map(|p| p.views as f64).collect(),
        }],
    }
}

pub fn keyword_performance(snapshot: &AnalyticsSnapshot) -> Chart {
    let rows = &snapshot.keyword_performance;
    Chart {
        title: "Keyword Performance",
        labels: rows.iter().map(|k| k.keyword.clone()).collect(),
        series: vec![
            Series {
                label: "CTR (%)",
                values: rows.iter().map(|k| k.ctr * 100.0).collect(),
            },
            Series {
                label: "Avg. Watch Time (min)",
                values: rows.iter().map(|k| k.avg_watch_time / 60.0).collect(),
            },
        ],
    }
}

pub fn title_effectiveness(snapshot: &AnalyticsSnapshot) -> Chart {
    let rows = &snapshot.title_effectiveness;
    Chart {
        title: "Title Effectiveness",
        labels: rows
            .iter()
            .map(|t| elide_always(&t.title, CHART_TITLE_CHARS))
            .collect(),
        series: vec![
            Series {
                label: "Impressions",
                values: rows.iter().map(|t| t.impressions as f64).collect(),
            },
            Series {
                label: "Clicks",
                values: rows.iter().map(|t| t.clicks as f64).collect(),
            },
        ],
    }
}

pub fn engagement(snapshot: &AnalyticsSnapshot) -> Chart {
    let m = snapshot.engagement_metrics;
    Chart {
        title: "Engagement Metrics",
        labels: ["Likes", "Comments", "Shares", "Saves"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        series: vec![Series {
            label: "Engagement",
            values: vec![
                m.likes as f64,
                m.comments as f64,
                m.shares as f64,
                m.saves as f64,
            ],
        }],
    }
}

/// All four charts in dashboard order.
pub fn charts(snapshot: &AnalyticsSnapshot) -> Vec<Chart> {
    vec![
        views_over_time(snapshot),
        keyword_performance(snapshot),
        title_effectiveness(snapshot),
        engagement(snapshot),
    ]
}

// ---------------------------------------------------------------------------
// Performance table
// ---------------------------------------------------------------------------

/// Numeric columns the performance table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Views,
    Ctr,
    AvgWatchTime,
    SeoScore,
}

impl SortColumn {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "views" => Some(Self::Views),
            "ctr" => Some(Self::Ctr),
            "avgwatchtime" | "avg_watch_time" | "watch-time" | "watch_time" => {
                Some(Self::AvgWatchTime)
            }
            "seoscore" | "seo_score" | "score" => Some(Self::SeoScore),
            _ => None,
        }
    }

    fn key(self, stat: &VideoStat) -> f64 {
        match self {
            Self::Views => stat.views as f64,
            Self::Ctr => stat.ctr,
            Self::AvgWatchTime => stat.avg_watch_time,
            Self::SeoScore => stat.seo_score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// One display-ready row of the performance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub video_id: String,
    pub title: String,
    pub views: String,
    pub ctr: String,
    pub avg_watch_time: String,
    pub seo_score: String,
}

impl TableRow {
    pub fn from_stat(stat: &VideoStat) -> Self {
        Self {
            video_id: stat.video_id.clone(),
            title: elide(&stat.title, TABLE_TITLE_CHARS),
            views: stat.views.to_string(),
            ctr: format!("{:.2}%", stat.ctr * 100.0),
            avg_watch_time: format_watch_time(stat.avg_watch_time),
            seo_score: format!("{}/100", format_number(stat.seo_score)),
        }
    }
}

/// Sort performance rows by a single column. The sort is stable, so ties
/// keep the server's order.
pub fn sorted_stats(stats: &[VideoStat], sort: Option<(SortColumn, SortOrder)>) -> Vec<VideoStat> {
    let mut rows = stats.to_vec();
    if let Some((column, order)) = sort {
        rows.sort_by(|a, b| {
            let ord = column
                .key(a)
                .partial_cmp(&column.key(b))
                .unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }
    rows
}

/// Formatted table rows in the requested order.
pub fn table_rows(
    snapshot: &AnalyticsSnapshot,
    sort: Option<(SortColumn, SortOrder)>,
) -> Vec<TableRow> {
    sorted_stats(&snapshot.video_performance, sort)
        .iter()
        .map(TableRow::from_stat)
        .collect()
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Seconds as `m:ss`.
pub fn format_watch_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mut minutes = (seconds / 60.0).floor() as u64;
    let mut secs = (seconds % 60.0).round() as u64;
    if secs == 60 {
        minutes += 1;
        secs = 0;
    }
    format!("{minutes}:{secs:02}")
}

/// Integers without a fraction, everything else as-is.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Truncate to `max` characters and add `...` only when something was cut.
pub fn elide(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Chart axis labels always carry the ellipsis, even for short titles.
fn elide_always(text: &str, max: usize) -> String {
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
