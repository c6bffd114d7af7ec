/// Analytics snapshot tests.
///
/// Decodes backend-shaped JSON and checks the derived charts, the formatted
/// performance table and the request body sent to `/api/analytics`.
use chrono::NaiveDate;
use serde_json::json;
use tubeseo::analytics::report::{self, SortColumn, SortOrder};
use tubeseo::analytics::{AnalyticsQuery, AnalyticsSnapshot, EngagementMetrics};

fn snapshot() -> AnalyticsSnapshot {
    serde_json::from_value(json!({
        "videoPerformance": [
            {"videoId": "v1", "title": "How to train your cat to fetch in ten easy steps",
             "views": 1200, "ctr": 0.0534, "avgWatchTime": 185.0, "seoScore": 78},
            {"videoId": "v2", "title": "Dogs vs cats", "views": 5400, "ctr": 0.021,
             "avgWatchTime": 59.6, "seoScore": 91},
            {"videoId": "v3", "title": "Short", "views": 1200, "ctr": 0.1,
             "avgWatchTime": 0, "seoScore": 40}
        ],
        "keywordPerformance": [
            {"keyword": "cat training", "ctr": 0.05, "avgWatchTime": 150}
        ],
        "titleEffectiveness": [
            {"title": "A title that is definitely longer than twenty", "impressions": 900, "clicks": 45}
        ],
        "viewsOverTime": [
            {"date": "2024-03-01", "views": 100},
            {"date": "2024-03-02", "views": 140}
        ],
        "engagementMetrics": {"likes": 10, "comments": 4, "shares": 2}
    }))
    .unwrap()
}

#[test]
fn table_rows_are_formatted() {
    let rows = report::table_rows(&snapshot(), None);

    assert_eq!(rows.len(), 3);
    let first = &rows[0];
    assert_eq!(first.title, "How to train your cat to fetch in ten ea...");
    assert_eq!(first.views, "1200");
    assert_eq!(first.ctr, "5.34%");
    assert_eq!(first.avg_watch_time, "3:05");
    assert_eq!(first.seo_score, "78/100");

    assert_eq!(rows[1].title, "Dogs vs cats");
    assert_eq!(rows[1].avg_watch_time, "1:00");
    assert_eq!(rows[2].avg_watch_time, "0:00");
}

#[test]
fn sorting_is_stable_and_directional() {
    let snap = snapshot();

    let desc = report::table_rows(&snap, Some((SortColumn::Views, SortOrder::Descending)));
    let ids: Vec<_> = desc.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["v2", "v1", "v3"]);

    let asc = report::table_rows(&snap, Some((SortColumn::Views, SortOrder::Ascending)));
    let ids: Vec<_> = asc.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v3", "v2"]);

    let by_score = report::table_rows(&snap, Some((SortColumn::SeoScore, SortOrder::Descending)));
    assert_eq!(by_score[0].video_id, "v2");
}

#[test]
fn charts_follow_dashboard_layout() {
    let charts = report::charts(&snapshot());
    let titles: Vec<_> = charts.iter().map(|c| c.title).collect();
    assert_eq!(
        titles,
        vec![
            "Views Over Time",
            "Keyword Performance",
            "Title Effectiveness",
            "Engagement Metrics"
        ]
    );

    assert_eq!(charts[0].labels, vec!["2024-03-01", "2024-03-02"]);
    assert_eq!(charts[0].series[0].values, vec![100.0, 140.0]);

    let keyword = &charts[1];
    assert!((keyword.series[0].values[0] - 5.0).abs() < 1e-9);
    assert!((keyword.series[1].values[0] - 2.5).abs() < 1e-9);

    assert_eq!(charts[2].labels, vec!["A title that is defi..."]);

    // saves is absent in the payload
    assert_eq!(charts[3].series[0].values, vec![10.0, 4.0, 2.0, 0.0]);
}

#[test]
fn partial_snapshot_still_decodes() {
    let snap: AnalyticsSnapshot =
        serde_json::from_value(json!({"viewsOverTime": [{"date": "2024-01-01"}]})).unwrap();

    assert_eq!(snap.views_over_time[0].views, 0);
    assert!(snap.video_performance.is_empty());
    assert_eq!(snap.engagement_metrics, EngagementMetrics::default());
}

#[test]
fn query_serializes_camel_case_dates() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let query = AnalyticsQuery::from_bounds(
        vec!["v1".to_string(), "v2".to_string()],
        Some("2024-03-01"),
        None,
        today,
        30,
    )
    .unwrap();

    let body = serde_json::to_value(&query).unwrap();
    assert_eq!(
        body,
        json!({"videoIds": ["v1", "v2"], "startDate": "2024-03-01", "endDate": "2024-03-31"})
    );
}

#[test]
fn query_rejects_inverted_range() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let result = AnalyticsQuery::from_bounds(
        vec!["v1".to_string()],
        Some("2024-03-20"),
        Some("2024-03-10"),
        today,
        30,
    );
    assert!(result.is_err());
}
