//! Server-rendered page bodies.
//!
//! Each function turns already-fetched data into an HTML fragment; none of
//! them perform I/O, so they can be tested directly.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::analytics::report::{self, Chart, SortColumn, SortOrder};
use crate::analytics::{AnalyticsQuery, AnalyticsSnapshot, VideoSummary};
use crate::dispatch::session::SessionReport;
use crate::render::Surface;
use crate::render::html::{escape, error_notice};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// The keyword form, optionally pre-filled.
pub fn search_form(keyword: &str) -> String {
    format!(
        r#"<div class="card">
<h2>SEO Suggestions</h2>
<form method="get" action="/seo">
<label>Keyword<input name="keyword" value="{}" required></label>
<button type="submit">Generate</button>
</form>
</div>
"#,
        escape(keyword)
    )
}

/// Results of one generation session.
pub fn seo_results(keyword: &str, surface: &Surface, report: &SessionReport) -> String {
    let mut out = search_form(keyword);
    let _ = write!(
        out,
        "<div class=\"card\">\n<h2>Results for &quot;{}&quot;</h2>\n{}",
        escape(keyword),
        surface.to_html()
    );
    if report.malformed + report.ignored + report.rejected > 0 {
        let _ = write!(
            out,
            "<p class=\"no-videos\">Skipped {} malformed line(s), {} unknown and {} invalid event(s).</p>\n",
            report.malformed, report.ignored, report.rejected
        );
    }
    out.push_str("</div>\n");
    out
}

// ---------------------------------------------------------------------------
// Analytics dashboard
// ---------------------------------------------------------------------------

/// Selection state of the dashboard form.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    pub video_ids: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sort: Option<(SortColumn, SortOrder)>,
}

impl DashboardParams {
    pub fn from_query(query: &AnalyticsQuery, sort: Option<(SortColumn, SortOrder)>) -> Self {
        Self {
            video_ids: query.video_ids.clone(),
            start: query.start_date,
            end: query.end_date,
            sort,
        }
    }

    /// Query string for the same selection sorted by `column`.
    ///
    /// Clicking the active column flips its order; a new column starts
    /// descending.
    pub fn sort_link(&self, column: SortColumn) -> String {
        let order = match self.sort {
            Some((active, order)) if active == column => order.toggled(),
            _ => SortOrder::Descending,
        };
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("videos", &self.video_ids.join(","));
        query.append_pair("start", &self.start.format("%Y-%m-%d").to_string());
        query.append_pair("end", &self.end.format("%Y-%m-%d").to_string());
        query.append_pair("sort", sort_key(column));
        query.append_pair("order", order.as_str());
        format!("/dashboard?{}", query.finish())
    }
}

fn sort_key(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Views => "views",
        SortColumn::Ctr => "ctr",
        SortColumn::AvgWatchTime => "avgWatchTime",
        SortColumn::SeoScore => "seoScore",
    }
}

/// The video/date selection form. `videos` is `Err(message)` when the list
/// could not be fetched.
pub fn dashboard_form(params: &DashboardParams, videos: Result<&[VideoSummary], &str>) -> String {
    let mut out = String::from(
        "<div class=\"card\">\n<h2>YouTube SEO Analytics</h2>\n<form method=\"get\" action=\"/dashboard\">\n",
    );

    match videos {
        Ok(videos) => {
            out.push_str("<label>Videos<select name=\"videos\" multiple size=\"5\">\n");
            for video in videos {
                let selected = if params.video_ids.contains(&video.id) {
                    " selected"
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "<option value=\"{}\"{selected}>{}</option>",
                    escape(&video.id),
                    escape(&video.title)
                );
            }
            out.push_str("</select></label>\n");
        }
        Err(message) => {
            out.push_str(&error_notice("Error fetching videos", message));
            let _ = writeln!(
                out,
                "<label>Video ids<input name=\"videos\" value=\"{}\"></label>",
                escape(&params.video_ids.join(","))
            );
        }
    }

    let _ = write!(
        out,
        "<label>Start<input type=\"date\" name=\"start\" value=\"{}\"></label>\n\
         <label>End<input type=\"date\" name=\"end\" value=\"{}\"></label>\n\
         <button type=\"submit\">Update Analytics</button>\n</form>\n</div>\n",
        params.start.format("%Y-%m-%d"),
        params.end.format("%Y-%m-%d"),
    );
    out
}

/// Charts and the performance table for a snapshot.
pub fn dashboard_results(params: &DashboardParams, snapshot: &AnalyticsSnapshot) -> String {
    let mut out = String::new();
    for chart in report::charts(snapshot) {
        out.push_str(&chart_card(&chart));
    }
    out.push_str(&performance_table(params, snapshot));
    out
}

/// A chart as labelled horizontal bars, one row per label and series.
pub fn chart_card(chart: &Chart) -> String {
    let mut out = format!("<div class=\"card\">\n<h2>{}</h2>\n", escape(chart.title));
    if chart.labels.is_empty() {
        out.push_str("<p class=\"no-videos\">No data.</p>\n</div>\n");
        return out;
    }

    let max = chart.max_value();
    for (i, label) in chart.labels.iter().enumerate() {
        for (s, series) in chart.series.iter().enumerate() {
            let value = series.values.get(i).copied().unwrap_or(0.0);
            let width = if max > 0.0 { value / max * 100.0 } else { 0.0 };
            let row_label = if chart.series.len() > 1 {
                format!("{label} · {}", series.label)
            } else {
                label.clone()
            };
            let _ = writeln!(
                out,
                "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
                 <div class=\"bar s{}\" style=\"width:{width:.1}%\"></div>\
                 <span class=\"bar-value\">{}</span></div>",
                escape(&row_label),
                s % 2,
                format_value(value)
            );
        }
    }
    out.push_str("</div>\n");
    out
}

/// The per-video performance table with sortable numeric headers.
pub fn performance_table(params: &DashboardParams, snapshot: &AnalyticsSnapshot) -> String {
    let mut out = String::from(
        "<div class=\"card\">\n<h2>Video Performance</h2>\n<table>\n<tr><th>Video Title</th>",
    );
    for (column, title) in [
        (SortColumn::Views, "Views"),
        (SortColumn::Ctr, "CTR (%)"),
        (SortColumn::AvgWatchTime, "Avg. Watch Time"),
        (SortColumn::SeoScore, "SEO Score"),
    ] {
        let marker = match params.sort {
            Some((active, SortOrder::Ascending)) if active == column => " ▲",
            Some((active, SortOrder::Descending)) if active == column => " ▼",
            _ => "",
        };
        let _ = write!(
            out,
            "<th class=\"num\"><a href=\"{}\">{title}{marker}</a></th>",
            escape(&params.sort_link(column))
        );
    }
    out.push_str("</tr>\n");

    for row in report::table_rows(snapshot, params.sort) {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape(&row.title),
            row.views,
            row.ctr,
            row.avg_watch_time,
            row.seo_score
        );
    }
    out.push_str("</table>\n</div>\n");
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        report::format_number(value)
    } else {
        format!("{value:.2}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::VideoStat;

    fn params(sort: Option<(SortColumn, SortOrder)>) -> DashboardParams {
        DashboardParams {
            video_ids: vec!["a".into(), "b".into()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            sort,
        }
    }

    #[test]
    fn sort_link_toggles_active_column() {
        let p = params(Some((SortColumn::Views, SortOrder::Descending)));
        assert!(p.sort_link(SortColumn::Views).ends_with("sort=views&order=asc"));
        assert!(p.sort_link(SortColumn::Ctr).ends_with("sort=ctr&order=desc"));
        assert!(p.sort_link(SortColumn::Views).contains("videos=a%2Cb"));
    }

    #[test]
    fn search_form_escapes_keyword() {
        assert!(search_form("\"><script>").contains("value=\"&quot;&gt;&lt;script&gt;\""));
    }

    #[test]
    fn dashboard_form_marks_selected_videos() {
        let videos = vec![
            VideoSummary {
                id: "a".into(),
                title: "First".into(),
            },
            VideoSummary {
                id: "z".into(),
                title: "Other".into(),
            },
        ];
        let html = dashboard_form(&params(None), Ok(videos.as_slice()));
        assert!(html.contains("<option value=\"a\" selected>First</option>"));
        assert!(html.contains("<option value=\"z\">Other</option>"));
    }

    #[test]
    fn dashboard_form_reports_video_list_failure() {
        let html = dashboard_form(&params(None), Err("connection refused"));
        assert!(html.contains("Error fetching videos: connection refused"));
        assert!(html.contains("value=\"a,b\""));
    }

    #[test]
    fn performance_table_follows_sort() {
        let snapshot = AnalyticsSnapshot {
            video_performance: vec![
                VideoStat {
                    video_id: "a".into(),
                    title: "Low".into(),
                    views: 1,
                    ..Default::default()
                },
                VideoStat {
                    video_id: "b".into(),
                    title: "High".into(),
                    views: 9,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let sort = Some((SortColumn::Views, SortOrder::Descending));
        let html = performance_table(&params(sort), &snapshot);
        assert!(html.find("High").unwrap() < html.find("Low").unwrap());
        assert!(html.contains("Views ▼"));
    }

    #[test]
    fn empty_chart_says_no_data() {
        let chart = report::views_over_time(&AnalyticsSnapshot::default());
        assert!(chart_card(&chart).contains("No data."));
    }
}
