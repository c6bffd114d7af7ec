//! CLI command implementations for tubeseo.
//!
//! Provides subcommand handlers for:
//! - `tubeseo generate "keyword"` — stream a full SEO generation session
//! - `tubeseo top-videos "keyword"` — related videos for a keyword
//! - `tubeseo videos` — videos available for analysis
//! - `tubeseo analytics --videos a,b` — performance table and engagement
//! - `tubeseo diagnostics` — recent entries of the diagnostic log
//! - `tubeseo config show|init|set|reset|path` — configuration management

use anyhow::{Context, Result, bail};
use chrono::Local;
use colored::Colorize;

use crate::analytics::report::{self, SortColumn, SortOrder, TableRow};
use crate::analytics::{AnalyticsQuery, AnalyticsSnapshot, AnalyticsView, VideoSummary};
use crate::api::{ApiClient, SeoSource};
use crate::config;
use crate::diagnostics::{self, DiagnosticEvent, Recorder};
use crate::dispatch::session;
use crate::events::VideoRef;
use crate::render::{RegionName, Surface};
use crate::stream::{EventStream, scan_top_videos};
use crate::web;

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// tubeseo generate
// ---------------------------------------------------------------------------

/// Run one generation session and print the resulting regions.
///
/// With `html`, prints the rendered surface markup instead of plain text.
pub fn run_generate(keyword: &str, html: bool) -> Result<()> {
    let cfg = config::load();
    let client = ApiClient::from_config(&cfg.api);
    let recorder = Recorder::from_config(&cfg.logging);

    let mut surface = Surface::new();
    let report = session::run_generate(
        &client,
        keyword,
        &mut surface,
        &recorder,
        cfg.stream.chunk_size,
    );

    if html {
        print!("{}", surface.to_html());
    } else {
        println!("{} {}", "SEO suggestions for".bold().cyan(), keyword.bold());
        println!("{}", "=".repeat(60));
        print_surface(&surface);
    }

    if report.malformed + report.ignored + report.rejected > 0 {
        eprintln!(
            "{}",
            format!(
                "Skipped {} malformed line(s), {} unknown and {} invalid event(s). See `tubeseo diagnostics`.",
                report.malformed, report.ignored, report.rejected
            )
            .dimmed()
        );
    }

    match report.error {
        Some(err) => Err::<(), _>(err).context("SEO generation failed"),
        None => Ok(()),
    }
}

fn print_surface(surface: &Surface) {
    if surface.is_blank() {
        println!("{}", "No SEO content received.".yellow());
        return;
    }
    for name in RegionName::ALL {
        let region = surface.region(name);
        if region.is_empty() {
            continue;
        }
        let text = plain_text(region.markup());
        if name == RegionName::Status {
            println!("{}", text.trim().red());
        } else {
            println!("{}", text.trim_end());
        }
        println!();
    }
}

/// Rough terminal rendering of region markup: block-level closing tags
/// become line breaks, other tags are dropped, entities are decoded.
fn plain_text(markup: &str) -> String {
    let mut out = String::new();
    let mut rest = markup;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = &rest[start + 1..start + end];
        match tag {
            "li" => out.push_str("  - "),
            "/h4" | "/li" | "/p" | "/div" => out.push('\n'),
            _ => {}
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// tubeseo top-videos
// ---------------------------------------------------------------------------

/// Print the related videos for a keyword.
pub fn run_top_videos(keyword: &str, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let client = ApiClient::from_config(&cfg.api);
    let recorder = Recorder::from_config(&cfg.logging);

    let scan = client
        .open_generate_stream(keyword)
        .and_then(|body| {
            scan_top_videos(
                EventStream::with_chunk_size(body, cfg.stream.chunk_size),
                &recorder,
            )
        })
        .inspect_err(|err| recorder.transport_error(err))
        .context("Error fetching top videos")?;

    let videos = scan.videos();
    if videos.is_empty() {
        recorder.empty_result(keyword);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(videos)?),
        OutputFormat::Csv => print_videos_csv(videos),
        OutputFormat::Table => print_videos_table(videos),
    }
    Ok(())
}

fn print_videos_table(videos: &[VideoRef]) {
    if videos.is_empty() {
        println!("{}", "No related videos found.".yellow());
        return;
    }
    println!("{}", "Top Related Videos".bold().cyan());
    for (i, video) in videos.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, video.title.bold());
        if !video.url.is_empty() {
            println!("      {}", video.url.dimmed());
        }
    }
}

fn print_videos_csv(videos: &[VideoRef]) {
    println!("title,url");
    for video in videos {
        println!("{},{}", csv_field(&video.title), csv_field(&video.url));
    }
}

// ---------------------------------------------------------------------------
// tubeseo videos
// ---------------------------------------------------------------------------

/// List the videos available for analysis.
pub fn run_videos(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let client = ApiClient::from_config(&cfg.api);
    let videos = client.list_videos().context("Error fetching videos")?;

    match format {
        OutputFormat::Json => print_video_list_json(&videos)?,
        OutputFormat::Csv => {
            println!("id,title");
            for video in &videos {
                println!("{},{}", csv_field(&video.id), csv_field(&video.title));
            }
        }
        OutputFormat::Table => {
            if videos.is_empty() {
                println!("{}", "No videos available.".yellow());
                return Ok(());
            }
            println!("  {:<16} Title", "Id");
            println!("  {}", "-".repeat(58));
            for video in &videos {
                println!("  {:<16} {}", video.id, video.title);
            }
        }
    }
    Ok(())
}

fn print_video_list_json(videos: &[VideoSummary]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(videos)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// tubeseo analytics
// ---------------------------------------------------------------------------

/// Options for `tubeseo analytics`.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsArgs {
    pub video_ids: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Fetch an analytics snapshot and print the performance report.
pub fn run_analytics(args: &AnalyticsArgs, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let video_ids: Vec<String> = args
        .video_ids
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    if video_ids.is_empty() {
        bail!("no videos selected (use --videos; see `tubeseo videos`)");
    }

    let sort = parse_sort_args(args.sort.as_deref(), args.order.as_deref())?;
    let query = AnalyticsQuery::from_bounds(
        video_ids,
        args.start.as_deref(),
        args.end.as_deref(),
        Local::now().date_naive(),
        cfg.dashboard.default_days,
    )?;

    let client = ApiClient::from_config(&cfg.api);
    let mut view = AnalyticsView::new();
    view.refresh(&client, query.clone())
        .context("Error fetching analytics")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view.snapshot())?),
        OutputFormat::Csv => print_analytics_csv(view.snapshot(), sort),
        OutputFormat::Table => print_analytics_table(&query, view.snapshot(), sort),
    }
    Ok(())
}

fn parse_sort_args(
    sort: Option<&str>,
    order: Option<&str>,
) -> Result<Option<(SortColumn, SortOrder)>> {
    let Some(sort) = sort else {
        return Ok(None);
    };
    let column = SortColumn::parse(sort).with_context(|| {
        format!("unknown sort column '{sort}' (expected views, ctr, avgWatchTime or seoScore)")
    })?;
    let order = match order {
        Some(o) => {
            SortOrder::parse(o).with_context(|| format!("unknown order '{o}' (expected asc or desc)"))?
        }
        None => SortOrder::default(),
    };
    Ok(Some((column, order)))
}

fn print_analytics_table(
    query: &AnalyticsQuery,
    snapshot: &AnalyticsSnapshot,
    sort: Option<(SortColumn, SortOrder)>,
) {
    println!("{}", "YouTube SEO Analytics".bold().cyan());
    println!(
        "  {} {} → {}",
        "Range:".bold(),
        query.start_date.format("%Y-%m-%d"),
        query.end_date.format("%Y-%m-%d")
    );
    println!("{}", "=".repeat(90));
    println!();

    let rows = report::table_rows(snapshot, sort);
    if rows.is_empty() {
        println!("{}", "No performance data for this selection.".yellow());
    } else {
        println!("{}", "Video Performance".bold().cyan());
        println!(
            "  {:<43} {:>10} {:>9} {:>10} {:>10}",
            "Video Title", "Views", "CTR (%)", "Watch", "SEO Score"
        );
        println!("  {}", "-".repeat(86));
        for (i, row) in rows.iter().enumerate() {
            let line = table_line(row);
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
    println!();

    let engagement = snapshot.engagement_metrics;
    println!("{}", "Engagement".bold().cyan());
    println!(
        "  Likes: {}  Comments: {}  Shares: {}  Saves: {}",
        engagement.likes, engagement.comments, engagement.shares, engagement.saves
    );

    if !snapshot.keyword_performance.is_empty() {
        println!();
        println!("{}", "Keyword Performance".bold().cyan());
        for keyword in &snapshot.keyword_performance {
            println!(
                "  {:<30} CTR {:>7.2}%  watch {:>6.2} min",
                keyword.keyword,
                keyword.ctr * 100.0,
                keyword.avg_watch_time / 60.0
            );
        }
    }
}

fn table_line(row: &TableRow) -> String {
    format!(
        "  {:<43} {:>10} {:>9} {:>10} {:>10}",
        row.title, row.views, row.ctr, row.avg_watch_time, row.seo_score
    )
}

fn print_analytics_csv(snapshot: &AnalyticsSnapshot, sort: Option<(SortColumn, SortOrder)>) {
    println!("video_id,title,views,ctr,avg_watch_time,seo_score");
    for stat in report::sorted_stats(&snapshot.video_performance, sort) {
        println!(
            "{},{},{},{},{},{}",
            csv_field(&stat.video_id),
            csv_field(&stat.title),
            stat.views,
            stat.ctr,
            stat.avg_watch_time,
            stat.seo_score
        );
    }
}

// ---------------------------------------------------------------------------
// tubeseo diagnostics
// ---------------------------------------------------------------------------

/// Print the most recent diagnostic log entries.
pub fn run_diagnostics(limit: usize, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let Some(path) = cfg.logging.resolved_path().or_else(diagnostics::default_log_path) else {
        bail!("could not determine the diagnostic log location");
    };

    let entries = diagnostics::read_recent(&path, limit);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Csv => {
            println!("timestamp,kind,detail");
            for entry in &entries {
                println!(
                    "{},{},{}",
                    entry.timestamp,
                    entry.kind,
                    csv_field(&entry.detail)
                );
            }
        }
        OutputFormat::Table => print_diagnostics_table(&path, &entries, cfg.logging.enabled),
    }
    Ok(())
}

fn print_diagnostics_table(path: &std::path::Path, entries: &[DiagnosticEvent], enabled: bool) {
    println!("{}", "tubeseo Diagnostics".bold().cyan());
    println!("  {} {}", "Log file:".bold(), path.display());
    if !enabled {
        println!("  {}", "Logging is disabled ([logging] enabled = false).".yellow());
    }
    println!();

    if entries.is_empty() {
        println!("{}", "No diagnostic entries.".dimmed());
        return;
    }
    for entry in entries {
        println!(
            "  {} {:<19} {}",
            entry.timestamp.dimmed(),
            entry.kind.to_string().yellow(),
            entry.detail
        );
        if let Some(line) = &entry.line {
            println!("      {}", line.dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// tubeseo web
// ---------------------------------------------------------------------------

/// Start the local dashboard.
pub fn run_web(bind: Option<String>, open: bool) -> Result<()> {
    let mut cfg = config::load();
    if let Some(bind) = bind {
        cfg.dashboard.bind = bind;
    }
    web::serve(&cfg, open)
}

// ---------------------------------------------------------------------------
// tubeseo config show | init | set | reset | path
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective tubeseo Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.tubeseo/config.toml", global_exists);
    print_source(".tubeseo.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "TUBESEO_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.tubeseo/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point tubeseo at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Print the config file locations.
pub fn run_config_path() -> Result<()> {
    let global = config::global_config_file().context("could not determine home directory")?;
    println!("{}", global.display());
    if let Some(project) = config::project_config_file() {
        println!("{}", project.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn plain_text_flattens_region_markup() {
        let markup = "<h4>Tags</h4><p class=\"tags\">cats &amp; dogs</p>";
        assert_eq!(plain_text(markup), "Tags\ncats & dogs\n");

        let list = "<h4>Title Suggestions</h4><ul class=\"seo-titles-list\"><li>A</li><li>B</li></ul>";
        assert_eq!(plain_text(list), "Title Suggestions\n  - A\n  - B\n");
    }

    #[test]
    fn plain_text_keeps_unterminated_tag() {
        assert_eq!(plain_text("a <b"), "a <b");
    }

    #[test]
    fn csv_field_quotes_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn sort_args_are_validated() {
        assert_eq!(parse_sort_args(None, Some("asc")).unwrap(), None);
        assert_eq!(
            parse_sort_args(Some("views"), None).unwrap(),
            Some((SortColumn::Views, SortOrder::Descending))
        );
        assert!(parse_sort_args(Some("title"), None).is_err());
        assert!(parse_sort_args(Some("ctr"), Some("sideways")).is_err());
    }
}
