//! Embedded web dashboard for tubeseo.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - `/seo?keyword=...` — SEO suggestions streamed from the backend and
//!   rendered into a results surface
//! - `/dashboard?videos=...&start=...&end=...&sort=...&order=...` — the
//!   analytics snapshot as charts and a sortable table
//! - `/api/health` — backend reachability as JSON
//!
//! Launched via `tubeseo web` (default: `http://127.0.0.1:9747`).

mod frontend;
pub mod pages;

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::analytics::report::{SortColumn, SortOrder};
use crate::analytics::{AnalyticsQuery, AnalyticsView};
use crate::api::ApiClient;
use crate::config::TubeseoConfig;
use crate::diagnostics::Recorder;
use crate::dispatch::session;
use crate::render::Surface;
use crate::render::html::error_notice;

use pages::DashboardParams;

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the configured address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard), so each results surface has exactly one
/// writer. Errors are handled per request without stopping the server.
pub fn serve(config: &TubeseoConfig, open: bool) -> Result<()> {
    let addr = &config.dashboard.bind;
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("tubeseo dashboard running at http://{addr}");
    println!("Backend: {}", config.api.base_url);
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let resp = match dispatch(config, &method, &url) {
            Ok(resp) => resp,
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                json_response(body, 500)
            }
        };
        let _ = request.respond(resp);

        // Brief access log
        println!("{} {} {}", method, url, Local::now().format("%H:%M:%S"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(config: &TubeseoConfig, method: &Method, url: &str) -> Result<HttpResponse> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(html_response(
            frontend::page("tubeseo", &pages::search_form("")),
            200,
        )),
        (&Method::Get, "/seo") => Ok(seo_page(config, query)),
        (&Method::Get, "/dashboard") => Ok(dashboard_page(config, query)),
        (&Method::Get, "/api/health") => health(config),
        _ => Ok(json_response(r#"{"error": "not found"}"#.to_string(), 404)),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /seo?keyword=...` — run one generation session.
fn seo_page(config: &TubeseoConfig, query: &str) -> HttpResponse {
    let keyword = query_values(query, "keyword").into_iter().next().unwrap_or_default();
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return html_response(frontend::page("tubeseo", &pages::search_form("")), 200);
    }

    let client = ApiClient::from_config(&config.api);
    let recorder = Recorder::from_config(&config.logging);
    let mut surface = Surface::new();
    let report = session::run_generate(
        &client,
        keyword,
        &mut surface,
        &recorder,
        config.stream.chunk_size,
    );

    let title = format!("SEO: {keyword}");
    let body = pages::seo_results(keyword, &surface, &report);
    html_response(frontend::page(&title, &body), 200)
}

/// `GET /dashboard?...` — analytics for the selected videos and range.
fn dashboard_page(config: &TubeseoConfig, query: &str) -> HttpResponse {
    let video_ids = parse_video_ids(&query_values(query, "videos"));
    let start = query_values(query, "start").into_iter().find(|s| !s.is_empty());
    let end = query_values(query, "end").into_iter().find(|s| !s.is_empty());
    let sort = parse_sort(query);

    let today = Local::now().date_naive();
    let (analytics_query, range_error) = resolve_range(
        video_ids,
        start.as_deref(),
        end.as_deref(),
        today,
        config.dashboard.default_days,
    );
    let params = DashboardParams::from_query(&analytics_query, sort);

    let client = ApiClient::from_config(&config.api);
    let recorder = Recorder::from_config(&config.logging);

    let videos = client.list_videos();
    if let Err(e) = &videos {
        recorder.transport_error(e);
    }
    let video_error = videos.as_ref().err().map(|e| e.to_string());
    let mut body = pages::dashboard_form(
        &params,
        match &videos {
            Ok(list) => Ok(list.as_slice()),
            Err(_) => Err(video_error.as_deref().unwrap_or_default()),
        },
    );

    let mut view = AnalyticsView::new();
    if let Some(message) = range_error {
        body.push_str(&notice_card("Invalid date range", &message));
    } else if analytics_query.video_ids.is_empty() {
        body.push_str("<div class=\"card\"><p class=\"no-videos\">Select videos to analyze.</p></div>\n");
    } else {
        match view.refresh(&client, analytics_query) {
            Ok(()) => body.push_str(&pages::dashboard_results(&params, view.snapshot())),
            Err(e) => {
                recorder.transport_error(&e);
                body.push_str(&notice_card("Error fetching analytics", &e.to_string()));
            }
        }
    }

    html_response(frontend::page("tubeseo analytics", &body), 200)
}

/// Resolve the requested range, falling back to the default range when the
/// bounds are unusable. The message explains what was wrong with them.
fn resolve_range(
    video_ids: Vec<String>,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    default_days: u32,
) -> (AnalyticsQuery, Option<String>) {
    match AnalyticsQuery::from_bounds(video_ids.clone(), start, end, today, default_days) {
        Ok(query) => (query, None),
        Err(e) => (
            AnalyticsQuery::last_days(video_ids, today, default_days),
            Some(e.to_string()),
        ),
    }
}

fn notice_card(title: &str, message: &str) -> String {
    format!("<div class=\"card\">{}</div>\n", error_notice(title, message))
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    base_url: String,
    backend_reachable: bool,
    logging_enabled: bool,
    log_path: Option<String>,
}

/// `GET /api/health` — backend reachability summary.
fn health(config: &TubeseoConfig) -> Result<HttpResponse> {
    let client = ApiClient::from_config(&config.api);
    let resp = HealthResponse {
        base_url: client.base_url().to_string(),
        backend_reachable: client.is_reachable(),
        logging_enabled: config.logging.enabled,
        log_path: config
            .logging
            .resolved_path()
            .map(|p| p.display().to_string()),
    };
    Ok(json_response(serde_json::to_string(&resp)?, 200))
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// All values of `key` in a URL query string, percent-decoded.
fn query_values(query: &str, key: &str) -> Vec<String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

/// Video ids from repeated `videos=` params and/or comma-separated lists.
fn parse_video_ids(values: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in values.iter().flat_map(|v| v.split(',')) {
        let id = id.trim();
        if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// `sort=` and `order=`; an unknown column disables sorting.
fn parse_sort(query: &str) -> Option<(SortColumn, SortOrder)> {
    let column = query_values(query, "sort")
        .first()
        .and_then(|s| SortColumn::parse(s))?;
    let order = query_values(query, "order")
        .first()
        .and_then(|s| SortOrder::parse(s))
        .unwrap_or_default();
    Some((column, order))
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn html_response(body: String, status: u16) -> HttpResponse {
    Response::from_data(body.into_bytes())
        .with_header(content_type("text/html; charset=utf-8"))
        .with_status_code(StatusCode(status))
}

fn json_response(body: String, status: u16) -> HttpResponse {
    Response::from_data(body.into_bytes())
        .with_header(content_type("application/json; charset=utf-8"))
        .with_status_code(StatusCode(status))
}

fn content_type(value: &'static str) -> Header {
    Header::from_bytes("Content-Type", value).expect("static header is valid ASCII")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", url]);
        c
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };

    command.spawn().context("failed to open browser")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
