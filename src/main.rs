use anyhow::Result;
use clap::{Parser, Subcommand};

use tubeseo::cli::{self, AnalyticsArgs, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "tubeseo")]
#[command(about = "YouTube SEO suggestions and analytics from a streaming backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stream SEO suggestions for a keyword and print every section
    Generate {
        /// The keyword to optimize for
        #[arg(required = true)]
        keyword: Vec<String>,
        /// Print the rendered HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Show the related videos the backend finds for a keyword
    TopVideos {
        /// The keyword to search
        #[arg(required = true)]
        keyword: Vec<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the videos available for analysis
    Videos {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Fetch analytics for a set of videos and date range
    Analytics {
        /// Video ids, comma-separated or repeated
        #[arg(long = "videos", required = true)]
        videos: Vec<String>,
        /// Start date (YYYY-MM-DD); defaults to the configured range
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        end: Option<String>,
        /// Sort column: views, ctr, avgWatchTime, seoScore
        #[arg(long)]
        sort: Option<String>,
        /// Sort order: asc or desc (default: desc)
        #[arg(long)]
        order: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Launch the local web dashboard
    Web {
        /// Address to bind (overrides [dashboard] bind)
        #[arg(long)]
        bind: Option<String>,
        /// Open the dashboard in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Show recent diagnostic log entries
    Diagnostics {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write a default config file to ~/.tubeseo/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value by dotted key, e.g. `api.base_url http://host:5000`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
    /// Print the config file locations
    Path,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Generate { keyword, html } => cli::run_generate(&keyword.join(" "), html),
        Commands::TopVideos { keyword, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_top_videos(&keyword.join(" "), fmt)
        }
        Commands::Videos { format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_videos(fmt)
        }
        Commands::Analytics {
            videos,
            start,
            end,
            sort,
            order,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            let args = AnalyticsArgs {
                video_ids: videos,
                start,
                end,
                sort,
                order,
            };
            cli::run_analytics(&args, fmt)
        }
        Commands::Web { bind, open } => cli::run_web(bind, open),
        Commands::Diagnostics { limit, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_diagnostics(limit, fmt)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
            ConfigAction::Path => cli::run_config_path(),
        },
    }
}
