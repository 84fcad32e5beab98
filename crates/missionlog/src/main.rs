use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod aggregate;
mod charts;
mod config;
mod data;
mod error;
mod html;
mod presenter;
mod rank;
mod selector;
mod server;
mod types;

use config::Config;
use presenter::{DashboardState, Presenter};

#[derive(Parser, Debug)]
#[command(name = "missionlog")]
#[command(about = "Render a mission log dashboard from daily score reports")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log document: a file path or an http(s) URL (overrides MISSIONLOG_SOURCE)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Output directory for generated files
    #[arg(short, long, default_value = ".", global = true)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on (overrides MISSIONLOG_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render a static index.html (no server)
    Build {
        /// Day to show in the daily panel (YYYY-MM-DD). Default: latest report
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print rank and score without rendering
    Summary,
}

fn init_tracing(log_level: &str) {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    for directive in ["hyper=warn", "tower_http=warn", "reqwest=warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let port_override = match &args.command {
        Some(Commands::Serve { port }) => *port,
        _ => None,
    };
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(args.source.as_deref(), port_override);

    match args.command {
        // Default to serve if no command specified
        None | Some(Commands::Serve { .. }) => {
            server::serve(config.port, config.source).await?;
        }
        Some(Commands::Build { date }) => {
            let mut presenter = Presenter::load(&config.source).await;
            if let Some(date) = date {
                if presenter.select_date(date).is_none() {
                    warn!(date = %date, "No log loaded, date ignored");
                }
            }

            std::fs::create_dir_all(&args.output).with_context(|| {
                format!("Failed to create output directory {}", args.output.display())
            })?;
            let html_path = args.output.join("index.html");
            html::generate_html(&presenter, &html_path)?;
            info!(path = %html_path.display(), "HTML saved");
        }
        Some(Commands::Summary) => {
            let presenter = Presenter::load(&config.source).await;
            match presenter.state() {
                DashboardState::Ready(log) => {
                    info!(
                        rank = log.standing.tier.name,
                        total = log.total_score,
                        entries = log.collection.len(),
                        "Standing"
                    );
                    info!(progress = %log.standing.progress_label(), "Progress");
                    info!("{}", presenter.sync_status().message());
                }
                DashboardState::Empty => {
                    info!("{}", presenter.sync_status().message());
                }
                DashboardState::Unavailable(reason) => {
                    warn!(reason = %reason, "{}", presenter.sync_status().message());
                }
            }
        }
    }

    Ok(())
}
