use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::services::ServeFile;
use tracing::{error, info, warn};

use crate::data::DataSource;
use crate::presenter::{DashboardState, Presenter, SyncStatus};
use crate::types::LogEntry;

/// Application state shared across requests
pub struct AppState {
    pub source: DataSource,
    pub presenter: RwLock<Presenter>,
}

impl AppState {
    pub fn new(source: DataSource, presenter: Presenter) -> Arc<Self> {
        Arc::new(Self {
            source,
            presenter: RwLock::new(presenter),
        })
    }

    /// Re-load the document and swap the presenter in one step.
    /// Returns false when the document could not be retrieved.
    pub async fn reload(&self) -> bool {
        let fresh = Presenter::load(&self.source).await;
        let ok = !matches!(fresh.state(), DashboardState::Unavailable(_));
        *self.presenter.write().await = fresh;
        ok
    }
}

/// Start the web server, watching the data file when it is local
pub async fn serve(port: u16, source: DataSource) -> anyhow::Result<()> {
    info!(source = %source, "Loading log document");
    let presenter = Presenter::load(&source).await;
    let state = AppState::new(source, presenter);

    if let Some(path) = state.source.local_path() {
        start_file_watcher(state.clone(), path.to_path_buf())?;
    }

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\nServer running at http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/api/logs", get(logs_handler))
        .route("/api/summary", get(summary_handler))
        .route("/api/refresh", get(refresh_handler));

    if let Some(path) = state.source.local_path() {
        app = app.route_service("/data.json", ServeFile::new(path));
    }

    app.with_state(state)
}

/// Watch the data file and reload whenever it changes
fn start_file_watcher(state: Arc<AppState>, file: PathBuf) -> anyhow::Result<()> {
    let watch_dir = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = file
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| anyhow::anyhow!("data source has no file name: {}", file.display()))?;

    let (tx, mut rx) = tokio::sync::mpsc::channel(10);

    std::thread::spawn(move || {
        let tx_clone = tx.clone();
        let debouncer = new_debouncer(
            Duration::from_secs(2),
            move |result: DebounceEventResult| {
                if let Ok(events) = result {
                    let touched = events
                        .iter()
                        .any(|e| e.path.file_name() == Some(file_name.as_os_str()));

                    if touched {
                        let _ = tx_clone.blocking_send(());
                    }
                }
            },
        );

        let mut debouncer = match debouncer {
            Ok(d) => d,
            Err(e) => {
                error!(error = %e, "Failed to create file watcher");
                return;
            }
        };

        if let Err(e) = debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::NonRecursive)
        {
            error!(dir = %watch_dir.display(), error = %e, "Failed to watch directory");
            return;
        }
        info!(dir = %watch_dir.display(), "Watching for log changes");

        // Keep the watcher alive
        loop {
            std::thread::sleep(Duration::from_secs(60));
        }
    });

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            info!("Detected change in log document");
            if !state.reload().await {
                warn!("Reload failed, dashboard marked unavailable");
            }
        }
    });

    Ok(())
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<String>,
}

fn parse_query_date(query: &DateQuery) -> Result<Option<NaiveDate>, (StatusCode, String)> {
    match query.date.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid date: {raw}"))),
    }
}

/// Serve the dashboard, showing `?date=` for this response only
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let date = parse_query_date(&query)?;
    let markup = state.presenter.read().await.render_for(date);
    Ok(Html(markup.into_string()))
}

/// Return loaded entries as JSON
async fn logs_handler(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    let presenter = state.presenter.read().await;
    let entries = presenter
        .collection()
        .map(|c| c.entries().to_vec())
        .unwrap_or_default();
    Json(entries)
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub rank: String,
    pub total_score: Option<u64>,
    pub progress: Option<f64>,
    pub progress_label: Option<String>,
    pub entries: usize,
    pub sync: SyncStatus,
}

async fn summary_handler(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let presenter = state.presenter.read().await;
    let loaded = presenter.loaded();

    Json(SummaryResponse {
        rank: presenter.rank_label().to_string(),
        total_score: loaded.map(|log| log.total_score),
        progress: loaded.map(|log| log.standing.progress),
        progress_label: loaded.map(|log| log.standing.progress_label()),
        entries: loaded.map(|log| log.collection.len()).unwrap_or(0),
        sync: presenter.sync_status(),
    })
}

/// Re-read the log document (manual trigger)
async fn refresh_handler(State(state): State<Arc<AppState>>) -> &'static str {
    info!("Manual refresh triggered");
    if state.reload().await {
        "OK"
    } else {
        "ERROR"
    }
}
