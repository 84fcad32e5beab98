//! Page-level controller that owns the loaded log and both chart surfaces.

use chrono::NaiveDate;
use maud::Markup;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate;
use crate::charts::{history_series, BarChart, ChartCanvas, DoughnutChart};
use crate::data::{self, DataSource};
use crate::error::RetrievalError;
use crate::html;
use crate::rank::{self, RankStanding};
use crate::selector::{select_day, SelectedDayView};
use crate::types::LogCollection;

/// Log that loaded with at least one entry, plus its aggregates
#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub collection: LogCollection,
    pub total_score: u64,
    pub standing: RankStanding,
    pub last_synced: NaiveDate,
}

#[derive(Debug, Clone)]
pub enum DashboardState {
    Ready(LoadedLog),
    /// Document loaded but holds no entries
    Empty,
    /// Document could not be retrieved
    Unavailable(String),
}

/// Line shown next to the sync indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum SyncStatus {
    Synced(NaiveDate),
    NoData,
    ConnectionLost,
}

impl SyncStatus {
    pub fn message(&self) -> String {
        match self {
            SyncStatus::Synced(date) => format!("Last Synced: {}", date.format("%b %-d, %Y")),
            SyncStatus::NoData => "No missions logged yet.".to_string(),
            SyncStatus::ConnectionLost => "Connection Lost".to_string(),
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            SyncStatus::Synced(_) => "✔",
            SyncStatus::NoData => "◷",
            SyncStatus::ConnectionLost => "⚠",
        }
    }
}

/// Bounds and value of the date picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePicker {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
    pub value: NaiveDate,
}

/// What the daily panel shows on one rendered page
#[derive(Debug, Clone, Copy)]
pub struct DayPanel<'a> {
    pub picker: DatePicker,
    pub selected: Option<&'a SelectedDayView>,
    pub chart: &'a ChartCanvas<DoughnutChart>,
}

pub const DAILY_CHART_ID: &str = "dailyChart";
pub const HISTORY_CHART_ID: &str = "historyChart";

#[derive(Debug)]
pub struct Presenter {
    state: DashboardState,
    selected: Option<SelectedDayView>,
    daily_chart: ChartCanvas<DoughnutChart>,
    history_chart: ChartCanvas<BarChart>,
    today: NaiveDate,
}

impl Presenter {
    /// Fetch the document and build the initial view
    pub async fn load(source: &DataSource) -> Self {
        let result = data::load_collection(source).await;
        if let Err(e) = &result {
            warn!(source = %source, error = %e, "Failed to load log document");
        }
        Self::from_result(result, chrono::Local::now().date_naive())
    }

    /// Build the view from a load outcome. `today` seeds the date picker
    /// when there is nothing logged.
    pub fn from_result(result: Result<LogCollection, RetrievalError>, today: NaiveDate) -> Self {
        let state = match result {
            Err(e) => DashboardState::Unavailable(e.to_string()),
            Ok(collection) => match aggregate::summarize(&collection) {
                None => DashboardState::Empty,
                Some(summary) => {
                    let total_score = summary.total_score;
                    let last_synced = summary.latest.date;
                    let standing = rank::standing(total_score);
                    info!(
                        entries = summary.entry_count,
                        total = total_score,
                        rank = standing.tier.name,
                        "Log loaded"
                    );
                    DashboardState::Ready(LoadedLog {
                        collection,
                        total_score,
                        standing,
                        last_synced,
                    })
                }
            },
        };

        let mut presenter = Self {
            state,
            selected: None,
            daily_chart: ChartCanvas::new(DAILY_CHART_ID),
            history_chart: ChartCanvas::new(HISTORY_CHART_ID),
            today,
        };
        presenter.draw_history();
        if let Some(latest) = presenter.loaded().map(|log| log.last_synced) {
            presenter.select_date(latest);
        }
        presenter
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn loaded(&self) -> Option<&LoadedLog> {
        match &self.state {
            DashboardState::Ready(log) => Some(log),
            _ => None,
        }
    }

    pub fn collection(&self) -> Option<&LogCollection> {
        self.loaded().map(|log| &log.collection)
    }

    /// Show the report for `date`, or the "no report" state when the day is
    /// missing. Ignored when no log is loaded.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<&SelectedDayView> {
        let view = select_day(self.collection()?, date);
        draw_day(&mut self.daily_chart, &view);
        self.selected = Some(view);
        self.selected.as_ref()
    }

    fn draw_history(&mut self) {
        let series = match &self.state {
            DashboardState::Ready(log) => history_series(&log.collection),
            _ => {
                self.history_chart.clear();
                return;
            }
        };
        let chart = BarChart::new(series);
        debug!(bars = chart.points().len(), "Drawing history");
        self.history_chart.draw(chart);
    }

    pub fn sync_status(&self) -> SyncStatus {
        match &self.state {
            DashboardState::Ready(log) => SyncStatus::Synced(log.last_synced),
            DashboardState::Empty => SyncStatus::NoData,
            DashboardState::Unavailable(_) => SyncStatus::ConnectionLost,
        }
    }

    /// Rank name as displayed in the header
    pub fn rank_label(&self) -> &str {
        match &self.state {
            DashboardState::Ready(log) => log.standing.tier.name,
            DashboardState::Empty => "-",
            DashboardState::Unavailable(_) => "Error",
        }
    }

    pub fn date_picker(&self) -> DatePicker {
        self.picker_for(self.selected.as_ref())
    }

    fn picker_for(&self, selected: Option<&SelectedDayView>) -> DatePicker {
        match self.collection().and_then(LogCollection::date_bounds) {
            Some((min, max)) => DatePicker {
                min: Some(min),
                max: Some(max),
                value: selected.map(SelectedDayView::date).unwrap_or(max),
            },
            None => DatePicker {
                min: None,
                max: None,
                value: self.today,
            },
        }
    }

    pub fn day_panel(&self) -> DayPanel<'_> {
        DayPanel {
            picker: self.date_picker(),
            selected: self.selected.as_ref(),
            chart: &self.daily_chart,
        }
    }

    pub fn history_chart(&self) -> &ChartCanvas<BarChart> {
        &self.history_chart
    }

    pub fn render(&self) -> Markup {
        html::render_page(self, self.day_panel())
    }

    /// Render the page with `date` in the daily panel. The stored selection
    /// and daily chart are left as they are.
    pub fn render_for(&self, date: Option<NaiveDate>) -> Markup {
        let view = match (date, self.collection()) {
            (Some(date), Some(collection)) => select_day(collection, date),
            _ => return self.render(),
        };

        let mut chart = ChartCanvas::new(DAILY_CHART_ID);
        draw_day(&mut chart, &view);
        let panel = DayPanel {
            picker: self.picker_for(Some(&view)),
            selected: Some(&view),
            chart: &chart,
        };
        html::render_page(self, panel)
    }
}

/// Draw the doughnut for a reported day, or leave the canvas empty
fn draw_day(canvas: &mut ChartCanvas<DoughnutChart>, view: &SelectedDayView) {
    match view.entry() {
        Some(entry) => {
            debug!(date = %entry.date, "Selected day");
            canvas.draw(DoughnutChart::new(entry));
        }
        None => {
            debug!(date = %view.date(), "No report for selected day");
            canvas.clear();
        }
    }
}
