//! Chart data shaping and inline SVG rendering.
//!
//! Two charts appear on the dashboard:
//! - **Daily breakdown**: doughnut of the four point categories for one day
//! - **History**: bars of daily totals for the most recent reports
//!
//! Charts are owned values held in a [`ChartCanvas`]. Drawing a new chart
//! into a canvas disposes the one it replaces.

use maud::{html, Markup};
use std::f64::consts::PI;
use tracing::trace;

use crate::types::{LogCollection, LogEntry};

/// Maximum number of days in the history series
pub const HISTORY_LEN: usize = 7;

/// Point categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Titan,
    Oracle,
    Sage,
    Bonus,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Titan,
        Category::Oracle,
        Category::Sage,
        Category::Bonus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Titan => "TITAN",
            Category::Oracle => "ORACLE",
            Category::Sage => "SAGE",
            Category::Bonus => "Bonus",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Titan => "var(--accent-red)",
            Category::Oracle => "var(--primary)",
            Category::Sage => "var(--accent-green)",
            Category::Bonus => "var(--accent-orange)",
        }
    }

    fn points(self, entry: &LogEntry) -> u32 {
        match self {
            Category::Titan => entry.titan_pts,
            Category::Oracle => entry.oracle_pts,
            Category::Sage => entry.sage_pts,
            Category::Bonus => entry.bonus_pts,
        }
    }
}

/// Exactly four `(category, value)` pairs in [`Category::ALL`] order
pub fn daily_breakdown(entry: &LogEntry) -> [(Category, u32); 4] {
    Category::ALL.map(|category| (category, category.points(entry)))
}

/// One bar in the history chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPoint {
    pub label: String,
    pub total: u64,
}

/// Daily totals for the last `min(7, len)` entries, oldest first.
/// Labels read day-of-month then weekday, e.g. `1 Mon`. Short histories are
/// not padded.
pub fn history_series(collection: &LogCollection) -> Vec<HistoryPoint> {
    let entries = collection.entries();
    let start = entries.len().saturating_sub(HISTORY_LEN);
    entries[start..]
        .iter()
        .map(|entry| HistoryPoint {
            label: entry.date.format("%-d %a").to_string(),
            total: entry.total(),
        })
        .collect()
}

/// Something that can be drawn onto a chart surface
pub trait Chart {
    fn kind(&self) -> &'static str;
    fn render(&self) -> Markup;
}

/// Doughnut chart of one day's categories
#[derive(Debug, Clone, PartialEq)]
pub struct DoughnutChart {
    slices: [(Category, u32); 4],
}

const DOUGHNUT_SIZE: f64 = 200.0;
/// Inner radius as a fraction of the outer radius
const DOUGHNUT_CUTOUT: f64 = 0.7;

impl DoughnutChart {
    pub fn new(entry: &LogEntry) -> Self {
        Self {
            slices: daily_breakdown(entry),
        }
    }

    fn total(&self) -> u64 {
        self.slices.iter().map(|(_, v)| u64::from(*v)).sum()
    }
}

impl Chart for DoughnutChart {
    fn kind(&self) -> &'static str {
        "doughnut"
    }

    fn render(&self) -> Markup {
        let center = DOUGHNUT_SIZE / 2.0;
        let outer = center - 4.0;
        // A stroked circle at the mid radius draws the ring
        let thickness = outer * (1.0 - DOUGHNUT_CUTOUT);
        let radius = outer - thickness / 2.0;
        let circumference = 2.0 * PI * radius;
        let total = self.total();

        let mut offset = 0.0;
        let mut arcs = Vec::new();
        if total > 0 {
            for (category, value) in self.slices.iter().filter(|(_, v)| *v > 0) {
                let length = circumference * (f64::from(*value) / total as f64);
                arcs.push((*category, *value, length, offset));
                offset += length;
            }
        }

        html! {
            svg.chart.doughnut-chart
                viewBox={"0 0 " (DOUGHNUT_SIZE) " " (DOUGHNUT_SIZE)}
                role="img"
                aria-label="Daily points by category"
            {
                circle.doughnut-track
                    cx=(center) cy=(center) r=(fmt_num(radius))
                    fill="none"
                    stroke="var(--border)"
                    stroke-width=(fmt_num(thickness)) {}
                @for (category, value, length, offset) in &arcs {
                    circle.doughnut-slice
                        cx=(center) cy=(center) r=(fmt_num(radius))
                        fill="none"
                        stroke=(category.color())
                        stroke-width=(fmt_num(thickness))
                        stroke-dasharray={(fmt_num(*length)) " " (fmt_num(circumference - length))}
                        stroke-dashoffset=(fmt_num(-offset))
                        transform={"rotate(-90 " (center) " " (center) ")"}
                    {
                        title { (category.label()) ": " (value) " Points" }
                    }
                }
            }
        }
    }
}

/// Bar chart of recent daily totals
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    points: Vec<HistoryPoint>,
}

const BAR_WIDTH: f64 = 320.0;
const BAR_HEIGHT: f64 = 180.0;
const BAR_THICKNESS: f64 = 15.0;
const BAR_AXIS_GAP: f64 = 20.0;

impl BarChart {
    pub fn new(points: Vec<HistoryPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }
}

impl Chart for BarChart {
    fn kind(&self) -> &'static str {
        "bar"
    }

    fn render(&self) -> Markup {
        let plot_height = BAR_HEIGHT - BAR_AXIS_GAP;
        // y axis always starts at zero
        let max = self.points.iter().map(|p| p.total).max().unwrap_or(0).max(1);
        let slot = BAR_WIDTH / self.points.len().max(1) as f64;

        html! {
            svg.chart.bar-chart
                viewBox={"0 0 " (BAR_WIDTH) " " (BAR_HEIGHT)}
                role="img"
                aria-label="Total daily score"
            {
                line.bar-baseline
                    x1="0" y1=(plot_height) x2=(BAR_WIDTH) y2=(plot_height)
                    stroke="var(--border)" {}
                @for (idx, point) in self.points.iter().enumerate() {
                    @let height = plot_height * (point.total as f64 / max as f64);
                    @let x = slot * idx as f64 + (slot - BAR_THICKNESS) / 2.0;
                    g.bar {
                        title { "Report: " (point.label) "\nTotal Score: " (point.total) }
                        rect
                            x=(fmt_num(x))
                            y=(fmt_num(plot_height - height))
                            width=(BAR_THICKNESS)
                            height=(fmt_num(height))
                            rx="4"
                            fill="var(--primary)" {}
                        text.bar-label
                            x=(fmt_num(slot * idx as f64 + slot / 2.0))
                            y=(fmt_num(BAR_HEIGHT - 4.0))
                            text-anchor="middle"
                            fill="var(--muted-foreground)"
                        { (point.label) }
                    }
                }
            }
        }
    }
}

fn fmt_num(value: f64) -> String {
    format!("{value:.2}")
}

/// A drawing surface holding at most one chart
#[derive(Debug)]
pub struct ChartCanvas<C: Chart> {
    id: &'static str,
    chart: Option<C>,
}

impl<C: Chart> ChartCanvas<C> {
    pub fn new(id: &'static str) -> Self {
        Self { id, chart: None }
    }

    /// Replace the current chart, disposing the old one first
    pub fn draw(&mut self, chart: C) {
        self.clear();
        trace!(canvas = self.id, kind = chart.kind(), "Drawing chart");
        self.chart = Some(chart);
    }

    pub fn clear(&mut self) {
        if let Some(old) = self.chart.take() {
            trace!(canvas = self.id, kind = old.kind(), "Disposing chart");
        }
    }

    pub fn chart(&self) -> Option<&C> {
        self.chart.as_ref()
    }

    pub fn is_drawn(&self) -> bool {
        self.chart.is_some()
    }

    pub fn render(&self) -> Markup {
        html! {
            div.chart-surface id=(self.id) {
                @if let Some(chart) = self.chart() {
                    (chart.render())
                }
            }
        }
    }
}
