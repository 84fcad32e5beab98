use anyhow::Result;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::presenter::{DashboardState, DayPanel, Presenter};
use crate::selector::{DayFields, PLACEHOLDER};

/// Write the dashboard as a standalone HTML file
pub fn generate_html(presenter: &Presenter, path: &Path) -> Result<()> {
    let html = presenter.render();
    fs::write(path, html.into_string())?;
    Ok(())
}

/// Render the full page, with `panel` filling the daily section
pub fn render_page(presenter: &Presenter, panel: DayPanel<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Mission Log" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    h1 { "Mission Log" }
                    (render_rank_card(presenter))
                    (render_day_panel(presenter, panel))
                    section.card.history-card {
                        h2 { "Recent Reports" }
                        (presenter.history_chart().render())
                    }
                }
                script { (PreEscaped(JAVASCRIPT)) }
            }
        }
    }
}

fn render_rank_card(presenter: &Presenter) -> Markup {
    let status = presenter.sync_status();
    let loaded = presenter.loaded();

    html! {
        section.card.rank-card {
            div.rank-header {
                @if let Some(log) = loaded {
                    span.rank-icon #"rankIcon" style={"color: " (log.standing.tier.color)} {
                        (log.standing.tier.glyph)
                    }
                }
                span.rank #"rank" { (presenter.rank_label()) }
            }
            div.total {
                span #"totalScore" {
                    @match loaded {
                        Some(log) => { (log.total_score) }
                        None => { (PLACEHOLDER) }
                    }
                }
                " XP"
            }
            @if let Some(log) = loaded {
                div.progress-track {
                    div.progress-bar #"rankProgress"
                        style={
                            "width: " (format!("{:.1}", log.standing.progress_percent())) "%; "
                            "background-color: " (log.standing.tier.color)
                        } {}
                }
                div.progress-label.max-rank[log.standing.is_max_rank()] {
                    (log.standing.progress_label())
                }
            }
            div.last-updated #"lastUpdated" {
                span.status-icon { (status.glyph()) }
                " "
                (status.message())
            }
        }
    }
}

fn render_day_panel(presenter: &Presenter, panel: DayPanel<'_>) -> Markup {
    let picker = panel.picker;
    if !matches!(presenter.state(), DashboardState::Ready(_)) {
        return html! {
            section.card.day-card {
                (render_date_form(picker.value, None, None))
            }
        };
    }

    let fields = panel.selected.map(|view| view.fields());

    html! {
        section.card.day-card {
            (render_date_form(picker.value, picker.min, picker.max))
            @if let Some(fields) = &fields {
                (render_day_fields(fields))
            }
            div.daily-chart-card.empty[!panel.chart.is_drawn()] {
                (panel.chart.render())
            }
        }
    }
}

fn render_date_form(
    value: chrono::NaiveDate,
    min: Option<chrono::NaiveDate>,
    max: Option<chrono::NaiveDate>,
) -> Markup {
    html! {
        form.date-form method="get" action="/" {
            label for="dateSelector" { "Mission date" }
            input #"dateSelector" type="date" name="date"
                value=(value.format("%Y-%m-%d").to_string())
                min=[min.map(|d| d.format("%Y-%m-%d").to_string())]
                max=[max.map(|d| d.format("%Y-%m-%d").to_string())];
        }
    }
}

fn render_day_fields(fields: &DayFields) -> Markup {
    html! {
        div.day-header {
            span #"selectedDateDisplay" { (fields.date_display) }
        }
        dl.day-fields {
            div.field.titan { dt { "TITAN" } dd #"dailyTitanPts" { (fields.titan) } }
            div.field.oracle { dt { "ORACLE" } dd #"dailyOraclePts" { (fields.oracle) } }
            div.field.sage { dt { "SAGE" } dd #"dailySagePts" { (fields.sage) } }
            div.field.bonus { dt { "Bonus" } dd #"dailyBonusPts" { (fields.bonus) } }
            div.field.total { dt { "Total" } dd #"dailyTotalPts" { (fields.total) } }
        }
        div.hq-message {
            div.hq-header {
                "Message from HQ · "
                span #"hqMessageDate" { (fields.message_date) }
            }
            p #"messageFromHq" { (fields.message) }
        }
    }
}

const CSS: &str = r#"
:root {
    --background: #0b0d12;
    --card-background: #141821;
    --border: #2a3140;
    --foreground: #e8ecf3;
    --muted-foreground: #8a93a6;
    --primary: #4f8cff;
    --accent-red: #ff5c6c;
    --accent-green: #3ddc97;
    --accent-orange: #ffa94d;
    --rank-recruit: #8a93a6;
    --rank-operative: #4f8cff;
    --rank-specialist: #b57bff;
    --rank-commander: #ffd24d;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    background: var(--background);
    color: var(--foreground);
    min-height: 100vh;
    line-height: 1.4;
}

.container {
    max-width: 960px;
    margin: 0 auto;
    padding: 40px 24px 60px;
    display: grid;
    gap: 24px;
}

h1 {
    font-weight: 900;
    font-size: 2.6em;
    letter-spacing: 0.08em;
    text-transform: uppercase;
}

h2 {
    font-size: 0.85em;
    text-transform: uppercase;
    letter-spacing: 0.12em;
    color: var(--muted-foreground);
    margin-bottom: 16px;
}

.card {
    background: var(--card-background);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 24px;
}

.rank-header {
    display: flex;
    align-items: center;
    gap: 12px;
    font-size: 1.6em;
    font-weight: 800;
    letter-spacing: 0.1em;
}

.total {
    color: var(--muted-foreground);
    margin: 8px 0 16px;
}

.progress-track {
    height: 8px;
    background: var(--border);
    border-radius: 4px;
    overflow: hidden;
}

.progress-bar {
    height: 100%;
    transition: width 0.4s;
}

.progress-label,
.last-updated {
    font-size: 0.8em;
    color: var(--muted-foreground);
    margin-top: 8px;
}

.date-form {
    display: flex;
    gap: 12px;
    align-items: center;
    margin-bottom: 16px;
}

.date-form input {
    background: var(--background);
    color: var(--foreground);
    border: 1px solid var(--border);
    border-radius: 4px;
    padding: 4px 8px;
}

.day-header {
    font-weight: 700;
    margin-bottom: 12px;
}

.day-fields {
    display: grid;
    grid-template-columns: repeat(5, 1fr);
    gap: 12px;
    margin-bottom: 16px;
}

.day-fields dt {
    font-size: 0.7em;
    color: var(--muted-foreground);
    letter-spacing: 0.1em;
}

.day-fields dd {
    font-size: 1.4em;
    font-weight: 700;
}

.field.titan dd { color: var(--accent-red); }
.field.oracle dd { color: var(--primary); }
.field.sage dd { color: var(--accent-green); }
.field.bonus dd { color: var(--accent-orange); }

.hq-message {
    border-left: 3px solid var(--primary);
    padding-left: 12px;
    margin-bottom: 16px;
}

.hq-header {
    font-size: 0.75em;
    color: var(--muted-foreground);
    text-transform: uppercase;
    letter-spacing: 0.1em;
}

.daily-chart-card.empty {
    display: none;
}

.chart-surface {
    max-width: 420px;
    margin: 0 auto;
}

.chart {
    width: 100%;
    height: auto;
}

.bar-label {
    font-size: 10px;
}

@media (max-width: 640px) {
    .day-fields {
        grid-template-columns: repeat(3, 1fr);
    }
}
"#;

const JAVASCRIPT: &str = r#"
// Reload the page for the picked day
const dateSelector = document.getElementById('dateSelector');
if (dateSelector) {
    dateSelector.addEventListener('change', () => dateSelector.form.submit());
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrievalError;
    use crate::types::{LogCollection, LogEntry};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn single_entry_presenter() -> Presenter {
        let collection = LogCollection::new(vec![LogEntry::new(
            day("2024-01-01"),
            10,
            5,
            5,
            0,
            "ok <b>".to_string(),
        )]);
        Presenter::from_result(Ok(collection), day("2024-06-01"))
    }

    #[test]
    fn test_render_ready_page() {
        let page = single_entry_presenter().render().into_string();

        assert!(page.contains("RECRUIT"));
        assert!(page.contains("20 / 250 XP to OPERATIVE"));
        assert!(page.contains("Last Synced: Jan 1, 2024"));
        assert!(page.contains(r#"id="dailyTotalPts">20<"#));
        assert!(page.contains(r#"min="2024-01-01""#));
        assert!(page.contains(r#"max="2024-01-01""#));
        assert!(page.contains("TITAN: 10 Points"));
        assert!(page.contains("Report: 1 Mon"));
        assert!(page.contains(r#"class="daily-chart-card""#));
    }

    #[test]
    fn test_render_escapes_notes() {
        let page = single_entry_presenter().render().into_string();
        assert!(page.contains("ok &lt;b&gt;"));
        assert!(!page.contains("ok <b>"));
    }

    #[test]
    fn test_render_progress_width() {
        let page = single_entry_presenter().render().into_string();
        // 20 of 250
        assert!(page.contains("width: 8.0%"));
    }

    #[test]
    fn test_render_missing_day() {
        let mut presenter = single_entry_presenter();
        presenter.select_date(day("2024-01-05"));
        let page = render_page(&presenter, presenter.day_panel()).into_string();

        assert!(page.contains("No mission report found for this day."));
        assert!(page.contains(r#"id="dailyTitanPts">-<"#));
        assert!(page.contains(r#"id="hqMessageDate">N/A<"#));
        assert!(!page.contains("doughnut-slice"));
        assert!(page.contains(r#"class="daily-chart-card empty""#));
    }

    #[test]
    fn test_render_empty_page() {
        let presenter = Presenter::from_result(Ok(LogCollection::default()), day("2024-06-01"));
        let page = render_page(&presenter, presenter.day_panel()).into_string();

        assert!(page.contains("No missions logged yet."));
        assert!(!page.contains("<svg"));
        assert!(page.contains(r#"value="2024-06-01""#));
        assert!(!page.contains("min="));
    }

    #[test]
    fn test_render_unavailable_page() {
        let err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let presenter =
            Presenter::from_result(Err(RetrievalError::Malformed(err)), day("2024-06-01"));
        let page = render_page(&presenter, presenter.day_panel()).into_string();

        assert!(page.contains("Connection Lost"));
        assert!(page.contains(">Error</span>"));
        assert!(!page.contains("<svg"));
    }

    #[test]
    fn test_generate_html_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.html");

        generate_html(&single_entry_presenter(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
    }
}
