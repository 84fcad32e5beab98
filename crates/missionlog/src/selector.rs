use chrono::NaiveDate;

use crate::types::{LogCollection, LogEntry};

/// Shown in every per-day numeric field when the day has no report
pub const PLACEHOLDER: &str = "-";

pub const MISSING_REPORT_MESSAGE: &str = "No mission report found for this day.";

/// What the per-day panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedDayView {
    Report(LogEntry),
    Missing(NaiveDate),
}

impl SelectedDayView {
    pub fn date(&self) -> NaiveDate {
        match self {
            SelectedDayView::Report(entry) => entry.date,
            SelectedDayView::Missing(date) => *date,
        }
    }

    pub fn entry(&self) -> Option<&LogEntry> {
        match self {
            SelectedDayView::Report(entry) => Some(entry),
            SelectedDayView::Missing(_) => None,
        }
    }

    /// Display strings for the per-day fields
    pub fn fields(&self) -> DayFields {
        match self {
            SelectedDayView::Report(entry) => DayFields {
                date_display: entry.date.format("%b %-d, %Y").to_string(),
                message_date: entry.date.format("%b %-d").to_string(),
                titan: entry.titan_pts.to_string(),
                oracle: entry.oracle_pts.to_string(),
                sage: entry.sage_pts.to_string(),
                bonus: entry.bonus_pts.to_string(),
                total: entry.total().to_string(),
                message: entry.notes.clone(),
            },
            SelectedDayView::Missing(date) => DayFields {
                date_display: date.format("%b %-d, %Y").to_string(),
                message_date: "N/A".to_string(),
                titan: PLACEHOLDER.to_string(),
                oracle: PLACEHOLDER.to_string(),
                sage: PLACEHOLDER.to_string(),
                bonus: PLACEHOLDER.to_string(),
                total: PLACEHOLDER.to_string(),
                message: MISSING_REPORT_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFields {
    pub date_display: String,
    pub message_date: String,
    pub titan: String,
    pub oracle: String,
    pub sage: String,
    pub bonus: String,
    pub total: String,
    pub message: String,
}

/// Find the report for `date`. A miss is a normal state, not an error.
pub fn select_day(collection: &LogCollection, date: NaiveDate) -> SelectedDayView {
    collection
        .entries()
        .iter()
        .find(|entry| entry.date == date)
        .map(|entry| SelectedDayView::Report(entry.clone()))
        .unwrap_or(SelectedDayView::Missing(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_collection() -> LogCollection {
        LogCollection::new(vec![
            LogEntry::new(day("2024-01-01"), 10, 5, 5, 0, "ok".to_string()),
            LogEntry::new(day("2024-01-03"), 30, 20, 10, 5, "great day".to_string()),
        ])
    }

    #[test]
    fn test_select_existing_day() {
        let view = select_day(&sample_collection(), day("2024-01-03"));
        let entry = view.entry().unwrap();
        assert_eq!(entry.titan_pts, 30);
        assert_eq!(view.date(), day("2024-01-03"));
    }

    #[test]
    fn test_select_missing_day() {
        let view = select_day(&sample_collection(), day("2024-01-02"));
        assert_eq!(view, SelectedDayView::Missing(day("2024-01-02")));
        assert!(view.entry().is_none());
    }

    #[test]
    fn test_select_on_empty_collection() {
        let view = select_day(&LogCollection::default(), day("2024-01-01"));
        assert!(matches!(view, SelectedDayView::Missing(_)));
    }

    #[test]
    fn test_select_is_idempotent() {
        let collection = sample_collection();
        let first = select_day(&collection, day("2024-01-01")).fields();
        let second = select_day(&collection, day("2024-01-01")).fields();
        assert_eq!(first, second);

        let missing_a = select_day(&collection, day("2024-02-01")).fields();
        let missing_b = select_day(&collection, day("2024-02-01")).fields();
        assert_eq!(missing_a, missing_b);
    }

    #[test]
    fn test_report_fields() {
        let fields = select_day(&sample_collection(), day("2024-01-01")).fields();
        assert_eq!(fields.date_display, "Jan 1, 2024");
        assert_eq!(fields.message_date, "Jan 1");
        assert_eq!(fields.titan, "10");
        assert_eq!(fields.oracle, "5");
        assert_eq!(fields.sage, "5");
        assert_eq!(fields.bonus, "0");
        assert_eq!(fields.total, "20");
        assert_eq!(fields.message, "ok");
    }

    #[test]
    fn test_missing_fields_use_placeholder_everywhere() {
        let fields = select_day(&sample_collection(), day("2024-01-02")).fields();
        assert_eq!(fields.date_display, "Jan 2, 2024");
        assert_eq!(fields.message_date, "N/A");
        for value in [
            &fields.titan,
            &fields.oracle,
            &fields.sage,
            &fields.bonus,
            &fields.total,
        ] {
            assert_eq!(value, PLACEHOLDER);
        }
        assert_eq!(fields.message, MISSING_REPORT_MESSAGE);
    }
}
