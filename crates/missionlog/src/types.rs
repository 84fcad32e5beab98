use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single daily mission report
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct LogEntry {
    /// Calendar day of the report. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(
        deserialize_with = "deserialize_log_date",
        serialize_with = "serialize_log_date"
    )]
    pub date: NaiveDate,

    pub titan_pts: u32,
    pub oracle_pts: u32,
    pub sage_pts: u32,
    pub bonus_pts: u32,

    /// Message from HQ for the day
    #[serde(default)]
    pub notes: String,
}

impl LogEntry {
    #[cfg(test)]
    pub fn new(
        date: NaiveDate,
        titan_pts: u32,
        oracle_pts: u32,
        sage_pts: u32,
        bonus_pts: u32,
        notes: String,
    ) -> Self {
        Self {
            date,
            titan_pts,
            oracle_pts,
            sage_pts,
            bonus_pts,
            notes,
        }
    }

    /// Sum of the four point fields
    pub fn total(&self) -> u64 {
        u64::from(self.titan_pts)
            + u64::from(self.oracle_pts)
            + u64::from(self.sage_pts)
            + u64::from(self.bonus_pts)
    }
}

/// Parse a log date. Plain dates are taken as-is; timestamps are reduced to
/// their UTC calendar day.
pub fn parse_log_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}

fn deserialize_log_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_log_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid log date: {raw:?}")))
}

fn serialize_log_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

/// The document as published: `{"logs": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogDocument {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// Ordered sequence of log entries, oldest first.
///
/// Order is taken from the document and never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogCollection {
    entries: Vec<LogEntry>,
}

impl LogCollection {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&LogEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Earliest and latest dates, for bounding the date picker
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }
}

impl From<LogDocument> for LogCollection {
    fn from(doc: LogDocument) -> Self {
        Self::new(doc.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_log_entry_total() {
        let entry = LogEntry::new(day(2024, 1, 1), 10, 5, 5, 3, "ok".to_string());
        assert_eq!(entry.total(), 23);
    }

    #[test]
    fn test_log_entry_total_does_not_overflow() {
        let entry = LogEntry::new(day(2024, 1, 1), u32::MAX, u32::MAX, 0, 0, String::new());
        assert_eq!(entry.total(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_parse_log_date_plain() {
        assert_eq!(parse_log_date("2024-01-01"), Some(day(2024, 1, 1)));
        assert_eq!(parse_log_date(" 2024-03-09 "), Some(day(2024, 3, 9)));
    }

    #[test]
    fn test_parse_log_date_timestamp_uses_utc_day() {
        assert_eq!(
            parse_log_date("2024-01-01T23:30:00-02:00"),
            Some(day(2024, 1, 2))
        );
        assert_eq!(parse_log_date("2024-01-01T08:00:00Z"), Some(day(2024, 1, 1)));
    }

    #[test]
    fn test_parse_log_date_invalid() {
        assert_eq!(parse_log_date("yesterday"), None);
        assert_eq!(parse_log_date(""), None);
        assert_eq!(parse_log_date("2024-13-01"), None);
    }

    #[test]
    fn test_log_entry_deserialization() {
        let json = r#"{"date":"2024-01-01","titan_pts":10,"oracle_pts":5,"sage_pts":5,"bonus_pts":0,"notes":"ok"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.date, day(2024, 1, 1));
        assert_eq!(entry.titan_pts, 10);
        assert_eq!(entry.oracle_pts, 5);
        assert_eq!(entry.sage_pts, 5);
        assert_eq!(entry.bonus_pts, 0);
        assert_eq!(entry.notes, "ok");
    }

    #[test]
    fn test_log_entry_missing_notes_defaults_empty() {
        let json = r#"{"date":"2024-01-01","titan_pts":1,"oracle_pts":2,"sage_pts":3,"bonus_pts":4}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.notes.is_empty());
    }

    #[test]
    fn test_log_entry_rejects_negative_points() {
        let json = r#"{"date":"2024-01-01","titan_pts":-1,"oracle_pts":2,"sage_pts":3,"bonus_pts":4}"#;
        assert!(serde_json::from_str::<LogEntry>(json).is_err());
    }

    #[test]
    fn test_log_entry_rejects_bad_date() {
        let json = r#"{"date":"soon","titan_pts":1,"oracle_pts":2,"sage_pts":3,"bonus_pts":4}"#;
        let err = serde_json::from_str::<LogEntry>(json).unwrap_err();
        assert!(err.to_string().contains("invalid log date"));
    }

    #[test]
    fn test_log_entry_serializes_plain_date() {
        let entry = LogEntry::new(day(2024, 2, 29), 1, 1, 1, 1, "leap".to_string());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"date\":\"2024-02-29\""));
        assert!(json.contains("\"notes\":\"leap\""));
    }

    #[test]
    fn test_document_without_logs_is_empty() {
        let doc: LogDocument = serde_json::from_str("{}").unwrap();
        let collection = LogCollection::from(doc);
        assert!(collection.is_empty());
        assert_eq!(collection.date_bounds(), None);
    }

    #[test]
    fn test_collection_keeps_document_order() {
        let collection = LogCollection::new(vec![
            LogEntry::new(day(2024, 1, 5), 1, 0, 0, 0, String::new()),
            LogEntry::new(day(2024, 1, 2), 2, 0, 0, 0, String::new()),
        ]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.first().unwrap().date, day(2024, 1, 5));
        assert_eq!(collection.last().unwrap().date, day(2024, 1, 2));
    }

    #[test]
    fn test_collection_date_bounds() {
        let collection = LogCollection::new(vec![
            LogEntry::new(day(2024, 1, 1), 0, 0, 0, 0, String::new()),
            LogEntry::new(day(2024, 1, 2), 0, 0, 0, 0, String::new()),
            LogEntry::new(day(2024, 1, 9), 0, 0, 0, 0, String::new()),
        ]);
        assert_eq!(
            collection.date_bounds(),
            Some((day(2024, 1, 1), day(2024, 1, 9)))
        );
    }
}
