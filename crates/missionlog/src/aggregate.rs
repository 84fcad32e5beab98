use crate::types::{LogCollection, LogEntry};

/// Totals over the whole log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSummary<'a> {
    pub total_score: u64,
    /// Last entry in collection order
    pub latest: &'a LogEntry,
    pub entry_count: usize,
}

/// Sum every point field across the collection and pick the most recently
/// synced entry. Returns `None` when there is nothing logged.
pub fn summarize(collection: &LogCollection) -> Option<LogSummary<'_>> {
    let latest = collection.last()?;
    let total_score = collection.entries().iter().map(LogEntry::total).sum();

    Some(LogSummary {
        total_score,
        latest,
        entry_count: collection.len(),
    })
}
