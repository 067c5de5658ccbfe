//! Substring search over the activity log.

use crate::store::{ActivityLog, FileRecord};

/// Shown instead of results when the query is blank.
pub const SEARCH_HINT: &str = "Type something like: invoice, aadhaar, bank statement, resume";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was empty.
    Hint(&'static str),
    /// Matching records, most recent first. May be empty.
    Matches(Vec<FileRecord>),
}

impl SearchOutcome {
    pub fn matches(&self) -> &[FileRecord] {
        match self {
            SearchOutcome::Hint(_) => &[],
            SearchOutcome::Matches(records) => records,
        }
    }
}

/// Whether any searchable field of `record` contains `needle`, which must
/// already be lowercase.
fn record_matches(record: &FileRecord, needle: &str) -> bool {
    [
        &record.original_file,
        &record.category,
        &record.reason,
        &record.preview,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Filters `records` (oldest first, as stored) by a case-insensitive
/// substring of filename, category, reason or preview.
pub fn search_records(records: &[FileRecord], query: &str) -> SearchOutcome {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchOutcome::Hint(SEARCH_HINT);
    }

    let matches = records
        .iter()
        .rev()
        .filter(|record| record_matches(record, &needle))
        .cloned()
        .collect();

    SearchOutcome::Matches(matches)
}

/// Searches the current contents of `log`.
pub fn search(log: &ActivityLog, query: &str) -> SearchOutcome {
    if query.trim().is_empty() {
        return SearchOutcome::Hint(SEARCH_HINT);
    }
    search_records(&log.all(), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};
    use tempfile::TempDir;

    fn noon() -> chrono::DateTime<Local> {
        Local::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .unwrap()
    }

    fn record(name: &str, category: &str, reason: &str, preview: &str, age_mins: i64) -> FileRecord {
        FileRecord {
            original_file: name.to_string(),
            new_path: format!("/org/{}/{}", category, name),
            category: category.to_string(),
            reason: reason.to_string(),
            summary: String::new(),
            time: noon() - Duration::minutes(age_mins),
            preview: preview.to_string(),
        }
    }

    fn fixture() -> Vec<FileRecord> {
        vec![
            record("scan001.pdf", "Bills", "electricity INVOICE", "", 30),
            record("Invoice_March.pdf", "Receipts", "store receipt", "", 20),
            record("notes.txt", "Work", "meeting notes", "Attached is the invoice total", 10),
            record("holiday.jpg", "Photos", "beach photo", "", 5),
        ]
    }

    #[test]
    fn test_blank_query_returns_hint() {
        assert_eq!(search_records(&fixture(), ""), SearchOutcome::Hint(SEARCH_HINT));
        assert_eq!(search_records(&fixture(), "   "), SearchOutcome::Hint(SEARCH_HINT));
        assert!(search_records(&fixture(), "").matches().is_empty());
    }

    #[test]
    fn test_matches_every_field_case_insensitively() {
        let outcome = search_records(&fixture(), "invoice");
        let names: Vec<_> = outcome
            .matches()
            .iter()
            .map(|r| r.original_file.as_str())
            .collect();
        // preview, filename, reason; newest first
        assert_eq!(names, vec!["notes.txt", "Invoice_March.pdf", "scan001.pdf"]);
    }

    #[test]
    fn test_category_match() {
        let outcome = search_records(&fixture(), "PHOTOS");
        assert_eq!(outcome.matches().len(), 1);
        assert_eq!(outcome.matches()[0].original_file, "holiday.jpg");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(
            search_records(&fixture(), "aadhaar"),
            SearchOutcome::Matches(Vec::new())
        );
    }

    #[test]
    fn test_new_path_is_not_searched() {
        let records = vec![record("a.txt", "Work", "r", "", 1)];
        // "org" appears only in new_path
        assert!(search_records(&records, "org").matches().is_empty());
    }

    #[test]
    fn test_search_reads_activity_log() {
        let temp_dir = TempDir::new().unwrap();
        let log = ActivityLog::new(temp_dir.path().join("memory.json"), 10);
        for r in fixture() {
            log.append(r).unwrap();
        }

        assert_eq!(search(&log, "beach").matches().len(), 1);
        assert!(matches!(search(&log, ""), SearchOutcome::Hint(_)));
    }
}
