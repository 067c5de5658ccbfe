use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Category assigned to files routed to the duplicates bucket.
pub const DUPLICATES_CATEGORY: &str = "Duplicates";

/// One organized or duplicated file, as persisted in the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Base name as first observed in the watch folder.
    pub original_file: String,
    /// Absolute destination after placement.
    pub new_path: String,
    pub category: String,
    pub reason: String,
    #[serde(default)]
    pub summary: String,
    pub time: DateTime<Local>,
    /// Truncated extracted text, used by search.
    #[serde(default)]
    pub preview: String,
}

impl FileRecord {
    /// Whether this record describes a file sent to the duplicates bucket.
    pub fn is_duplicate(&self) -> bool {
        self.category == DUPLICATES_CATEGORY
    }

    /// Whether the record was created on the given local calendar day.
    pub fn is_on(&self, day: chrono::NaiveDate) -> bool {
        self.time.date_naive() == day
    }
}
