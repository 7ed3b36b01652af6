use crate::core::errors::Result;
use crate::core::models::journal_entry::JournalEntry;

/// Port for recording and querying per-target outcomes across runs.
pub trait Journal: Send + Sync {
    /// Append an entry.
    fn record(&self, entry: &JournalEntry) -> Result<()>;

    /// Query all entries, optionally filtered by target name and start time.
    fn query(
        &self,
        target: Option<&str>,
        since: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Vec<JournalEntry>>;
}
