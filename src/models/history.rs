use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::content::ContentRecord;

/// One snapshot in the per-session version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModificationHistoryEntry {
    /// 1-based, contiguous, strictly increasing.
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub content: ContentRecord,
    /// The free-text edit instruction that produced this version.
    /// Absent for version 1.
    pub user_request: Option<String>,
    /// True only for version 1, which is always the first entry.
    pub is_original: bool,
}

/// Append-only log of content snapshots for one session.
///
/// Version numbers are contiguous and monotonically increasing. Restoring an
/// old version never deletes or reorders prior entries — history only grows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionLedger {
    entries: Vec<ModificationHistoryEntry>,
}

impl VersionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ModificationHistoryEntry] {
        &self.entries
    }

    /// The original (version 1) snapshot, if any.
    pub fn original(&self) -> Option<&ModificationHistoryEntry> {
        self.entries.first().filter(|e| e.is_original)
    }

    /// The latest snapshot, if any.
    pub fn latest(&self) -> Option<&ModificationHistoryEntry> {
        self.entries.last()
    }

    /// Append a snapshot, assigning the next version number and timestamping
    /// it. The entry is marked original only when the ledger was empty.
    pub fn append(
        &mut self,
        content: ContentRecord,
        user_request: Option<String>,
    ) -> &ModificationHistoryEntry {
        let version = self.entries.len() as u32 + 1;
        let is_original = self.entries.is_empty();
        self.entries.push(ModificationHistoryEntry {
            version,
            timestamp: Utc::now(),
            content,
            user_request: if is_original { None } else { user_request },
            is_original,
        });
        self.entries.last().expect("entry just pushed")
    }

    /// Read-only snapshot fetch. No mutation on any path.
    pub fn preview(&self, version: u32) -> Result<&ModificationHistoryEntry, HistoryError> {
        self.entry_at(version)
    }

    /// Copy the content of `version` and append it as a new latest version.
    /// History is never truncated; the restored entry gets the next version
    /// number.
    pub fn restore_as_new_version(
        &mut self,
        version: u32,
    ) -> Result<&ModificationHistoryEntry, HistoryError> {
        let content = self.entry_at(version)?.content.clone();
        let request = format!("Restore version {version}");
        Ok(self.append(content, Some(request)))
    }

    fn entry_at(&self, version: u32) -> Result<&ModificationHistoryEntry, HistoryError> {
        if version == 0 || version as usize > self.entries.len() {
            return Err(HistoryError::OutOfRange {
                version,
                len: self.entries.len(),
            });
        }
        Ok(&self.entries[version as usize - 1])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Version {version} is out of range (history holds {len} versions)")]
    OutOfRange { version: u32, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(caption: &str) -> ContentRecord {
        ContentRecord {
            caption: caption.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_append_is_original() {
        let mut ledger = VersionLedger::new();
        ledger.append(record("v1"), Some("ignored for the original".to_string()));
        let entry = ledger.preview(1).unwrap();
        assert!(entry.is_original);
        assert_eq!(entry.version, 1);
        assert!(entry.user_request.is_none());
    }

    #[test]
    fn test_versions_contiguous_and_single_original() {
        let mut ledger = VersionLedger::new();
        ledger.append(record("v1"), None);
        ledger.append(record("v2"), Some("tighten the hook".to_string()));
        ledger.append(record("v3"), Some("shorter caption".to_string()));

        let versions: Vec<u32> = ledger.entries().iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(ledger.entries().iter().filter(|e| e.is_original).count(), 1);
        assert!(ledger.entries()[0].is_original);
    }

    #[test]
    fn test_restore_appends_without_truncating() {
        let mut ledger = VersionLedger::new();
        ledger.append(record("v1"), None);
        ledger.append(record("v2"), Some("edit".to_string()));

        let restored = ledger.restore_as_new_version(1).unwrap();
        assert_eq!(restored.version, 3);
        assert_eq!(restored.content.caption, "v1");
        assert_eq!(ledger.len(), 3);
        // Prior entries untouched.
        assert_eq!(ledger.preview(2).unwrap().content.caption, "v2");
    }

    #[test]
    fn test_restore_twice_grows_by_one_each_time() {
        let mut ledger = VersionLedger::new();
        ledger.append(record("v1"), None);
        ledger.append(record("v2"), Some("edit".to_string()));

        ledger.restore_as_new_version(1).unwrap();
        ledger.restore_as_new_version(1).unwrap();

        assert_eq!(ledger.len(), 4);
        assert_eq!(
            ledger.preview(3).unwrap().content,
            ledger.preview(4).unwrap().content
        );
        assert_eq!(ledger.preview(4).unwrap().version, 4);
    }

    #[test]
    fn test_out_of_range_rejected_before_mutation() {
        let mut ledger = VersionLedger::new();
        ledger.append(record("v1"), None);

        assert!(matches!(
            ledger.preview(0),
            Err(HistoryError::OutOfRange { version: 0, .. })
        ));
        assert!(ledger.restore_as_new_version(2).is_err());
        assert_eq!(ledger.len(), 1);
    }
}
