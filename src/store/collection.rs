//! Collections and record handles

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// The two independent record collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Per-stage execution timings
    Exectimes,
    /// Materialized lineage artifacts
    Materializations,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Exectimes, Collection::Materializations];

    /// Name used on disk and as the JSON envelope key
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Exectimes => "exectimes",
            Collection::Materializations => "materializations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque identifier returned on insert.
///
/// Handles are assigned per collection, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordHandle(pub u64);

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory view of one collection, in store order.
#[derive(Debug, Default)]
pub(crate) struct CollectionData {
    records: Vec<(RecordHandle, Value)>,
    last_handle: u64,
}

impl CollectionData {
    pub(crate) fn next_handle(&self) -> RecordHandle {
        RecordHandle(self.last_handle + 1)
    }

    pub(crate) fn push(&mut self, handle: RecordHandle, record: Value) {
        self.last_handle = self.last_handle.max(handle.0);
        self.records.push((handle, record));
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.records.iter().map(|(_, record)| record)
    }

    pub(crate) fn matching<'a>(
        &'a self,
        field: &'a str,
        value: &'a Value,
    ) -> impl Iterator<Item = &'a Value> + 'a {
        self.values().filter(move |record| record.get(field) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names_roundtrip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_name(collection.name()), Some(collection));
        }
        assert_eq!(Collection::from_name("times"), None);
    }

    #[test]
    fn test_handles_follow_highest_seen() {
        let mut data = CollectionData::default();
        assert_eq!(data.next_handle(), RecordHandle(1));

        data.push(RecordHandle(4), json!({}));
        data.push(RecordHandle(2), json!({}));
        assert_eq!(data.next_handle(), RecordHandle(5));
    }

    #[test]
    fn test_matching_is_exact_equality() {
        let mut data = CollectionData::default();
        data.push(RecordHandle(1), json!({"lineage": "abc"}));
        data.push(RecordHandle(2), json!({"lineage": "abcd"}));
        data.push(RecordHandle(3), json!({"path": "abc"}));

        let needle = json!("abc");
        let expected = json!({"lineage": "abc"});
        let hits: Vec<_> = data.matching("lineage", &needle).collect();
        assert_eq!(hits, vec![&expected]);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(RecordHandle(42).to_string(), "42");
    }
}
