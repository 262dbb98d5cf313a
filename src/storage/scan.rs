//! Startup load of the record file
//!
//! The file is read into memory in one go and split into frames. The first
//! bad frame ends the scan with a corruption error carrying its byte offset;
//! nothing after it is trusted.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::StoredRecord;

/// Every record in the file at `path`, in file order.
///
/// A missing file holds no records.
pub fn load_records(path: &Path) -> StorageResult<Vec<StoredRecord>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Open {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    FrameScan::new(&bytes).collect()
}

/// Iterator over the frames of an in-memory record file.
pub struct FrameScan<'a> {
    bytes: &'a [u8],
    pos: usize,
    halted: bool,
}

impl<'a> FrameScan<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            halted: false,
        }
    }
}

impl Iterator for FrameScan<'_> {
    type Item = StorageResult<StoredRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.pos == self.bytes.len() {
            return None;
        }

        match StoredRecord::decode(&self.bytes[self.pos..]) {
            Ok((record, used)) => {
                self.pos += used;
                Some(Ok(record))
            }
            Err(reason) => {
                self.halted = true;
                Some(Err(StorageError::Corrupt {
                    offset: self.pos as u64,
                    reason: reason.to_string(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_of(records: &[StoredRecord]) -> Vec<u8> {
        records.iter().flat_map(StoredRecord::encode).collect()
    }

    fn records() -> Vec<StoredRecord> {
        vec![
            StoredRecord::new("exectimes", 1, br#"{"lineage":"L1"}"#.to_vec()),
            StoredRecord::new("materializations", 1, br#"{"path":"/a"}"#.to_vec()),
            StoredRecord::new("exectimes", 2, br#"{"lineage":"L2"}"#.to_vec()),
        ]
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = load_records(&temp_dir.path().join("absent.db")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_loads_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.db");
        fs::write(&path, file_of(&records())).unwrap();

        assert_eq!(load_records(&path).unwrap(), records());
    }

    #[test]
    fn test_corruption_reports_frame_offset() {
        let mut bytes = file_of(&records());
        let second = records()[0].frame_len();
        bytes[second + 6] ^= 0xFF;

        let results: Vec<_> = FrameScan::new(&bytes).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(err @ StorageError::Corrupt { offset, .. }) => {
                assert_eq!(*offset, second as u64);
                assert!(err.is_fatal());
            }
            other => panic!("expected corruption, got {:?}", other),
        }
    }

    #[test]
    fn test_torn_tail_is_corruption() {
        let mut bytes = file_of(&records());
        bytes.truncate(bytes.len() - 5);

        let err = FrameScan::new(&bytes)
            .collect::<StorageResult<Vec<_>>>()
            .unwrap_err();
        assert_eq!(err.code(), "STATS_DATA_CORRUPTION");
    }
}
