//! Append-only writer
//!
//! An append is acknowledged only after the frame is on disk. If the write
//! or the fsync fails, the file is cut back to its last acknowledged length
//! so a partial frame never survives to the next startup.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::StoredRecord;

/// Byte sink the writer appends to.
pub trait AppendTarget: Write {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_all()
    }
}

/// Owns the record file for appends.
pub struct StorageWriter<T: AppendTarget = File> {
    target: T,
    /// Length of the file covered by acknowledged appends
    committed: u64,
    /// Set when a rollback failed; no further appends are accepted
    broken: bool,
}

impl StorageWriter<File> {
    /// Opens or creates the record file, creating parent directories.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let open_err = |source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;
        let committed = file.metadata().map_err(open_err)?.len();

        Ok(Self::with_target(file, committed))
    }
}

impl<T: AppendTarget> StorageWriter<T> {
    fn with_target(target: T, committed: u64) -> Self {
        Self {
            target,
            committed,
            broken: false,
        }
    }

    /// Appends one frame and fsyncs it.
    pub fn append(&mut self, record: &StoredRecord) -> StorageResult<()> {
        if self.broken {
            return Err(StorageError::Unwritable {
                len: self.committed,
                source: io::Error::new(io::ErrorKind::Other, "earlier rollback failed"),
            });
        }

        let frame = record.encode();
        let written = self
            .target
            .write_all(&frame)
            .and_then(|()| self.target.sync());

        match written {
            Ok(()) => {
                self.committed += frame.len() as u64;
                Ok(())
            }
            Err(source) => {
                self.roll_back()?;
                Err(StorageError::Write {
                    record: format!("{}:{}", record.collection, record.handle),
                    source,
                })
            }
        }
    }

    fn roll_back(&mut self) -> StorageResult<()> {
        self.target.truncate(self.committed).map_err(|source| {
            self.broken = true;
            tracing::error!(event = "rollback_failed", len = self.committed, error = %source);
            StorageError::Unwritable {
                len: self.committed,
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FrameScan;
    use tempfile::TempDir;

    fn record(handle: u64) -> StoredRecord {
        StoredRecord::new("exectimes", handle, br#"{"lineage":"L1"}"#.to_vec())
    }

    /// In-memory target that accepts `budget` bytes, then fails.
    #[derive(Default)]
    struct ShortDisk {
        bytes: Vec<u8>,
        budget: Option<usize>,
        fail_sync: bool,
        fail_truncate: bool,
    }

    impl Write for ShortDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = match self.budget {
                Some(0) => return Err(io::Error::new(io::ErrorKind::Other, "disk full")),
                Some(left) => left.min(buf.len()),
                None => buf.len(),
            };
            self.bytes.extend_from_slice(&buf[..room]);
            if let Some(left) = self.budget.as_mut() {
                *left -= room;
            }
            Ok(room)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl AppendTarget for ShortDisk {
        fn sync(&mut self) -> io::Result<()> {
            if self.fail_sync {
                return Err(io::Error::new(io::ErrorKind::Other, "fsync failed"));
            }
            Ok(())
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            if self.fail_truncate {
                return Err(io::Error::new(io::ErrorKind::Other, "read-only"));
            }
            self.bytes.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("stats.db");

        StorageWriter::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_reopen_appends_after_existing_frames() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.db");

        StorageWriter::open(&path).unwrap().append(&record(1)).unwrap();
        StorageWriter::open(&path).unwrap().append(&record(2)).unwrap();

        let bytes = fs::read(&path).unwrap();
        let handles: Vec<u64> = FrameScan::new(&bytes).map(|r| r.unwrap().handle).collect();
        assert_eq!(handles, vec![1, 2]);
    }

    #[test]
    fn test_partial_write_is_rolled_back() {
        let mut writer = StorageWriter::with_target(ShortDisk::default(), 0);
        writer.append(&record(1)).unwrap();
        let committed = writer.target.bytes.len();

        writer.target.budget = Some(10);
        let err = writer.append(&record(2)).unwrap_err();
        assert_eq!(err.code(), "STATS_STORAGE_WRITE_FAILED");
        assert!(!err.is_fatal());
        assert_eq!(writer.target.bytes.len(), committed);

        writer.target.budget = None;
        writer.append(&record(3)).unwrap();

        let handles: Vec<u64> = FrameScan::new(&writer.target.bytes)
            .map(|r| r.unwrap().handle)
            .collect();
        assert_eq!(handles, vec![1, 3]);
    }

    #[test]
    fn test_failed_fsync_is_rolled_back() {
        let mut writer = StorageWriter::with_target(ShortDisk::default(), 0);
        writer.target.fail_sync = true;

        assert!(writer.append(&record(1)).is_err());
        assert!(writer.target.bytes.is_empty());
    }

    #[test]
    fn test_failed_rollback_stops_appends() {
        let mut writer = StorageWriter::with_target(ShortDisk::default(), 0);
        writer.target.fail_sync = true;
        writer.target.fail_truncate = true;

        let err = writer.append(&record(1)).unwrap_err();
        assert_eq!(err.code(), "STATS_STORAGE_UNWRITABLE");

        writer.target.fail_sync = false;
        let err = writer.append(&record(2)).unwrap_err();
        assert!(err.is_fatal());
    }
}
