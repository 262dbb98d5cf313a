//! Record file storage
//!
//! One append-only file holds every document of every collection as a
//! sequence of checksummed frames. The file is loaded whole at startup;
//! afterwards it is only ever appended to.

mod checksum;
mod errors;
mod record;
mod scan;
mod writer;

pub use errors::{StorageError, StorageResult};
pub use record::{FrameError, StoredRecord};
pub use scan::{load_records, FrameScan};
pub use writer::{AppendTarget, StorageWriter};
