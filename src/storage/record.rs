//! Record frame
//!
//! ```text
//! | frame length u32 | collection length u32 | collection | handle u64 |
//! | body length u32  | body (JSON)           | crc32 u32  |
//! ```
//!
//! All integers little-endian. The CRC covers every byte before it,
//! the frame length included.

use thiserror::Error;

use super::checksum::compute_checksum;

/// Frame with an empty collection name and an empty body.
pub const MIN_FRAME_LEN: usize = 4 + 4 + 8 + 4 + 4;

/// Why a frame could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame needs {needed} bytes, {available} left in file")]
    Truncated { needed: usize, available: usize },

    #[error("impossible frame length {0}")]
    BadLength(usize),

    #[error("Checksum mismatch: computed {computed:08x}, stored {stored:08x}")]
    Checksum { computed: u32, stored: u32 },

    #[error("field lengths disagree with frame length")]
    Inconsistent,

    #[error("collection name is not UTF-8")]
    CollectionName,
}

/// One stored document and the collection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub collection: String,
    pub handle: u64,
    pub body: Vec<u8>,
}

impl StoredRecord {
    pub fn new(collection: impl Into<String>, handle: u64, body: Vec<u8>) -> Self {
        Self {
            collection: collection.into(),
            handle,
            body,
        }
    }

    /// Encoded frame length
    pub fn frame_len(&self) -> usize {
        MIN_FRAME_LEN + self.collection.len() + self.body.len()
    }

    /// Encode into a complete frame, checksum included.
    pub fn encode(&self) -> Vec<u8> {
        let frame_len = self.frame_len();
        let mut frame = Vec::with_capacity(frame_len);

        frame.extend_from_slice(&(frame_len as u32).to_le_bytes());
        frame.extend_from_slice(&(self.collection.len() as u32).to_le_bytes());
        frame.extend_from_slice(self.collection.as_bytes());
        frame.extend_from_slice(&self.handle.to_le_bytes());
        frame.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        frame.extend_from_slice(&self.body);

        let crc = compute_checksum(&frame);
        frame.extend_from_slice(&crc.to_le_bytes());
        frame
    }

    /// Decode the frame at the start of `bytes`.
    ///
    /// Returns the record and the frame length.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), FrameError> {
        let mut header = bytes;
        let frame_len = take_u32(&mut header)? as usize;

        if frame_len < MIN_FRAME_LEN {
            return Err(FrameError::BadLength(frame_len));
        }
        if frame_len > bytes.len() {
            return Err(FrameError::Truncated {
                needed: frame_len,
                available: bytes.len(),
            });
        }

        let (covered, crc) = bytes[..frame_len].split_at(frame_len - 4);
        let stored = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
        let computed = compute_checksum(covered);
        if stored != computed {
            return Err(FrameError::Checksum { computed, stored });
        }

        let mut rest = &covered[4..];
        let name_len = take_u32(&mut rest)? as usize;
        let name = take(&mut rest, name_len)?;
        let handle = u64::from_le_bytes(array(take(&mut rest, 8)?));
        let body_len = take_u32(&mut rest)? as usize;
        let body = take(&mut rest, body_len)?;
        if !rest.is_empty() {
            return Err(FrameError::Inconsistent);
        }

        let collection =
            String::from_utf8(name.to_vec()).map_err(|_| FrameError::CollectionName)?;

        Ok((Self::new(collection, handle, body.to_vec()), frame_len))
    }
}

fn take<'a>(bytes: &mut &'a [u8], n: usize) -> Result<&'a [u8], FrameError> {
    if bytes.len() < n {
        return Err(FrameError::Inconsistent);
    }
    let (head, tail) = bytes.split_at(n);
    *bytes = tail;
    Ok(head)
}

fn take_u32(bytes: &mut &[u8]) -> Result<u32, FrameError> {
    if bytes.len() < 4 {
        return Err(FrameError::Truncated {
            needed: 4,
            available: bytes.len(),
        });
    }
    Ok(u32::from_le_bytes(array(take(bytes, 4)?)))
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
