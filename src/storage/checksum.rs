//! CRC32 (IEEE) over a record frame

/// Checksum of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
