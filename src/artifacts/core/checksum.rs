//! Checksummed frames
//!
//! Every `.dat` file is a sequence of frames:
//!
//! ```text
//! length  (4 bytes, big-endian)
//! payload (length bytes)
//! SHA-1 of payload (20 bytes)
//! ```
//!
//! Append-only files (index, tags) simply concatenate frames.

use byteorder::{ByteOrder, NetworkEndian};
use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the frame length prefix in bytes
pub const LENGTH_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame at offset {offset} is truncated")]
    Truncated { offset: usize },
    #[error("frame at offset {offset} failed checksum verification")]
    ChecksumMismatch { offset: usize },
}

pub struct Checksum;

impl Checksum {
    pub fn digest(payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
        let mut hasher = Sha1::new();
        hasher.update(payload);
        hasher.finalize().into()
    }

    /// Wrap a payload into a frame
    pub fn seal(payload: &[u8]) -> Bytes {
        let mut frame = BytesMut::with_capacity(LENGTH_SIZE + payload.len() + CHECKSUM_SIZE);
        frame.put_u32(payload.len() as u32);
        frame.put_slice(payload);
        frame.put_slice(&Self::digest(payload));

        frame.freeze()
    }

    /// Split a buffer into verified frame payloads
    pub fn open(data: &Bytes) -> Result<Vec<Bytes>, FrameError> {
        let mut payloads = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            if data.len() - offset < LENGTH_SIZE {
                return Err(FrameError::Truncated { offset });
            }

            let len = NetworkEndian::read_u32(&data[offset..offset + LENGTH_SIZE]) as usize;
            let payload_start = offset + LENGTH_SIZE;
            let payload_end = payload_start + len;

            if data.len() < payload_end + CHECKSUM_SIZE {
                return Err(FrameError::Truncated { offset });
            }

            let payload = data.slice(payload_start..payload_end);
            if Self::digest(&payload)[..] != data[payload_end..payload_end + CHECKSUM_SIZE] {
                return Err(FrameError::ChecksumMismatch { offset });
            }

            payloads.push(payload);
            offset = payload_end + CHECKSUM_SIZE;
        }

        Ok(payloads)
    }
}
