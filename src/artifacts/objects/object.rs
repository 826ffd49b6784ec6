use crate::artifacts::core::checksum::Checksum;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Binary encoding of a record stored in a `.dat` file
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;

    /// The encoded record wrapped in a checksummed frame
    fn sealed(&self) -> Result<Bytes> {
        Ok(Checksum::seal(&self.serialize()?))
    }
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}
