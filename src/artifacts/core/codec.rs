//! Primitive encoders shared by every `.dat` payload
//!
//! Strings are a big-endian `u32` length followed by UTF-8 bytes; optional commit ids
//! are a presence byte followed by a big-endian `u64`.

use crate::artifacts::objects::commit_id::CommitId;
use anyhow::Context;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

pub fn write_str(writer: &mut impl Write, value: &str) -> anyhow::Result<()> {
    let len = u32::try_from(value.len()).context("string too long to encode")?;
    writer.write_u32::<NetworkEndian>(len)?;
    writer.write_all(value.as_bytes())?;

    Ok(())
}

pub fn read_str(reader: &mut impl Read) -> anyhow::Result<String> {
    let len = reader.read_u32::<NetworkEndian>()? as u64;

    let mut buffer = Vec::new();
    reader.take(len).read_to_end(&mut buffer)?;
    if buffer.len() as u64 != len {
        anyhow::bail!("truncated string: expected {} bytes, got {}", len, buffer.len());
    }

    String::from_utf8(buffer).context("invalid UTF-8 in encoded string")
}

pub fn write_count(writer: &mut impl Write, count: usize) -> anyhow::Result<()> {
    let count = u32::try_from(count).context("collection too large to encode")?;
    writer.write_u32::<NetworkEndian>(count)?;

    Ok(())
}

pub fn read_count(reader: &mut impl Read) -> anyhow::Result<usize> {
    Ok(reader.read_u32::<NetworkEndian>()? as usize)
}

pub fn write_lines(writer: &mut impl Write, lines: &[String]) -> anyhow::Result<()> {
    write_count(writer, lines.len())?;
    for line in lines {
        write_str(writer, line)?;
    }

    Ok(())
}

pub fn read_lines(reader: &mut impl Read) -> anyhow::Result<Vec<String>> {
    let count = read_count(reader)?;
    (0..count).map(|_| read_str(reader)).collect()
}

pub fn write_commit_id(writer: &mut impl Write, id: CommitId) -> anyhow::Result<()> {
    writer.write_u64::<NetworkEndian>(id.as_u64())?;

    Ok(())
}

pub fn read_commit_id(reader: &mut impl Read) -> anyhow::Result<CommitId> {
    Ok(CommitId::new(reader.read_u64::<NetworkEndian>()?))
}

pub fn write_optional_commit_id(
    writer: &mut impl Write,
    id: Option<CommitId>,
) -> anyhow::Result<()> {
    match id {
        Some(id) => {
            writer.write_u8(1)?;
            write_commit_id(writer, id)
        }
        None => {
            writer.write_u8(0)?;
            Ok(())
        }
    }
}

pub fn read_optional_commit_id(reader: &mut impl Read) -> anyhow::Result<Option<CommitId>> {
    match reader.read_u8()? {
        0 => Ok(None),
        1 => Ok(Some(read_commit_id(reader)?)),
        marker => anyhow::bail!("invalid presence marker {}", marker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn strings_and_ids_read_back_in_order() {
        let mut buffer = Vec::new();
        write_str(&mut buffer, "feature/login").unwrap();
        write_optional_commit_id(&mut buffer, None).unwrap();
        write_optional_commit_id(&mut buffer, Some(CommitId::new(7))).unwrap();
        write_lines(&mut buffer, &["a\n".to_string(), "b".to_string()]).unwrap();

        let mut reader = Cursor::new(buffer);
        assert_eq!(read_str(&mut reader).unwrap(), "feature/login");
        assert_eq!(read_optional_commit_id(&mut reader).unwrap(), None);
        assert_eq!(
            read_optional_commit_id(&mut reader).unwrap(),
            Some(CommitId::new(7))
        );
        assert_eq!(
            read_lines(&mut reader).unwrap(),
            vec!["a\n".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn truncated_string_is_rejected() {
        let mut buffer = Vec::new();
        write_str(&mut buffer, "abcdef").unwrap();
        buffer.truncate(buffer.len() - 2);

        assert!(read_str(&mut Cursor::new(buffer)).is_err());
    }

    #[test]
    fn unknown_presence_marker_is_rejected() {
        assert!(read_optional_commit_id(&mut Cursor::new(vec![9u8])).is_err());
    }
}
