//! Core utilities and shared types
//!
//! - `codec`: primitive binary encoders for `.dat` payloads
//! - `checksum`: SHA-1 checksummed framing of every `.dat` file
//! - `persist`: locked appends and atomic rewrites
//! - `PagerWriter`: `Write` adapter over the minus pager

pub mod checksum;
pub mod codec;
pub mod persist;

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// Wrapper that implements `Write` for the minus pager
///
/// The minus pager doesn't implement `std::io::Write` directly, so this wrapper
/// adapts it to be compatible with Rust's standard I/O traits. Commands that print
/// the whole event log write through it when stdout is a terminal.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
