//! Human-readable event log (`.cvs/logs.txt`)
//!
//! Every state-changing command appends one block:
//!
//! ```text
//! [2026-10-15T09:12:44+02:00] Commit 3
//! On branch main
//! Tag: v2
//!
//! ```
//!
//! The log is informational only; nothing reads it back for recovery.

use crate::artifacts::core::persist;
use anyhow::Context;
use std::path::Path;

pub const JOURNAL_FILE: &str = "logs.txt";

/// One logged event: a headline plus detail lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    headline: String,
    details: Vec<String>,
}

impl JournalEntry {
    pub fn new(headline: impl Into<String>) -> Self {
        JournalEntry {
            headline: headline.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    pub fn detail_if(self, line: Option<String>) -> Self {
        match line {
            Some(line) => self.detail(line),
            None => self,
        }
    }

    fn render(&self, timestamp: chrono::DateTime<chrono::FixedOffset>) -> String {
        let mut block = format!("[{}] {}\n", timestamp.to_rfc3339(), self.headline);
        for line in &self.details {
            block.push_str(line);
            block.push('\n');
        }
        block.push('\n');

        block
    }
}

#[derive(Debug)]
pub struct Journal {
    path: Box<Path>,
}

impl Journal {
    pub fn new(path: Box<Path>) -> Self {
        Journal { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &JournalEntry) -> anyhow::Result<()> {
        let block = entry.render(chrono::Local::now().fixed_offset());

        persist::append_locked(self.path(), block.as_bytes())
    }

    pub fn read(&self) -> anyhow::Result<String> {
        std::fs::read_to_string(self.path())
            .with_context(|| format!("Unable to read {}", self.path.display()))
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        persist::truncate(self.path())
    }
}
