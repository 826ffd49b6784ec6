use crate::areas::repository::Repository;
use crate::errors::CvsError;
use anyhow::Context;
use std::io::Write;
use tracing::info;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        let is_empty = std::fs::read_dir(self.path())
            .with_context(|| format!("Unable to list directory {}", self.path().display()))?
            .next()
            .is_none();
        if !is_empty {
            return Err(CvsError::DirectoryNotEmpty.into());
        }

        self.create_skeleton()
            .context("Failed to create the repository skeleton")?;
        info!(path = %self.path().display(), "repository initialized");

        writeln!(self.writer(), "Repository initialized.")?;

        Ok(())
    }
}
