use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn log(&self) -> anyhow::Result<()> {
        self.check_repository()?;

        let events = self.journal().read()?;
        if events.is_empty() {
            writeln!(self.writer(), "Log is empty")?;
        } else {
            write!(self.writer(), "{}", events)?;
        }

        Ok(())
    }

    pub fn clear_log(&self) -> anyhow::Result<()> {
        self.check_repository()?;
        self.journal().clear()?;

        writeln!(self.writer(), "Log cleared")?;

        Ok(())
    }
}
