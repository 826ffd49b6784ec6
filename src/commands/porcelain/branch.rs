use crate::areas::journal::JournalEntry;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::CvsError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// List branches, or fork `name` from HEAD
    pub fn branch(&self, name: Option<&str>) -> anyhow::Result<()> {
        self.check_repository()?;

        match name {
            Some(name) => self.create_branch(name),
            None => self.list_branches(),
        }
    }

    fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;

        let mut graph = self.load_graph()?;
        graph.create_branch(branch.clone())?;
        let head = graph.head().ok_or(CvsError::NoCommits)?;
        self.save_graph(&graph)?;

        self.journal().append(
            &JournalEntry::new(format!("Branch {} created", branch))
                .detail(format!("From commit {}", head)),
        )?;
        writeln!(self.writer(), "Branch '{}' added at commit {}", branch, head)?;

        Ok(())
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        if graph.branches().is_empty() {
            return Err(CvsError::NoCommits.into());
        }

        let current = graph.current_branch()?;
        for (branch, tip) in graph.branches() {
            if current.as_ref() == Some(branch) {
                writeln!(self.writer(), "* {} -> {}", branch.as_ref().green(), tip)?;
            } else {
                writeln!(self.writer(), "  {} -> {}", branch, tip)?;
            }
        }

        Ok(())
    }
}
