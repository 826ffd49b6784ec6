use crate::areas::journal::JournalEntry;
use crate::areas::repository::Repository;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::status::path_filter::PathFilter;
use crate::errors::CvsError;
use std::io::Write;
use tracing::info;

impl Repository {
    /// Turn the staged bundles into a new commit on top of HEAD
    pub fn commit(&self, tag: Option<&str>, comment: Option<&str>) -> anyhow::Result<()> {
        self.check_repository()?;

        if self.index().is_empty()? {
            return match self.compare(&PathFilter::empty())?.is_empty() {
                true => Err(CvsError::NothingToCommit.into()),
                false => Err(CvsError::AddChangesFirst.into()),
            };
        }

        let mut graph = self.load_graph()?;
        let id = graph.add_commit(tag.map(str::to_string))?;
        let branch = graph.commit_info(id)?.branch().clone();

        self.database().store_bundles(id, &self.index().load()?)?;
        self.save_graph(&graph)?;
        if let Some(tag) = tag {
            self.refs().append_tag(&Tag::new(tag.to_string(), id))?;
        }
        self.index().clear()?;

        self.journal().append(
            &JournalEntry::new(format!("Commit {}", id))
                .detail(format!("On branch {}", branch))
                .detail_if(tag.map(|tag| format!("Tag: {}", tag)))
                .detail_if(comment.map(|comment| format!("Comment: {}", comment))),
        )?;
        info!(commit = %id, %branch, "commit created");

        writeln!(self.writer(), "[{} {}] committed", branch, id)?;
        if let Some(tag) = tag {
            writeln!(self.writer(), "Committed with tag: {}.", tag)?;
        }
        if let Some(comment) = comment {
            writeln!(self.writer(), "Comment: {}.", comment)?;
        }

        Ok(())
    }
}
