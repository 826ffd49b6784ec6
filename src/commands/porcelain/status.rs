use crate::areas::repository::Repository;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::path_filter::PathFilter;
use crate::artifacts::status::tree_comparer::TreeChanges;
use crate::artifacts::status::working_state::WorkingState;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        self.check_repository()?;

        let graph = self.load_graph()?;
        self.print_position(&graph)?;

        let changes = self.compare(&PathFilter::empty())?;
        let state = WorkingState::from_parts(!self.index().is_empty()?, !changes.is_empty());

        if state.is_clean() {
            writeln!(self.writer(), "Current state of folder is saved.")?;
            writeln!(self.writer(), "Nothing to add, nothing to commit.")?;
        } else if state == WorkingState::STAGED {
            writeln!(self.writer(), "All tracked changes are added, commit them.")?;
        } else {
            self.print_changes(&changes)?;
            if state.contains(WorkingState::STAGED) {
                writeln!(
                    self.writer(),
                    "Some changes are already added, add the rest before committing."
                )?;
            }
        }

        Ok(())
    }

    fn print_position(&self, graph: &CommitGraph) -> anyhow::Result<()> {
        match graph.head_commit_info()? {
            Some(head) => {
                let tags = graph.tags_of(head.id()).collect::<Vec<_>>();
                let tags = match tags.is_empty() {
                    true => String::new(),
                    false => format!(" (tag: {})", tags.join(", ")),
                };
                writeln!(
                    self.writer(),
                    "On branch {}, HEAD at commit {}{}",
                    head.branch(),
                    head.id(),
                    tags
                )?;
            }
            None => writeln!(self.writer(), "No commits yet")?,
        }

        Ok(())
    }

    pub(crate) fn print_changes(&self, changes: &TreeChanges) -> anyhow::Result<()> {
        for change_type in FileChangeType::ALL {
            let paths = change_type.select(changes);
            if paths.is_empty() {
                continue;
            }

            writeln!(self.writer(), "{}", change_type.heading())?;
            for path in paths {
                writeln!(self.writer(), "{}{}", change_type, path.display())?;
            }
        }

        Ok(())
    }
}
