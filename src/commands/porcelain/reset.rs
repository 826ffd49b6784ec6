use crate::areas::journal::JournalEntry;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::graph::path_resolver::PathResolver;
use crate::errors::CvsError;
use std::io::Write;
use tracing::info;

impl Repository {
    /// Move HEAD back to an ancestor and cut the current branch there
    ///
    /// The commits walked past stay in the commit table but no branch reaches
    /// them any more.
    pub fn reset(&self, revision: &Revision) -> anyhow::Result<()> {
        self.check_repository()?;
        self.ensure_clean()?;

        let mut graph = self.load_graph()?;
        let head = graph.head().ok_or(CvsError::NoCommits)?;
        let branch = graph.commit_info(head)?.branch().clone();

        let resolver = PathResolver::new(&graph);
        let (route, target) = match revision {
            Revision::Tag(tag) => {
                let target = graph.resolve_tag(tag)?;
                (resolver.backward_to(head, target)?, target)
            }
            Revision::Back(count) => resolver.steps_back(head, *count)?,
            Revision::Forward(_) => return Err(CvsError::MissingTarget.into()),
        };

        // resetting onto HEAD itself must keep whatever follows it on the branch
        if target != head {
            self.migrate(&route)?;
            graph.truncate_to(target, &branch)?;
            self.save_graph(&graph)?;
        }

        let detail = match revision {
            Revision::Tag(tag) => format!("With tag {}", tag),
            Revision::Back(count) | Revision::Forward(count) => format!("{} steps back", count),
        };
        self.journal()
            .append(&JournalEntry::new(format!("Reset on commit {}", target)).detail(detail))?;
        info!(from = %head, to = %target, %branch, "reset");

        writeln!(self.writer(), "HEAD is now at commit {} on branch {}", target, branch)?;

        Ok(())
    }
}
