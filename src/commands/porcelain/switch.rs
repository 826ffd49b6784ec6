use crate::areas::journal::JournalEntry;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::graph::path_resolver::PathResolver;
use crate::errors::CvsError;
use std::io::Write;
use tracing::info;

impl Repository {
    /// Move HEAD to a tagged commit or a number of steps along history
    ///
    /// Unlike `reset`, no branch is cut: every commit stays reachable.
    pub fn switch(&self, revision: &Revision) -> anyhow::Result<()> {
        self.check_repository()?;
        self.ensure_clean()?;

        let mut graph = self.load_graph()?;
        let head = graph.head().ok_or(CvsError::NoCommits)?;
        let branch = graph.commit_info(head)?.branch().clone();

        let (route, target) = PathResolver::new(&graph).route_to(head, revision)?;
        for run in route.runs() {
            info!(direction = ?run[0].direction, steps = run.len(), "replaying run");
        }

        self.migrate(&route)?;
        graph.move_head(target, &branch)?;
        self.save_graph(&graph)?;

        let landed_on = graph.commit_info(target)?.branch().clone();
        self.journal().append(
            &JournalEntry::new(format!("Switch on commit {}", target))
                .detail(format!("On branch {}", landed_on)),
        )?;

        writeln!(
            self.writer(),
            "HEAD is now at commit {} on branch {}",
            target, landed_on
        )?;

        Ok(())
    }
}
