use crate::areas::journal::JournalEntry;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::graph::path_resolver::PathResolver;
use crate::errors::CvsError;
use std::io::Write;
use tracing::info;

impl Repository {
    /// Move HEAD to the recorded tip of `branch_name`
    pub fn checkout(&self, branch_name: &str) -> anyhow::Result<()> {
        self.check_repository()?;
        let branch = BranchName::try_parse(branch_name.to_string())?;
        self.ensure_clean()?;

        let mut graph = self.load_graph()?;
        let head = graph.head().ok_or(CvsError::NoCommits)?;
        let current = graph.commit_info(head)?.branch().clone();
        let tip = graph.branch_tip(&branch)?;

        let route = PathResolver::new(&graph).resolve(head, tip)?;
        self.migrate(&route)?;
        graph.check_out(&branch)?;
        self.save_graph(&graph)?;

        self.journal()
            .append(&JournalEntry::new(format!("Checkout on branch {}", branch)))?;
        info!(%branch, commit = %tip, steps = route.steps().len(), "checked out");

        if current == branch && head == tip {
            writeln!(self.writer(), "Already on '{}'", branch)?;
        } else {
            writeln!(self.writer(), "Switched to branch '{}' at commit {}", branch, tip)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::porcelain::fixtures::{Sandbox, sandbox};
    use crate::errors::{CvsError, ErrorKind, error_kind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn checkout_returns_to_the_fork_point_content(sandbox: Sandbox) {
        sandbox.commit_files(&[("f.txt", "one\n")], None);
        let c2 = sandbox.commit_files(&[("f.txt", "one\ntwo\n")], None);
        sandbox.repository.branch(Some("feature")).unwrap();
        let c3 = sandbox.commit_files(&[("f.txt", "one\ntwo\nthree\n"), ("new.txt", "n\n")], None);

        sandbox.repository.checkout("main").unwrap();

        assert_eq!(sandbox.head(), c2);
        assert_eq!(sandbox.read("f.txt"), "one\ntwo\n");
        assert!(!sandbox.exists("new.txt"));

        sandbox.repository.checkout("feature").unwrap();

        assert_eq!(sandbox.head(), c3);
        assert_eq!(sandbox.read("new.txt"), "n\n");
    }

    #[rstest]
    fn committing_after_checkout_continues_that_branch(sandbox: Sandbox) {
        let c0 = sandbox.commit_files(&[("f.txt", "a\n")], None);
        sandbox.repository.branch(Some("feature")).unwrap();
        sandbox.commit_files(&[("f.txt", "feature\n")], None);
        sandbox.repository.checkout("main").unwrap();

        let c2 = sandbox.commit_files(&[("f.txt", "main\n")], None);

        let graph = sandbox.repository.load_graph().unwrap();
        assert_eq!(graph.commit_info(c2).unwrap().prev(), Some(c0));
        assert_eq!(graph.commit_info(c2).unwrap().branch().as_ref(), "main");
        assert_eq!(graph.branches().len(), 2);
    }

    #[rstest]
    fn unknown_branch_is_a_branch_error(sandbox: Sandbox) {
        sandbox.commit_files(&[("f.txt", "a\n")], None);

        let error = sandbox.repository.checkout("nope").unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::Branch));
    }

    #[rstest]
    fn checkout_refuses_staged_changes(sandbox: Sandbox) {
        sandbox.commit_files(&[("f.txt", "a\n")], None);
        sandbox.write("g.txt", "g\n");
        sandbox.repository.add(&[]).unwrap();

        let error = sandbox.repository.checkout("main").unwrap_err();

        assert!(matches!(
            error.downcast_ref::<CvsError>(),
            Some(CvsError::UncommittedChanges)
        ));
    }
}
