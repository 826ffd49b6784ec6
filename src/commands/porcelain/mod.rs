//! User-facing commands
//!
//! Each command is an `impl Repository` block and checks the repository before
//! doing anything else. Commands that move HEAD require a clean working tree
//! and write the graph tables only after the working tree and the mirror have
//! been migrated.
//!
//! ## Commands
//!
//! - `init`: Create the control directory in an empty folder
//! - `add`: Stage working-tree changes as a delta bundle
//! - `commit`: Turn the staged bundles into a commit
//! - `status`: Show branch, HEAD and pending changes
//! - `reset`: Move HEAD back to an ancestor, truncating the branch
//! - `switch`: Move HEAD to any commit, keeping history
//! - `branch`: List branches or fork a new one from HEAD
//! - `checkout`: Move HEAD to the tip of a branch
//! - `log`: Print or clear the event log

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod reset;
pub mod status;
pub mod switch;
