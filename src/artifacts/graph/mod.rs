//! Commit history
//!
//! - `commit_graph`: commit records, branch table, tags and HEAD
//! - `path_resolver`: routes of forward/backward delta replays between commits

pub mod commit_graph;
pub mod path_resolver;
