//! Command implementations
//!
//! - `porcelain`: user-facing commands (init, add, commit, reset, switch, branch,
//!   checkout, status, log)

pub mod porcelain;
