//! Line-level patch engine
//!
//! - `diff_algorithm`: Myers' diff for line-by-line comparison
//! - `hunk`: zero-context hunks and their unified text form
//! - `patch`: reversible patches built from Myers edit scripts

pub mod diff_algorithm;
pub mod hunk;
pub mod patch;
