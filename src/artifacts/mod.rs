//! Data structures and algorithms
//!
//! - `branch`: Branch names and switch/reset targets
//! - `checkout`: Replaying routes against the working tree and the mirror
//! - `core`: Binary codec, checksummed frames, atomic persistence, pager wrapper
//! - `diff`: Myers' diff, zero-context hunks and reversible patches
//! - `graph`: Commit graph and route resolution between commits
//! - `objects`: Commit ids, commit records, delta bundles and tags
//! - `status`: Working tree against last-state mirror comparison

pub mod branch;
pub mod checkout;
pub mod core;
pub mod diff;
pub mod graph;
pub mod objects;
pub mod status;
