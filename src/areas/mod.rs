//! Persisted repository areas
//!
//! - `database`: commit objects and commit records
//! - `index`: staging area of delta bundles
//! - `journal`: human-readable event log
//! - `refs`: HEAD, branch table and tag table
//! - `repository`: aggregate root the commands run against
//! - `workspace`: filesystem accessor for the working tree and the last-state mirror

pub mod database;
pub mod index;
pub mod journal;
pub mod refs;
pub mod repository;
pub mod workspace;
