//! Moving the tracked tree between commits
//!
//! A [`migration::Migration`] turns a route of forward/backward steps into
//! file operations, validating every delta before any file is changed, then
//! applies them to the working tree and the last-state mirror.

pub mod migration;
