//! A small file-based version-control engine
//!
//! History is stored as line-level delta bundles per commit rather than
//! snapshots. Moving HEAD replays those bundles forward or backward along a
//! route through the commit graph, across branch fork points when needed.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
