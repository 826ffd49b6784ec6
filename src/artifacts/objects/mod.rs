//! Persisted object types
//!
//! - **CommitId**: sequential commit identifier
//! - **Commit**: a node of the commit graph with its per-branch edges
//! - **DeltaBundle**: the content delta recorded by one `add`
//! - **Tag**: a unique name bound to a commit
//!
//! All of them implement [`object::Packable`] and [`object::Unpackable`] to move
//! between memory and the framed `.dat` files.

pub mod commit;
pub mod commit_id;
pub mod delta_bundle;
pub mod object;
pub mod tag;
