//! Working tree inspection
//!
//! - `file_change`: change kinds and how they are printed
//! - `ignore`: `CVSignore.txt` rules
//! - `path_filter`: restricting a comparison to requested paths
//! - `tree_comparer`: working tree against last-state mirror
//! - `working_state`: clean / staged / dirty classification

pub mod file_change;
pub mod ignore;
pub mod path_filter;
pub mod tree_comparer;
pub mod working_state;
