//! Branch names and switch targets
//!
//! - `branch_name`: validated branch names
//! - `revision`: what `reset` and `switch` move HEAD to (a tag or a step count)

pub mod branch_name;
pub mod revision;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
