#![allow(dead_code)]

pub mod command;
pub mod file;

pub const CONTROL_DIR: &str = ".cvs";

pub fn control_file(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    dir.join(CONTROL_DIR).join(name)
}
