use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit holding `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_cvs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three\n".to_string(),
    ));

    run_cvs_command(repository_dir.path(), &["add"])
        .assert()
        .success();
    cvs_commit(repository_dir.path(), Some("v0"))
        .assert()
        .success();

    repository_dir
}

pub fn run_cvs_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("cvs").expect("Failed to find cvs binary");
    cmd.arg("-C").arg(dir).args(args).env("NO_PAGER", "1");
    cmd
}

/// Run from `caller_dir`, naming the repository relative to it
pub fn run_cvs_command_from(caller_dir: &Path, repository: &str, args: &[&str]) -> Command {
    let mut cmd = run_cvs_command(Path::new(repository), args);
    cmd.current_dir(caller_dir);
    cmd
}

pub fn cvs_commit(dir: &Path, tag: Option<&str>) -> Command {
    match tag {
        Some(tag) => run_cvs_command(dir, &["commit", "-t", tag]),
        None => run_cvs_command(dir, &["commit"]),
    }
}

/// Stage everything and commit it, asserting both steps succeed
pub fn add_and_commit(dir: &Path, tag: Option<&str>) {
    run_cvs_command(dir, &["add"]).assert().success();
    cvs_commit(dir, tag).assert().success();
}

pub fn head_line(dir: &Path) -> String {
    let output = run_cvs_command(dir, &["status"])
        .output()
        .expect("Failed to run status");
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}
