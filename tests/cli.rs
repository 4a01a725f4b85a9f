//! CLI integration tests using the real art_bundler binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[allow(deprecated)]
fn bundler_cmd() -> Command {
    Command::cargo_bin("art_bundler").unwrap()
}

#[test]
fn help_lists_flags() {
    bundler_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--outdir"))
        .stdout(predicate::str::contains("--imageio-download"))
        .stdout(predicate::str::contains("--gui-mode"))
        .stdout(predicate::str::contains("GITHUB_AUTH"));
}

#[test]
fn missing_outdir_is_a_usage_error() {
    bundler_cmd()
        .arg("-n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--outdir"));
}

#[test]
fn unknown_gui_mode_is_a_usage_error() {
    bundler_cmd()
        .args(["-o", "/tmp/x", "--gui-mode", "sometimes"])
        .assert()
        .code(2);
}

#[test]
fn running_outside_build_tree_fails() {
    let cwd = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    bundler_cmd()
        .current_dir(cwd.path())
        .args(["-n", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "))
        .stderr(predicate::str::contains(
            "Contents/MacOS/ART not found! Please run this tool from the build directory of ART",
        ));
    assert!(!out.path().join("ART.app").exists());
}

#[test]
fn existing_bundle_is_refused() {
    let build = tempfile::tempdir().unwrap();
    fs::create_dir_all(build.path().join("Contents/MacOS")).unwrap();
    fs::write(build.path().join("Contents/MacOS/ART"), "gui").unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir_all(out.path().join("ART.app/Contents")).unwrap();

    bundler_cmd()
        .arg("--build-dir")
        .arg(build.path())
        .arg("-o")
        .arg(out.path())
        .arg("-n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
    assert!(fs::read_dir(out.path().join("ART.app/Contents")).unwrap().next().is_none());
}

#[test]
fn relative_shell_is_rejected() {
    let out = tempfile::tempdir().unwrap();
    bundler_cmd()
        .args(["-s", "zsh", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absolute path"));
}
