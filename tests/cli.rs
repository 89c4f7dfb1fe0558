//! Integration tests for the rmk binary

mod common;

use assert_cmd::Command;
use common::create_test_makefile;
use predicates::prelude::*;

fn rmk() -> Command {
    Command::cargo_bin("rmk").unwrap()
}

#[test]
fn test_version_flag() {
    rmk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_file_flag_needs_argument() {
    rmk().arg("-f").assert().failure();
}

#[test]
fn test_runs_default_target() {
    let (dir, _) = create_test_makefile("echo1:\n\techo echo1\necho2:\n\techo echo2\n");

    rmk()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("echo echo1\necho1\n")
        .stderr("");
}

#[test]
fn test_file_flag_and_targets() {
    let (dir, _) = create_test_makefile("");
    std::fs::write(
        dir.path().join("build.mk"),
        "echo1:\n\techo echo1\necho2:\n\techo echo2\necho3:\n\t@echo echo3\n",
    )
    .unwrap();

    rmk()
        .current_dir(dir.path())
        .args(["-f", "build.mk", "echo3", "echo1"])
        .assert()
        .success()
        .stdout("echo3\necho echo1\necho1\n");
}

#[test]
fn test_parse_error_exits_with_one() {
    let (dir, _) = create_test_makefile("all:\n\techo ok\nthis line is wrong\n");

    rmk()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Parse error at line 3"));
}

#[test]
fn test_missing_target_exits_with_one() {
    let (dir, _) = create_test_makefile("all:\n\techo all\n");

    rmk()
        .current_dir(dir.path())
        .arg("missing")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("No rule to make target 'missing'"));
}

#[test]
fn test_failed_command_exits_with_one() {
    let (dir, _) = create_test_makefile("all:\n\t@false\n\t@echo never\n");

    rmk()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("never").not());
}

#[test]
fn test_missing_makefile() {
    let dir = tempfile::TempDir::new().unwrap();

    rmk()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No makefile found"));
}

#[test]
fn test_dry_run_does_not_execute() {
    let (dir, _) = create_test_makefile("all:\n\t@touch made\n");

    rmk()
        .current_dir(dir.path())
        .arg("-n")
        .assert()
        .success()
        .stdout("touch made\n");
    assert!(!dir.path().join("made").exists());
}

#[test]
fn test_directory_flag() {
    let (dir, _) = create_test_makefile("all:\n\t@pwd\n");

    rmk()
        .args(["-C", &dir.path().display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            dir.path().file_name().unwrap().to_str().unwrap(),
        ));
}

#[test]
fn test_silent_hides_echo() {
    let (dir, _) = create_test_makefile("all:\n\techo hi\n");

    rmk()
        .current_dir(dir.path())
        .arg("-s")
        .assert()
        .success()
        .stdout("hi\n");
}
