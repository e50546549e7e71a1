use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn glasstask_help_works() {
    Command::cargo_bin("glasstask")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("GlassTask"));
}

#[test]
fn glasstask_version_works() {
    Command::cargo_bin("glasstask")
        .expect("binary")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("glasstask"));
}
