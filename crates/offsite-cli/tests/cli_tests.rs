//! Integration tests for the offsite CLI binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use assert_cmd::Command;
use offsite_test_utils::TestConfig;
use predicates::prelude::*;

fn offsite_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("offsite"));
    cmd.env_remove("OFFSITE_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Object store endpoints need no obscuring, so no engine binary is required
/// to write their config.
fn object_only_config(temp_dir: &std::path::Path, binary: &str) -> String {
    format!(
        r#"
[engine]
binary = "{binary}"
config_path = "{dir}/remotes/rclone.conf"

[[backups.sync]]
src = "local://{dir}/src"
dst = "object:b2://backup/src"

[[endpoints.object]]
nickname = "b2"
key_id = "akid"
application_key = "akey"
"#,
        binary = binary,
        dir = temp_dir.display()
    )
}

#[test]
fn test_help_output() {
    offsite_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("offsite"))
        .stdout(predicate::str::contains("write-config"));
}

#[test]
fn test_check_lists_endpoints_and_pairs() {
    let config = TestConfig::new(
        r#"
[[backups.sync]]
src = "share:nas://photos/library"
dst = "object:b2://photo-backup/library"

[[endpoints.share]]
nickname = "nas"
host = "192.168.1.2"
username = "backup"
password = "secret"

[[endpoints.object]]
nickname = "b2"
key_id = "akid"
application_key = "akey"
encrypt_key = "correct horse"
"#,
    );

    offsite_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK"))
        .stdout(predicate::str::contains("nas"))
        .stdout(predicate::str::contains("(encrypted)"))
        .stdout(predicate::str::contains(
            "share:nas://photos/library → object:b2://photo-backup/library",
        ))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_config_from_environment() {
    let config = TestConfig::new("");

    offsite_cmd()
        .env("OFFSITE_CONFIG", config.path())
        .arg("check")
        .assert()
        .success();
}

#[test]
fn test_duplicate_nickname_fails() {
    let config = TestConfig::new(
        r#"
[[endpoints.share]]
nickname = "nas"
host = "192.168.1.2"
username = "backup"
password = "secret"

[[endpoints.object]]
nickname = "nas"
key_id = "akid"
application_key = "akey"
"#,
    );

    offsite_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains(
            "Duplicate endpoint nickname detected: 'nas'",
        ));
}

#[test]
fn test_pair_with_unknown_endpoint_fails() {
    let config = TestConfig::new(
        r#"
[[backups.sync]]
src = "share:nas://photos/library"
dst = "local:///mnt/backup"
"#,
    );

    offsite_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("share:nas://photos/library"));
}

#[test]
fn test_missing_config_fails() {
    let temp = tempfile::TempDir::new().unwrap();

    offsite_cmd()
        .arg("--config")
        .arg(temp.path().join("absent.toml"))
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn test_write_config() {
    let config = TestConfig::new("");
    std::fs::write(
        config.path(),
        object_only_config(config.dir(), "rclone-not-needed"),
    )
    .unwrap();

    offsite_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("write-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("rclone.conf"));

    let written =
        std::fs::read_to_string(config.dir().join("remotes/rclone.conf")).unwrap();
    assert_eq!(written, "[b2]\ntype = b2\naccount = akid\nkey = akey\n\n");
}

#[cfg(unix)]
#[test]
fn test_sync_failure_exits_nonzero() {
    let config = TestConfig::new("");
    std::fs::write(config.path(), object_only_config(config.dir(), "false")).unwrap();

    offsite_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("sync")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("failed"))
        .stderr(predicate::str::contains("1 of 1 pairs failed to sync"));
}
