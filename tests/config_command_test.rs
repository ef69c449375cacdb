use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qbank(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qbank").unwrap();
    cmd.env("QBANK_CONFIG_DIR", config_dir.path())
        .env_remove("QBANK_SESSION_HASH")
        .env_remove("QBANK_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_path_uses_environment() {
    let dir = TempDir::new().unwrap();

    qbank(&dir)
        .args(["config", "get", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(dir.path().to_string_lossy().to_string()))
        .stdout(predicate::str::contains("config.yml"));
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();

    qbank(&dir)
        .args([
            "config",
            "set",
            "--api-address",
            "http://localhost:8080",
            "--qbank-address",
            "demo",
            "--timeout",
            "30",
        ])
        .assert()
        .success();

    assert!(dir.path().join("config.yml").exists());

    qbank(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_address\":\"http://localhost:8080/\""))
        .stdout(predicate::str::contains("\"qbank_address\":\"demo\""))
        .stdout(predicate::str::contains("\"timeout\":30"));

    qbank(&dir)
        .args(["config", "show", "-f", "csv", "--headers"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "API_ADDRESS,QBANK_ADDRESS,TIMEOUT,SESSION_HASH\nhttp://localhost:8080/,demo,30,\n",
        ));
}

#[test]
fn test_config_set_rejects_invalid_address() {
    let dir = TempDir::new().unwrap();

    qbank(&dir)
        .args(["config", "set", "--api-address", "not a url"])
        .assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn test_config_show_rejects_tree_format() {
    let dir = TempDir::new().unwrap();

    qbank(&dir)
        .args(["config", "show", "-f", "tree"])
        .assert()
        .failure()
        .code(65);
}
