//! CLI smoke tests.

use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn check_env_reports_default_configuration() {
    let mut cmd = Command::cargo_bin("leadgate").unwrap();
    cmd.arg("check-env")
        .env_remove("LEADGATE_HOST")
        .env_remove("LEADGATE_PORT")
        .env_remove("LEADGATE_VERIFIED_DOMAIN");
    cmd.assert()
        .success()
        .stdout(contains("Environment validation successful"))
        .stdout(contains("sandbox"));
}

#[test]
fn check_env_fails_on_invalid_port() {
    let mut cmd = Command::cargo_bin("leadgate").unwrap();
    cmd.arg("check-env").env("LEADGATE_PORT", "not-a-port");
    cmd.assert().failure().stdout(contains("Invalid port number"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let mut cmd = Command::cargo_bin("leadgate").unwrap();
    cmd.arg("frobnicate");
    cmd.assert().failure();
}
