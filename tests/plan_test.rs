use assert_cmd::Command;
use predicates::str::contains;

const CONFIG: &str = r#"
[cups]
server = "printsrv"

[[printers]]
share = "ACCOUNTING"
description = "Accounting Copier"
location = "Building A / Floor 2"
drivers = ["/nope/vendor-a.ppd", "/nope/vendor-b.ppd"]

[[printers]]
name = "lobby"
share = "LOBBY_MFP"
description = "Lobby Printer"
"#;

#[test]
fn plan_renders_resolved_queues_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("printers.toml");
    std::fs::write(&config_path, CONFIG).unwrap();

    Command::cargo_bin("smb2cups")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("--username")
        .arg("svc-print")
        .arg("plan")
        .assert()
        .success()
        .stdout(contains("smb://svc-print@printsrv/ACCOUNTING"))
        .stdout(contains("smb://svc-print@printsrv/LOBBY_MFP"))
        // No vendor PPD exists, so both queues fall back to the generic model.
        .stdout(contains("drv:///sample.drv/generic.ppd"))
        .stdout(contains("\"sides\""));
}

#[test]
fn missing_config_file_fails_the_run() {
    Command::cargo_bin("smb2cups")
        .unwrap()
        .arg("--config")
        .arg("/nope/does-not-exist.toml")
        .arg("plan")
        .assert()
        .failure();
}
