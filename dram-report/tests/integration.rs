use assert_cmd::Command;
use libdramlog::config::{DefaultsConfig, StorageConfig};
use libdramlog::service::validation::EventRequest;
use libdramlog::service::DramlogService;
use libdramlog::Config;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a store with three events and a config pointing at it
///
/// - "Islay Tasting Night" (2025-11-14, Amsterdam): completed, 50 cl Lagavulin
/// - "Speyside Evening" (2025-12-05, Rotterdam): completed, 40 cl Mortlach
/// - "Blend Bar" (2025-12-12, Utrecht): still active
fn create_test_store() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("events.json");
    let config_path = temp_dir.path().join("config.toml");

    std::fs::write(
        &config_path,
        format!(
            "[storage]\npath = \"{}\"\n",
            store_path.to_string_lossy().replace('\\', "\\\\")
        ),
    )
    .unwrap();

    let service = DramlogService::from_config(Config {
        storage: StorageConfig {
            path: store_path.to_string_lossy().to_string(),
        },
        defaults: DefaultsConfig::default(),
    })
    .unwrap();

    let islay = service
        .events()
        .create(request("Islay Tasting Night", "2025-11-14", "Amsterdam", &["lag-16", "ci-12"]))
        .unwrap();
    service.events().set_end(&islay.id, "lag-16", 20).unwrap();
    service.events().complete(&islay.id).unwrap();

    let speyside = service
        .events()
        .create(request("Speyside Evening", "2025-12-05", "Rotterdam", &["mort-16"]))
        .unwrap();
    service.events().set_end(&speyside.id, "mort-16", 30).unwrap();
    service.events().complete(&speyside.id).unwrap();

    service
        .events()
        .create(request("Blend Bar", "2025-12-12", "Utrecht", &["jw-black", "jw-blue"]))
        .unwrap();

    (temp_dir, config_path)
}

fn request(title: &str, date: &str, location: &str, whiskies: &[&str]) -> EventRequest {
    EventRequest {
        title: title.to_string(),
        date: Some(date.to_string()),
        location: location.to_string(),
        organizer: "Gall & Gall".to_string(),
        ambassador: "Sanne".to_string(),
        whiskies: whiskies.iter().map(|s| s.to_string()).collect(),
        start_overrides: vec![],
    }
}

fn report_cmd(config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dram-report").unwrap();
    cmd.env("DRAMLOG_CONFIG", config_path)
        .env_remove("DRAMLOG_STORE_PATH");
    cmd
}

#[test]
fn test_report_default_output_newest_first() {
    let (_temp_dir, config_path) = create_test_store();

    let output = report_cmd(&config_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    let blend = stdout.find("Blend Bar").unwrap();
    let speyside = stdout.find("Speyside Evening").unwrap();
    let islay = stdout.find("Islay Tasting Night").unwrap();
    assert!(blend < speyside && speyside < islay, "events should be newest first");

    assert!(stdout.contains("50 cl poured"));
    assert!(stdout.contains("0/2 bottles measured"));
}

#[test]
fn test_report_status_filter() {
    let (_temp_dir, config_path) = create_test_store();

    report_cmd(&config_path)
        .args(["--status", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blend Bar"))
        .stdout(predicate::str::contains("Islay").not());
}

#[test]
fn test_report_date_range_and_search() {
    let (_temp_dir, config_path) = create_test_store();

    report_cmd(&config_path)
        .args(["--since", "2025-12-01", "--until", "2025-12-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Speyside Evening"))
        .stdout(predicate::str::contains("Blend Bar").not())
        .stdout(predicate::str::contains("Islay").not());

    report_cmd(&config_path)
        .args(["--search", "UTRECHT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blend Bar"))
        .stdout(predicate::str::contains("Speyside").not());
}

#[test]
fn test_report_limit() {
    let (_temp_dir, config_path) = create_test_store();

    let output = report_cmd(&config_path)
        .args(["--limit", "1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(String::from_utf8(output).unwrap().lines().count(), 1);
}

#[test]
fn test_report_json_format() {
    let (_temp_dir, config_path) = create_test_store();

    let output = report_cmd(&config_path)
        .args(["--format", "json", "--status", "completed"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["title"], "Speyside Evening");
    assert_eq!(reports[0]["total_consumed_cl"], 40);
    assert_eq!(reports[1]["total_consumed_cl"], 50);
    assert_eq!(reports[1]["lines"][1]["consumed_cl"], 0);
}

#[test]
fn test_report_jsonl_format() {
    let (_temp_dir, config_path) = create_test_store();

    let output = report_cmd(&config_path)
        .args(["--format", "jsonl"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["event_id"].is_string());
    }
}

#[test]
fn test_report_csv_format() {
    let (_temp_dir, config_path) = create_test_store();

    let output = report_cmd(&config_path)
        .args(["--format", "csv"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<_> = stdout.lines().collect();

    assert_eq!(
        lines[0],
        "event_id,date,title,location,status,whisky_id,whisky,start_cl,end_cl,consumed_cl"
    );
    // one row per bottle: 2 + 1 + 2
    assert_eq!(lines.len(), 6);
    assert!(stdout.contains(",lag-16,Lagavulin 16 Year Old,70,20,50"));
    // unmeasured bottles leave end_cl empty
    assert!(stdout.contains(",jw-blue,Johnnie Walker Blue Label,70,,0"));
}

#[test]
fn test_report_summary() {
    let (_temp_dir, config_path) = create_test_store();

    report_cmd(&config_path)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Events: 3 (1 active, 2 completed, 0 draft)"))
        .stdout(predicate::str::contains("Poured: 90 cl"))
        .stdout(predicate::str::contains("Mortlach 16 Year Old"));

    let output = report_cmd(&config_path)
        .args(["--summary", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(stats["by_whisky"]["lag-16"], 50);
    assert_eq!(stats["by_whisky"]["mort-16"], 40);
}

#[test]
fn test_summary_counts_beyond_default_limit() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("events.json");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[storage]\npath = \"{}\"\n",
            store_path.to_string_lossy().replace('\\', "\\\\")
        ),
    )
    .unwrap();

    let service = DramlogService::from_config(Config {
        storage: StorageConfig {
            path: store_path.to_string_lossy().to_string(),
        },
        defaults: DefaultsConfig::default(),
    })
    .unwrap();
    for n in 0..25 {
        let event = service
            .events()
            .create(request(&format!("Night {}", n), "2025-11-14", "Leiden", &["tal-10"]))
            .unwrap();
        service.events().set_end(&event.id, "tal-10", 60).unwrap();
        service.events().complete(&event.id).unwrap();
    }

    report_cmd(&config_path)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Events: 25 (0 active, 25 completed, 0 draft)"))
        .stdout(predicate::str::contains("Poured: 250 cl"));

    // an explicit limit still applies to the summary
    report_cmd(&config_path)
        .args(["--summary", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Poured: 50 cl"));

    // plain listings keep the default cap
    let output = report_cmd(&config_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(output).unwrap().lines().count(), 20);
}

#[test]
fn test_report_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[storage]\npath = \"{}\"\n",
            temp_dir
                .path()
                .join("none.json")
                .to_string_lossy()
                .replace('\\', "\\\\")
        ),
    )
    .unwrap();

    report_cmd(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_report_invalid_date() {
    let (_temp_dir, config_path) = create_test_store();

    report_cmd(&config_path)
        .args(["--since", "yesterday"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Invalid date 'yesterday'"));
}
