use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskgrid-{nanos}-{file_name}"))
}

fn write_source(file_name: &str) -> PathBuf {
    let path = temp_path(file_name);
    let content = serde_json::json!([
        {
            "id": 1,
            "title": "Buy milk",
            "description": "two litres",
            "dueDate": "30/08/2026",
            "tag": "errands",
            "status": "OPEN",
            "timestampCreated": "20/08/2026 09:15:00"
        },
        {
            "id": 2,
            "title": "File taxes",
            "description": "before the deadline",
            "dueDate": "01/09/2026",
            "tag": "admin",
            "status": "OPEN",
            "timestampCreated": "21/08/2026 10:00:00"
        },
        {
            "id": 3,
            "title": "Read paper",
            "description": "distributed systems survey",
            "dueDate": "",
            "tag": "research",
            "status": "DONE",
            "timestampCreated": "22/08/2026 08:30:00"
        }
    ]);
    std::fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
    path
}

#[test]
fn add_prints_the_new_task() {
    let exe = env!("CARGO_BIN_EXE_taskgrid");
    let source = write_source("cli-add-plain.json");

    let output = Command::new(exe)
        .args(["add", "Walk dog", "--tag", "chores"])
        .env("TASKGRID_SOURCE", &source)
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&source).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Added task: Walk dog (4)");
}

#[test]
fn add_json_reports_open_status_and_creation_stamp() {
    let exe = env!("CARGO_BIN_EXE_taskgrid");
    let source = write_source("cli-add-json.json");

    let output = Command::new(exe)
        .args(["--json", "add", "Walk dog", "--tag", "chores"])
        .env("TASKGRID_SOURCE", &source)
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&source).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["id"], 4);
    assert_eq!(parsed["title"], "Walk dog");
    assert_eq!(parsed["tag"], "chores");
    assert_eq!(parsed["status"], "OPEN");

    let stamp = parsed["timestampCreated"].as_str().expect("creation stamp");
    assert_eq!(stamp.len(), 19);
    let bytes = stamp.as_bytes();
    assert_eq!(bytes[2], b'/');
    assert_eq!(bytes[5], b'/');
    assert_eq!(bytes[10], b' ');
    assert_eq!(bytes[13], b':');
    assert_eq!(bytes[16], b':');
}

#[test]
fn add_requires_a_title() {
    let exe = env!("CARGO_BIN_EXE_taskgrid");
    let source = write_source("cli-add-no-title.json");

    let output = Command::new(exe)
        .args(["add"])
        .env("TASKGRID_SOURCE", &source)
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&source).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - title is required"));
}

#[test]
fn add_to_an_empty_source_starts_ids_at_1() {
    let exe = env!("CARGO_BIN_EXE_taskgrid");
    let source = temp_path("cli-add-empty.json");
    std::fs::write(&source, "[]").unwrap();

    let output = Command::new(exe)
        .args(["--json", "add", "First task"])
        .env("TASKGRID_SOURCE", &source)
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&source).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["title"], "First task");
}

#[test]
fn add_trims_surrounding_whitespace_from_the_title() {
    let exe = env!("CARGO_BIN_EXE_taskgrid");
    let source = write_source("cli-add-trim.json");

    let output = Command::new(exe)
        .args(["--json", "add", "  Walk dog  "])
        .env("TASKGRID_SOURCE", &source)
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&source).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["title"], "Walk dog");
}
