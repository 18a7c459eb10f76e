// Command-line tests
// Runs the built binary and checks exit codes and output streams

mod common;

use release_tracker::repository::Database;
use std::process::{Command, Output};

fn run_tracker(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_release-tracker"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_missing_root_argument_exits_1() {
    let output = run_tracker(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty(), "usage error should be written to stderr");
}

#[test]
fn test_nonexistent_root_exits_1() {
    let (dir, _root) = common::create_release(&[]);
    let missing = dir.path().join("missing");

    let output = run_tracker(&[missing.to_str().unwrap(), "--dry-run"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to track release"), "stderr: {}", stderr);
}

#[test]
fn test_help_exits_0() {
    let output = run_tracker(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--branch"));
}

#[test]
fn test_dry_run_prints_snapshot_json() {
    let (_dir, root) = common::create_release(&[
        ("node_modules/a/x.js", 10),
        ("src/z.js", 5),
    ]);

    let output = run_tracker(&[root.to_str().unwrap(), "--dry-run", "--json", "--quiet"]);

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totalNodeModuleSize"], 10);
    assert_eq!(json["totalProjectSize"], 5);
    assert_eq!(json["totalSize"], 15);
    assert_eq!(json["nodeModuleStats"][0]["moduleName"], "a");
}

#[tokio::test]
async fn test_publish_to_sqlite_log_exits_0() {
    let (dir, root) = common::create_release(&[("index.js", 12)]);
    let db_path = dir.path().join("log.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let output = run_tracker(&[
        root.to_str().unwrap(),
        "--quiet",
        "--branch",
        "release",
        "--database-url",
        &database_url,
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let db = Database::new(db_path.to_str().unwrap()).await.unwrap();
    let stored = db.load_snapshots("release").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].snapshot.total_size, 12);
}

#[tokio::test]
async fn test_publish_failure_exits_1() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_dir, root) = common::create_release(&[("index.js", 1)]);
    let database_url = format!("http://{}", addr);

    let output = run_tracker(&[root.to_str().unwrap(), "--quiet", "--database-url", &database_url]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to track release"), "stderr: {}", stderr);
}
