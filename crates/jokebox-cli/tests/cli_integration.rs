use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn unique_temp_data_path(tag: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|err| panic!("clock should be >= UNIX_EPOCH: {err}"))
        .as_nanos();
    std::env::temp_dir().join(format!("jokebox-cli-{tag}-{now}.json"))
}

fn run_jokebox<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_jokebox"))
        .args(args)
        .output()
        .unwrap_or_else(|err| panic!("failed to execute jokebox binary: {err}"))
}

fn run_json<I, S>(args: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_jokebox(args);
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "jokebox command failed (status={}):\nstdout:\n{stdout}\nstderr:\n{stderr}",
            output.status
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    serde_json::from_str(&stdout)
        .unwrap_or_else(|err| panic!("stdout is not valid JSON: {err}\nstdout:\n{stdout}"))
}

fn as_u64(value: &Value, key: &str) -> u64 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .unwrap_or_else(|| panic!("missing integer field `{key}` in payload: {value}"))
}

fn as_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field `{key}` in payload: {value}"))
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap_or_else(|| panic!("path should be valid UTF-8: {}", path.display()))
}

// Test IDs: TCLI-001
#[test]
fn add_get_delete_flow_round_trips() {
    let data_path = unique_temp_data_path("flow");
    let data = path_str(&data_path);

    let created = run_json([
        "--data", data, "add", "--text", "Why did the borrow checker cross the road?",
        "--topic", "rust", "--topic", "tech",
    ]);
    assert_eq!(as_u64(&created, "id"), 1);
    assert_eq!(as_str(&created, "contract_version"), "cli.v1");

    let fetched = run_json(["--data", data, "get", "--id", "1"]);
    assert_eq!(as_str(&fetched, "joke"), "Why did the borrow checker cross the road?");

    let confirmation = run_json(["--data", data, "delete", "--id", "1"]);
    assert_eq!(as_str(&confirmation, "message"), "Joke 1 deleted successfully");

    let missing = run_jokebox(["--data", data, "get", "--id", "1"]);
    assert!(!missing.status.success(), "get after delete should fail");
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("Joke with ID 1 not found"), "unexpected stderr: {stderr}");

    let _ = fs::remove_file(&data_path);
}

// Test IDs: TCLI-002
#[test]
fn status_and_list_follow_the_collection() {
    let data_path = unique_temp_data_path("status");
    let data = path_str(&data_path);

    let status = run_json(["--data", data, "status"]);
    assert_eq!(as_str(&status, "status"), "running");
    assert_eq!(as_u64(&status, "jokes_count"), 0);

    let _ = run_json(["--data", data, "add", "--text", "one", "--topic", "a"]);
    let _ = run_json(["--data", data, "add", "--text", "two", "--topic", "b"]);

    let status = run_json(["--data", data, "status"]);
    assert_eq!(as_u64(&status, "jokes_count"), 2);

    let listed = run_json(["--data", data, "list"]);
    let jokes = listed
        .get("jokes")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("missing jokes array in payload: {listed}"));
    assert_eq!(jokes.len(), 2);

    let _ = fs::remove_file(&data_path);
}

// Test IDs: TCLI-003
#[test]
fn add_rejects_invalid_drafts() {
    let data_path = unique_temp_data_path("invalid");
    let data = path_str(&data_path);

    let blank = run_jokebox(["--data", data, "add", "--text", "   ", "--topic", "misc"]);
    assert!(!blank.status.success(), "blank text should be rejected");
    let stderr = String::from_utf8_lossy(&blank.stderr);
    assert!(stderr.contains("Joke text cannot be empty"), "unexpected stderr: {stderr}");

    // --topic is required by the argument parser itself.
    let no_topics = run_jokebox(["--data", data, "add", "--text", "fine"]);
    assert!(!no_topics.status.success(), "missing topics should be rejected");

    assert!(!data_path.exists(), "nothing should be persisted for invalid drafts");
}

// Test IDs: TCLI-004
#[test]
fn search_samples_matching_jokes() {
    let data_path = unique_temp_data_path("search");
    let data = path_str(&data_path);

    let _ = run_json(["--data", data, "add", "--text", "a Cat pun", "--topic", "animals"]);
    let _ = run_json(["--data", data, "add", "--text", "a compiler pun", "--topic", "cats"]);
    let _ = run_json(["--data", data, "add", "--text", "unrelated", "--topic", "misc"]);

    let found = run_json(["--data", data, "search", "--query", "cat", "--count", "5"]);
    let jokes = found
        .get("jokes")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("missing jokes array in payload: {found}"));
    assert_eq!(jokes.len(), 2);

    let _ = fs::remove_file(&data_path);
}

// Test IDs: TCLI-005
#[test]
fn random_returns_the_only_joke() {
    let data_path = unique_temp_data_path("random");
    let data = path_str(&data_path);

    let _ = run_json(["--data", data, "add", "--text", "the only joke", "--topic", "misc"]);
    let random = run_json(["--data", data, "random"]);
    assert_eq!(as_str(&random, "joke"), "the only joke");

    let _ = fs::remove_file(&data_path);
}
