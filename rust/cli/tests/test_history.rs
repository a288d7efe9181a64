//! `holdem history` listings and `holdem replay` verification.

mod helpers;

use std::fs;

use helpers::{clear_env, play_into, read_records, run};
use serial_test::serial;
use tempfile::TempDir;

fn two_hands(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("hands.jsonl");
    assert_eq!(play_into(&path, 11, "r120,f").exit_code, 0);
    assert_eq!(play_into(&path, 12, "allin,c").exit_code, 0);
    path
}

#[test]
#[serial]
fn history_lists_newest_first() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = two_hands(&dir);
    let records = read_records(&path);

    let res = run(&["history", "--input", path.to_str().unwrap()]);

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    let lines: Vec<&str> = res.stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(records[1]["id"].as_str().unwrap()));
    assert!(lines[1].starts_with(records[0]["id"].as_str().unwrap()));
    assert!(lines[1].contains("20/40  pot 160  board -"));
    assert_eq!(lines[2], "Showing 2 of 2 hand(s)");
}

#[test]
#[serial]
fn history_limit_truncates_and_warns_when_short() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = two_hands(&dir);
    let input = path.to_str().unwrap();

    let res = run(&["history", "--input", input, "--limit", "1"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.ends_with("Showing 1 of 2 hand(s)\n"));

    let res = run(&["history", "--input", input, "--limit", "5"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stderr.contains("WARNING: only 2 hand(s) recorded"));

    let res = run(&["history", "--input", input, "--limit", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Error: limit must be >= 1"));
}

#[test]
#[serial]
fn history_of_missing_file_is_empty() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("none.jsonl");

    let res = run(&["history", "--input", path.to_str().unwrap()]);

    assert_eq!(res.exit_code, 0);
    assert_eq!(res.stdout, "No hands recorded.\n");
}

#[test]
#[serial]
fn replay_confirms_stored_results() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = two_hands(&dir);
    let records = read_records(&path);

    let res = run(&["replay", "--input", path.to_str().unwrap()]);

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    for record in &records {
        let id = record["id"].as_str().unwrap();
        assert!(res.stdout.contains(&format!("OK {id}")));
    }
    assert!(res.stdout.contains("Replayed 2 hand(s): 2 ok, 0 mismatched"));
}

#[test]
#[serial]
fn replay_flags_tampered_winnings() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = two_hands(&dir);

    let mut records = read_records(&path);
    let winnings = records[0]["winnings"].as_object_mut().unwrap();
    for net in winnings.values_mut() {
        *net = serde_json::json!(net.as_i64().unwrap() * 2);
    }
    let tampered_id = records[0]["id"].as_str().unwrap().to_string();
    let body: String = records.iter().map(|r| format!("{r}\n")).collect();
    fs::write(&path, body).unwrap();

    let res = run(&["replay", "--input", path.to_str().unwrap()]);

    assert_eq!(res.exit_code, 2);
    assert!(res.stdout.contains("Replayed 2 hand(s): 1 ok, 1 mismatched"));
    assert!(
        res.stderr
            .contains(&format!("Error: {tampered_id}: winnings")),
        "stderr: {}",
        res.stderr
    );
}

#[test]
#[serial]
fn replay_skips_corrupt_lines() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hands.jsonl");
    assert_eq!(play_into(&path, 11, "r120,f").exit_code, 0);
    let mut body = fs::read_to_string(&path).unwrap();
    body.push_str("{not json\n");
    fs::write(&path, body).unwrap();

    let res = run(&["replay", "--input", path.to_str().unwrap()]);

    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("Replayed 1 hand(s): 1 ok, 0 mismatched"));
}
