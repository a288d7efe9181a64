//! End-to-end `holdem play` sessions driven by `--script`.

mod helpers;

use helpers::{clear_env, play_into, read_records, run};
use serial_test::serial;
use tempfile::TempDir;

#[test]
#[serial]
fn folded_hand_is_narrated_and_saved() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hands.jsonl");

    let res = play_into(&path, 11, "r120,f");

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.starts_with("play: seats=2 stack=1000 blinds=20/40 seed=11"));
    assert!(res.stdout.contains("raises to 120 chips"));
    assert!(res.stdout.contains("folds"));
    assert!(res.stdout.contains("wins the pot of 160"));
    assert!(res.stdout.contains("Final pot was 160"));
    assert!(res.stdout.contains("Hand saved: "));
    assert!(res.stdout.trim_end().ends_with("Session ended after 1 hand(s)"));
    assert!(res.stderr.is_empty(), "stderr: {}", res.stderr);

    let records = read_records(&path);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["actions"], serde_json::json!(["r120", "f"]));
    assert_eq!(record["pot"], 160);
    let mut nets: Vec<i64> = record["winnings"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_i64().unwrap())
        .collect();
    nets.sort();
    assert_eq!(nets, vec![-40, 40]);
}

#[test]
#[serial]
fn all_in_runout_is_dealt_by_the_timer() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hands.jsonl");

    let res = play_into(&path, 5, "allin,c");

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("goes all-in for 1000 chips"));
    for street in ["Flop cards dealt", "Turn cards dealt", "River cards dealt"] {
        assert!(res.stdout.contains(street), "missing {street}:\n{}", res.stdout);
    }
    assert!(
        res.stdout.contains("wins the pot of 2000") || res.stdout.contains("split the pot of 2000")
    );
    let flop = res.stdout.find("Flop cards dealt").unwrap();
    let river = res.stdout.find("River cards dealt").unwrap();
    let saved = res.stdout.find("Hand saved: ").unwrap();
    assert!(flop < river && river < saved);

    let records = read_records(&path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["board"].as_array().unwrap().len(), 5);
    let total: i64 = records[0]["winnings"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_i64().unwrap())
        .sum();
    assert_eq!(total, 0);
}

#[test]
#[serial]
fn illegal_action_is_reported_and_the_session_continues() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hands.jsonl");

    // Minimum raise preflop is to 80.
    let res = play_into(&path, 3, "r50,zz,f");

    assert_eq!(res.exit_code, 0);
    assert!(res.stderr.contains("Error: illegal action"));
    assert!(res.stderr.contains("Error: Unrecognized script token 'zz'"));
    assert!(res.stdout.contains("wins the pot of 60"));
    assert_eq!(read_records(&path).len(), 1);
}

#[test]
#[serial]
fn quit_stops_before_the_rest_of_the_script() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hands.jsonl");

    let res = play_into(&path, 8, "c,q,f");

    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("calls"));
    assert!(!res.stdout.contains("folds"));
    assert!(!path.exists());
}

#[test]
#[serial]
fn new_deals_the_next_hand_with_fresh_stacks() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hands.jsonl");

    let res = play_into(&path, 21, "f,new,f");

    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert_eq!(res.stdout.matches("Hand saved: ").count(), 2);
    assert!(res.stdout.contains("Session ended after 2 hand(s)"));
    assert_eq!(read_records(&path).len(), 2);
}

#[test]
#[serial]
fn invalid_configuration_fails_before_dealing() {
    clear_env();
    helpers::set_env("HOLDEM_BIG_BLIND", "10");

    let res = run(&["play", "--script", "f"]);
    clear_env();

    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Invalid configuration: big_blind must be >= small_blind"));
    assert!(res.stdout.is_empty());
}
