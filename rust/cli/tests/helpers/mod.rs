//! Shared helpers for the CLI integration tests.
//!
//! Every test drives [`holdem_cli::run`] in-process with captured streams.
//! Configuration is read from `HOLDEM_*` variables, so tests that run the
//! CLI are `#[serial]` and start from [`clear_env`].

use std::fs;
use std::path::Path;

use serde_json::Value;

const VARS: &[&str] = &[
    "HOLDEM_CONFIG",
    "HOLDEM_SEATS",
    "HOLDEM_SMALL_BLIND",
    "HOLDEM_BIG_BLIND",
    "HOLDEM_STACK",
    "HOLDEM_SEED",
    "HOLDEM_AUTO_ADVANCE_MS",
    "HOLDEM_HISTORY",
];

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run(args: &[&str]) -> CliResult {
    let mut argv = vec!["holdem"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let exit_code = holdem_cli::run(argv, &mut out, &mut err);
    CliResult {
        exit_code,
        stdout: String::from_utf8(out).expect("utf8 stdout"),
        stderr: String::from_utf8(err).expect("utf8 stderr"),
    }
}

pub fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

#[allow(dead_code)]
pub fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Plays one heads-up hand from `script` into `history`.
#[allow(dead_code)]
pub fn play_into(history: &Path, seed: u64, script: &str) -> CliResult {
    let seed = seed.to_string();
    let history = history.to_string_lossy().into_owned();
    run(&[
        "play",
        "--seats",
        "2",
        "--stack",
        "1000",
        "--seed",
        &seed,
        "--script",
        script,
        "--auto-advance-ms",
        "0",
        "--history",
        &history,
    ])
}

/// Stored records in file order (oldest first).
#[allow(dead_code)]
pub fn read_records(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read history")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid record"))
        .collect()
}
