#![cfg(feature = "cli")]

use chrono::NaiveDateTime;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crt-identities"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

/// Every line must look like `[YYYY-MM-DD HH:MM:SS] ERROR: <message>`.
fn log_messages(log: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(log).unwrap();
    content
        .lines()
        .map(|line| {
            let (stamp, message) = line.split_once("] ERROR: ").unwrap();
            let stamp = stamp.strip_prefix('[').unwrap();
            NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap();
            message.to_string()
        })
        .collect()
}

#[test]
fn test_missing_domain_exits_one_and_logs_usage() {
    let dir = TempDir::new().unwrap();

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let messages = log_messages(&dir.path().join("script_errors.log"));
    assert_eq!(messages, vec!["Usage: crt-identities <domain>"]);
}

#[test]
fn test_extra_argument_exits_one() {
    let dir = TempDir::new().unwrap();

    let output = run_in(dir.path(), &["a.com", "b.com"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(log_messages(&dir.path().join("script_errors.log")).len(), 1);
}

#[test]
fn test_help_exits_zero_without_logging() {
    let dir = TempDir::new().unwrap();

    let output = run_in(dir.path(), &["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
    assert!(!dir.path().join("script_errors.log").exists());
}

#[test]
fn test_invalid_domain_is_logged_and_nothing_is_written() {
    let dir = TempDir::new().unwrap();

    let output = run_in(dir.path(), &["a;b.com"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("] ERROR: Domain 'a;b.com' contains invalid characters"));

    let messages = log_messages(&dir.path().join("script_errors.log"));
    assert_eq!(
        messages,
        vec!["Domain 'a;b.com' contains invalid characters (quotes, semicolon, backtick)"]
    );
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_errors_append_to_existing_log() {
    let dir = TempDir::new().unwrap();

    run_in(dir.path(), &["bad domain"]);
    run_in(dir.path(), &[""]);

    let messages = log_messages(&dir.path().join("script_errors.log"));
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("must contain only alphanumeric, dot or hyphen"));
    assert_eq!(messages[1], "Domain length must be 1-255 characters");
}

#[test]
fn test_configured_error_log_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("crt.toml"), "[output]\nerror_log = \"custom.log\"\n").unwrap();

    let output = run_in(dir.path(), &["--config", "crt.toml", "a`b.com"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("script_errors.log").exists());
    let messages = log_messages(&dir.path().join("custom.log"));
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Domain 'a`b.com'"));
}

#[test]
fn test_invalid_config_exits_one() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("crt.toml"), "[output]\nmax_identities = 0\n").unwrap();

    let output = run_in(dir.path(), &["--config", "crt.toml", "a.com"]);

    assert_eq!(output.status.code(), Some(1));
    let messages = log_messages(&dir.path().join("script_errors.log"));
    assert!(messages[0].contains("output.max_identities"));
}
