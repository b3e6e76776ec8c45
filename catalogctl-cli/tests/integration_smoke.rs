//! Smoke tests to verify command wiring against the memory backend

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DEMO_SEED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/components.json");

/// Run from an empty directory with an empty HOME so no .env or config leaks in
fn catalogctl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("catalogctl").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("CATALOGCTL_BACKEND")
        .env_remove("CATALOGCTL_INDEX")
        .env_remove("UPSTASH_SEARCH_REST_URL")
        .env_remove("UPSTASH_SEARCH_REST_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

// === Help ===

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("range"))
        .stdout(predicate::str::contains("nav"));
}

#[test]
fn test_search_help() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .arg("search")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restrict to a category"));
}

// === Navigation ===

#[test]
fn test_nav_list() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .arg("nav")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("/dashboard"))
        .stdout(predicate::str::contains("Profile"));
}

// === Catalog commands (memory backend) ===

#[test]
fn test_search_seeded_memory_index() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .args(["--backend", "memory", "--seed", DEMO_SEED, "search", "button"])
        .assert()
        .success()
        .stdout(predicate::str::contains("`btn-1`"));
}

#[test]
fn test_search_by_category_json() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .args(["--backend", "memory", "--seed", DEMO_SEED, "--format", "json"])
        .args(["search", "menu", "--category", "navigation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cmd-1\""))
        .stdout(predicate::str::contains("btn-1").not());
}

#[test]
fn test_range_reports_next_cursor() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .args(["--backend", "memory", "--seed", DEMO_SEED, "range", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next cursor: 2"));
}

#[test]
fn test_search_rejects_zero_limit() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .args(["--backend", "memory", "search", "button", "-n", "0"])
        .assert()
        .failure();
}

#[test]
fn test_reset_requires_yes() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .args(["--backend", "memory", "reset"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_upstash_without_credentials_fails() {
    let home = TempDir::new().unwrap();
    catalogctl(&home)
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("UPSTASH_SEARCH_REST_URL"));
}
