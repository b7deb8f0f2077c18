//! Integration tests for the Folio CLI

use assert_cmd::Command;
use predicates::prelude::*;

/// Nothing listens on the discard port, so requests fail fast
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    for key in [
        "FOLIO_API_URL",
        "FOLIO_TIMEOUT_SECS",
        "FOLIO_HERO_PERIOD_SECS",
        "FOLIO_BOOK_LIMIT",
        "FOLIO_USERNAME",
        "FOLIO_PASSWORD",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_help() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("books"))
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("home"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("borrow"))
        .stdout(predicate::str::contains("return"))
        .stdout(predicate::str::contains("buy"));
}

#[test]
fn test_version() {
    folio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_books_help() {
    folio()
        .args(["books", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List books"))
        .stdout(predicate::str::contains("--search"))
        .stdout(predicate::str::contains("--sort"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_home_help() {
    folio()
        .args(["home", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--ticks"))
        .stdout(predicate::str::contains("--start"));
}

#[test]
fn test_register_help() {
    folio()
        .args(["register", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Create an account"))
        .stdout(predicate::str::contains("--password2"));
}

#[test]
fn test_books_rejects_unknown_sort() {
    folio()
        .args(["books", "--sort", "cheapest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort key"));
}

#[test]
fn test_books_accepts_sort_aliases() {
    folio()
        .args(["--api-url", UNREACHABLE_API, "books", "--sort", "price_high"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort key").not());
}

#[test]
fn test_books_rejects_zero_limit() {
    folio()
        .args(["books", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_home_rejects_zero_ticks() {
    folio()
        .args(["home", "--watch", "--ticks", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_login_requires_credentials() {
    folio()
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--username"));
}

#[test]
fn test_books_unreachable_backend() {
    folio()
        .args(["--api-url", UNREACHABLE_API, "--timeout", "2", "books"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch books"));
}

#[test]
fn test_invalid_api_url() {
    folio()
        .args(["--api-url", "not a url", "categories"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to set up a client"));
}

#[test]
fn test_invalid_environment() {
    folio()
        .env("FOLIO_BOOK_LIMIT", "lots")
        .arg("categories")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FOLIO_BOOK_LIMIT"));
}

#[test]
fn test_register_password_mismatch_fails_locally() {
    folio()
        .args([
            "--api-url",
            UNREACHABLE_API,
            "register",
            "--username",
            "sara",
            "--email",
            "sara@example.com",
            "--password",
            "secret",
            "--password2",
            "secrets",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords do not match"))
        .stderr(predicate::str::contains("Transport").not());
}

#[test]
fn test_borrow_rejects_zero_days() {
    folio()
        .args(["borrow", "3", "--days", "0", "-u", "sara", "-p", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_buy_unreachable_backend() {
    folio()
        .args([
            "--api-url",
            UNREACHABLE_API,
            "--timeout",
            "2",
            "buy",
            "3",
            "-u",
            "sara",
            "-p",
            "secret",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to sign in as sara"));
}
