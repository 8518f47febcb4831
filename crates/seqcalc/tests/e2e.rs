//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn seqcalc() -> Command {
    Command::cargo_bin("seqcalc").expect("binary not found")
}

#[test]
fn help_flag() {
    seqcalc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sequence"));
}

#[test]
fn version_flag() {
    seqcalc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seqcalc"));
}

#[test]
fn fibonacci_100() {
    seqcalc()
        .args(["-n", "100", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("354224848179261915075"));
}

#[test]
fn fibonacci_range_first_ten() {
    seqcalc()
        .args(["--start", "0", "--end", "9", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n"));
}

#[test]
fn lucas_sequence() {
    seqcalc()
        .args(["-s", "lucas", "-n", "10", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("123"));
}

#[test]
fn batch_indices() {
    seqcalc()
        .args(["--indices", "0,10,20", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n55\n6765\n"));
}

#[test]
fn labelled_output() {
    seqcalc()
        .args(["-n", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fibonacci(10) = 55"));
}

#[test]
fn custom_definition() {
    // t(n) = 2·t(n-1) + t(n-2), seeds [0, 1] — the Pell numbers.
    seqcalc()
        .args([
            "-s",
            "custom",
            "--initial",
            "0,1",
            "--coefficients",
            "2,1",
            "-n",
            "10",
            "-q",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2378"));
}

#[test]
fn unknown_sequence_exit_code() {
    seqcalc()
        .args(["-s", "collatz", "-n", "10"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("unknown sequence"));
}

#[test]
fn range_limit_exit_code() {
    seqcalc()
        .args(["--start", "0", "--end", "99", "--max-range", "10"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("limit exceeded"));
}

#[test]
fn index_limit_exit_code() {
    seqcalc()
        .args(["-n", "1000", "--max-index", "100"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn metrics_snapshot_json() {
    seqcalc()
        .args(["--start", "0", "--end", "9", "-q", "--metrics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"misses\""));
}

#[test]
fn invalid_custom_definition() {
    seqcalc()
        .args([
            "-s",
            "broken",
            "--initial",
            "0,1",
            "--coefficients",
            "1",
            "-n",
            "5",
        ])
        .assert()
        .failure()
        .code(4);
}
