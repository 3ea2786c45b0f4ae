#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn referrer() -> Command {
    Command::cargo_bin("referrer").expect("binary built")
}

#[test]
fn tag_prints_signature_tag() {
    referrer()
        .args(["tag", "localhost:5000/net-monitor:v1@sha256:d34db33f"])
        .assert()
        .success()
        .stdout("localhost:5000/net-monitor:sha256-d34db33f.sig\n");
}

#[test]
fn tag_honours_custom_suffix() {
    referrer()
        .args([
            "tag",
            "localhost:5000/net-monitor@sha256:d34db33f",
            "--suffix",
            ".att",
        ])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("sha256-d34db33f.att\n"));
}

#[test]
fn tag_without_digest_is_precondition_failure() {
    referrer()
        .args(["tag", "localhost:5000/net-monitor:v1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no digest specified for subject"));
}

#[test]
fn referrers_without_digest_fails_before_network() {
    referrer()
        .args([
            "referrers",
            "localhost:1/net-monitor:v1",
            "--url",
            "http://127.0.0.1:1",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no digest specified for subject"));
}

#[test]
fn plugin_result_round_trips_success() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("result.json");
    fs::write(&input, r#"{"isSuccess":true,"results":["ok"],"name":"v1"}"#).unwrap();

    referrer()
        .arg("plugin-result")
        .arg(&input)
        .assert()
        .success()
        .stdout("{\"isSuccess\":true,\"results\":[\"ok\"],\"name\":\"v1\"}\n");
}

#[test]
fn plugin_result_failure_envelope_exits_nonzero() {
    referrer()
        .args(["plugin-result", "-"])
        .write_stdin(r#"{"isSuccess":false,"results":["signature mismatch"],"name":"cosign"}"#)
        .assert()
        .code(3);
}

#[test]
fn plugin_result_malformed_reports_parse_code() {
    referrer()
        .arg("plugin-result")
        .write_stdin("{not json")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("failed to parse verifier result"));
}

#[test]
fn plugin_result_accepts_null_results() {
    referrer()
        .args(["plugin-result", "-"])
        .write_stdin("{\"isSuccess\":true,\"results\":null,\"name\":\"cosign\"}\n")
        .assert()
        .success()
        .stdout("{\"isSuccess\":true,\"results\":[],\"name\":\"cosign\"}\n");
}

#[test]
fn plugin_result_unreadable_input_is_internal_error() {
    let dir = tempdir().unwrap();

    referrer()
        .arg("plugin-result")
        .arg(dir.path().join("missing.json"))
        .assert()
        .code(70)
        .stderr(predicate::str::contains("failed to read"));
}
