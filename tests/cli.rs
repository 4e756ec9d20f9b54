use std::process::{Command, Output};

use httpmock::Method::HEAD;
use httpmock::prelude::*;
use serde_json::json;

const DEAD_URL: &str = "http://127.0.0.1:1";

fn namechecker() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_namechecker"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn against(server: &MockServer) -> Command {
    let mut cmd = namechecker();
    cmd.env("NAMECHECKER_GITHUB_URL", server.base_url())
        .env("NAMECHECKER_NPM_URL", server.url("/web"))
        .env("NAMECHECKER_NPM_REGISTRY_URL", server.base_url());
    cmd
}

/// Every name is free on every platform.
fn mock_all_available(server: &MockServer) {
    server.mock(|when, then| {
        when.method(HEAD);
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET).path("/-/v1/search");
        then.status(200).json_body(json!({ "objects": [], "total": 0 }));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("/-/org/");
        then.status(404).json_body(json!({ "error": "Scope not found" }));
    });
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_args_prints_usage_and_exits_1() {
    let server = MockServer::start();
    let any = server.mock(|_, then| {
        then.status(404);
    });

    let output = against(&server).output().expect("failed to execute");

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Usage: namechecker <id>"), "stdout: {out}");
    assert!(out.contains("namechecker abcd myorg testname"), "stdout: {out}");
    any.assert_hits(0);
}

#[test]
fn blank_args_exit_1_without_requests() {
    let server = MockServer::start();
    let any = server.mock(|_, then| {
        then.status(404);
    });

    let output = against(&server)
        .args(["", "   ", "\t"])
        .output()
        .expect("failed to execute");

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(
        err.contains("Please provide at least one valid ID"),
        "stderr: {err}"
    );
    any.assert_hits(0);
}

#[test]
fn available_name_end_to_end() {
    let server = MockServer::start();
    mock_all_available(&server);

    let output = against(&server)
        .arg("abcd")
        .output()
        .expect("failed to execute");

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Checking availability for: abcd"), "stdout: {out}");
    assert!(!out.contains("====="), "single id has no divider: {out}");
    assert!(
        out.contains(&format!(
            "✓ Available - GitHub: {} → Create: https://github.com/account/organizations/new?plan=free",
            server.url("/abcd")
        )),
        "stdout: {out}"
    );
    assert!(
        out.contains(&format!(
            "✓ Available - npm org: {} → Create: https://www.npmjs.com/org/create",
            server.url("/web/org/abcd")
        )),
        "stdout: {out}"
    );
    assert!(!out.contains('\u{1b}'), "NO_COLOR output has escapes: {out:?}");
}

#[test]
fn taken_name_has_no_create_hint() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/taken");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path("/-/v1/search");
        then.status(200)
            .json_body(json!({ "objects": [{ "package": { "name": "@taken/cli" } }] }));
    });

    let output = against(&server)
        .arg("taken")
        .output()
        .expect("failed to execute");

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("✗ Taken - GitHub:"), "stdout: {out}");
    assert!(out.contains("✗ Taken - npm org:"), "stdout: {out}");
    assert!(!out.contains("Create:"), "stdout: {out}");
}

#[test]
fn multiple_names_get_divided_sections_in_order() {
    let server = MockServer::start();
    mock_all_available(&server);

    let output = against(&server)
        .args(["first", " ", "second", "first"])
        .output()
        .expect("failed to execute");

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    let divider = "=".repeat(60);
    assert_eq!(out.matches(&divider).count(), 3, "stdout: {out}");
    assert!(out.starts_with(&format!("\n{divider}\n")), "stdout: {out:?}");

    let headers: Vec<&str> = out
        .lines()
        .filter_map(|l| l.strip_prefix("Checking availability for: "))
        .collect();
    assert_eq!(headers, ["first", "second", "first"]);

    // Each section is complete before the next divider.
    for section in out.split(&divider).skip(1) {
        assert_eq!(section.matches("GitHub:").count(), 1, "section: {section}");
        assert_eq!(section.matches("npm org:").count(), 1, "section: {section}");
    }
}

#[test]
fn identifiers_are_trimmed() {
    let server = MockServer::start();
    mock_all_available(&server);

    let output = against(&server)
        .arg("  abcd  ")
        .output()
        .expect("failed to execute");

    let out = stdout(&output);
    assert!(out.contains("Checking availability for: abcd\n"), "stdout: {out}");
}

#[test]
fn leading_hyphen_is_an_identifier_not_a_flag() {
    let server = MockServer::start();
    mock_all_available(&server);

    let output = against(&server)
        .args(["-abcd", "abcd"])
        .output()
        .expect("failed to execute");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Checking availability for: -abcd\n"), "stdout: {out}");
    assert!(out.contains("Checking availability for: abcd\n"), "stdout: {out}");
}

#[test]
fn network_failure_is_taken_with_diagnostic() {
    let output = namechecker()
        .env("NAMECHECKER_GITHUB_URL", DEAD_URL)
        .env("NAMECHECKER_NPM_REGISTRY_URL", DEAD_URL)
        .arg("abcd")
        .output()
        .expect("failed to execute");

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert_eq!(out.matches("✗ Taken").count(), 2, "stdout: {out}");
    let err = stderr(&output);
    assert!(err.contains("error checking GitHub for abcd"), "stderr: {err}");
    assert!(err.contains("error checking npm org for abcd"), "stderr: {err}");
}

#[test]
fn version_flag() {
    let output = namechecker()
        .arg("--version")
        .output()
        .expect("failed to execute");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}
