//! CLI tests for the statwatch binary
use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn help_mentions_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_statwatch"))
        .arg("--help")
        .output()
        .expect("run statwatch --help");
    assert!(output.status.success());
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        text.contains("Usage:") && text.contains("--once") && text.contains("--demo"),
        "help text missing expected flags\n{text}"
    );
}

#[test]
fn once_against_dead_endpoint_fails_quietly_on_stdout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let output = Command::cargo_bin("statwatch")
        .expect("binary exists")
        .args(["--once", &format!("http://{addr}/_stats")])
        .output()
        .expect("run statwatch --once");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "unexpected stdout output");
}
