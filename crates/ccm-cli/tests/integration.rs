#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ccm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ccm").unwrap();
    cmd.current_dir(dir.path())
        .env("CCM_CONFIG", dir.path().join("config.yaml"))
        .env_remove("CCM_API_URL")
        .env_remove("CCM_PROJECT");
    cmd
}

/// `ccm` pointed at a mock backend.
fn ccm_at(dir: &TempDir, server: &mockito::ServerGuard) -> Command {
    let mut cmd = ccm(dir);
    cmd.args(["--api-url", &server.url()]);
    cmd
}

// ---------------------------------------------------------------------------
// ccm hook-id
// ---------------------------------------------------------------------------

#[test]
fn hook_id_build_fills_defaults() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["hook-id", "build", "Stop"])
        .assert()
        .success()
        .stdout("Stop::::0\n");

    ccm(&dir)
        .args(["hook-id", "build", "PreToolUse", "--matcher", "Bash", "--index", "2"])
        .assert()
        .success()
        .stdout("PreToolUse::Bash::2\n");
}

#[test]
fn hook_id_parse_json() {
    let dir = TempDir::new().unwrap();
    let output = ccm(&dir)
        .args(["hook-id", "parse", "PostToolUse::Write|Edit::3", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["event"], "PostToolUse");
    assert_eq!(value["matcher"], "Write|Edit");
    assert_eq!(value["index"], 3);
}

#[test]
fn hook_id_parse_rejects_malformed() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["hook-id", "parse", "PreToolUse::Bash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed hook id"));
}

// ---------------------------------------------------------------------------
// ccm config
// ---------------------------------------------------------------------------

#[test]
fn config_set_and_show() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["config", "set-url", "http://example.test:4000/api/"])
        .assert()
        .success();
    ccm(&dir)
        .args(["config", "set-project", "web"])
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join("config.yaml")).unwrap();
    assert!(written.contains("http://example.test:4000/api"));
    assert!(written.contains("default_project: web"));

    ccm(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://example.test:4000/api"))
        .stdout(predicate::str::contains("Default project: web"));
}

#[test]
fn config_refuses_invalid_url() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["config", "set-url", "ftp://example.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with http"));
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
fn config_validate_defaults_are_clean() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));
}

// ---------------------------------------------------------------------------
// ccm agent / hook
// ---------------------------------------------------------------------------

#[test]
fn agent_list_prints_records() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/projects/web/agents")
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success": true, "agents": [
                {"name": "reviewer", "model": "sonnet", "description": "Reviews diffs"},
                {"name": "planner"}
            ], "warnings": ["agents/broken.md: missing frontmatter"]}"#,
        )
        .create();

    ccm_at(&dir, &server)
        .args(["-p", "web", "agent", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"))
        .stdout(predicate::str::contains("planner"))
        .stderr(predicate::str::contains("missing frontmatter"));
    mock.assert();
}

#[test]
fn agent_list_needs_a_scope() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["agent", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scope selected"));
}

#[test]
fn agent_delete_refuses_referenced_record() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/user/agents/reviewer/references")
        .with_body(
            r#"{"success": true, "hasReferences": true,
                "references": [{"kind": "command", "name": "review-pr"}]}"#,
        )
        .create();
    let delete = server
        .mock("DELETE", "/user/agents/reviewer")
        .expect(0)
        .create();

    ccm_at(&dir, &server)
        .args(["-u", "agent", "delete", "reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("review-pr"))
        .stderr(predicate::str::contains("--force"));
    delete.assert();
}

#[test]
fn hook_delete_rejects_malformed_id_locally() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let any = server.mock("DELETE", mockito::Matcher::Any).expect(0).create();

    ccm_at(&dir, &server)
        .args(["-u", "hook", "delete", "Stop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed hook id"));
    any.assert();
}

// ---------------------------------------------------------------------------
// ccm copy
// ---------------------------------------------------------------------------

#[test]
fn copy_to_project_requires_project_id() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["copy", "agent", "/home/u/.claude/agents/a.md", "--to", "project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target project id is required"));
}

#[test]
fn copy_rejects_unknown_strategy() {
    let dir = TempDir::new().unwrap();
    ccm(&dir)
        .args(["copy", "agent", "/p/a.md", "--to", "user", "--strategy", "merge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown conflict strategy"));
}

#[test]
fn copy_prints_created_path() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/copy/agent")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "sourcePath": "/p/.claude/agents/reviewer.md",
            "targetScope": "user",
        })))
        .with_body(
            r#"{"success": true, "message": "Copied", "createdPath": "/home/u/.claude/agents/reviewer.md"}"#,
        )
        .create();

    ccm_at(&dir, &server)
        .args(["copy", "agent", "/p/.claude/agents/reviewer.md", "--to", "user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/home/u/.claude/agents/reviewer.md"));
    mock.assert();
}

#[test]
fn copy_conflict_suggests_rename() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/copy/command")
        .with_status(409)
        .with_body(
            r#"{"conflict": {
                "sourceFile": {"name": "review.md", "path": "/p/.claude/commands/review.md"},
                "targetFile": {"name": "review.md", "path": "/home/u/.claude/commands/review.md"}
            }}"#,
        )
        .create();

    ccm_at(&dir, &server)
        .args([
            "copy",
            "command",
            "/p/.claude/commands/review.md",
            "--to",
            "user",
            "--strategy",
            "skip",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("review-2.md"))
        .stderr(predicate::str::contains("/home/u/.claude/commands/review.md"));
}
