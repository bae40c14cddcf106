use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;

const CONFIG_VARS: [&str; 8] = [
    "GITHUB_URL",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "OWNER",
    "MILESTONE_ID",
    "REPOS",
    "NOTE_TITLE",
    "NOTE_TEMPLATE",
];

fn deploy_note_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("deploy-note"));
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Query sent for `MILESTONE_ID=1` with the default state filter
fn milestone_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("milestone".into(), "1".into()),
        Matcher::UrlEncoded("state".into(), "all".into()),
    ])
}

fn issues_body(repo: &str, due_on: &str) -> String {
    json!([{
        "number": 11,
        "title": format!("Ship {repo}"),
        "html_url": format!("https://github.test/acme/{repo}/issues/11"),
        "labels": [],
        "body": "관련 담당자 : carol",
        "milestone": { "title": "2024.05", "due_on": due_on }
    }])
    .to_string()
}

#[test]
fn test_help() {
    deploy_note_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deployment note"));
}

#[test]
fn test_missing_configuration_prints_usage_and_succeeds() {
    deploy_note_cmd()
        .env("CLIENT_ID", "user")
        .env("CLIENT_SECRET", "secret")
        .env("OWNER", "acme")
        .assert()
        .success()
        .stdout(predicate::str::contains("export MILESTONE_ID=1"));
}

#[test]
fn test_renders_note_for_all_repositories() {
    let mut server = Server::new();
    let repo_a = server
        .mock("GET", "/repos/acme/repo-a/issues")
        .match_query(milestone_query())
        .with_status(200)
        .with_body(issues_body("repo-a", "2024-05-01T00:00:00Z"))
        .create();
    let repo_b = server
        .mock("GET", "/repos/acme/repo-b/issues")
        .match_query(milestone_query())
        .with_status(200)
        .with_body(issues_body("repo-b", "2024-06-15T00:00:00Z"))
        .create();

    deploy_note_cmd()
        .env("GITHUB_URL", server.url())
        .env("CLIENT_ID", "user")
        .env("CLIENT_SECRET", "secret")
        .env("OWNER", "acme")
        .env("MILESTONE_ID", "1")
        .env("REPOS", "repo-a:repo-b")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "- repo-a:2024-05-01 10:00\n- repo-b:2024-06-15 10:00\n",
        ))
        .stdout(predicate::str::contains("2024.05.01 통합검색 배포 안내드립니다."))
        .stdout(predicate::str::contains("carol"));

    repo_a.assert();
    repo_b.assert();
}

#[test]
fn test_custom_template_and_title() {
    let mut server = Server::new();
    let repo = server
        .mock("GET", "/repos/acme/web/issues")
        .match_query(Matcher::Exact("milestone=1&per_page=50&state=closed".into()))
        .with_status(200)
        .with_body(issues_body("web", "2024-05-01T00:00:00Z"))
        .create();

    let dir = tempfile::TempDir::new().unwrap();
    let template = dir.path().join("note.txt");
    std::fs::write(&template, "{{ title }}|{{ repo_version }}").unwrap();

    let url = server.url();
    deploy_note_cmd()
        .args(["--github-url", url.as_str()])
        .args(["--client-id", "user", "--client-secret", "secret"])
        .args(["--owner", "acme", "--milestone-id", "1", "--repos", "web"])
        .args(["--title", "Release", "--state", "closed", "--per-page", "50"])
        .arg("--template")
        .arg(&template)
        .assert()
        .success()
        .stdout("Release|- [web:2024.05]()\n");

    repo.assert();
}

#[test]
fn test_fetch_failure_exits_non_zero_without_note() {
    let mut server = Server::new();
    let missing = server
        .mock("GET", "/repos/acme/gone/issues")
        .match_query(milestone_query())
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create();

    deploy_note_cmd()
        .env("GITHUB_URL", server.url())
        .env("CLIENT_ID", "user")
        .env("CLIENT_SECRET", "secret")
        .env("OWNER", "acme")
        .env("MILESTONE_ID", "1")
        .env("REPOS", "gone")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("API error 404 Not Found"));

    missing.assert();
}
