// tests/common.rs

#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use base64::Engine;
use mockito::{Matcher, Mock, ServerGuard};
use repodigest::constants::{LICENSE_CANDIDATES, README_CANDIDATES};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::process::Command;

pub const OWNER: &str = "octo";
pub const REPO: &str = "hello";

// Helper function to get the binary command with a clean environment
pub fn repodigest_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repodigest"));
    for var in [
        "GITHUB_TOKEN",
        "OPENAI_API_KEY",
        "REPODIGEST_GITHUB_API",
        "REPODIGEST_LLM_API",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// One canned response of the fake GitHub API.
pub struct Route {
    pub path: String,
    pub status: usize,
    pub body: String,
}

fn route(path: String, status: usize, body: Value) -> Route {
    Route {
        path,
        status,
        body: body.to_string(),
    }
}

fn contents_path(path: &str) -> String {
    format!("/repos/{}/{}/contents/{}", OWNER, REPO, path)
}

/// Builds the responses of a GitHub repository holding `files`.
///
/// Directories are derived from the file paths. README and LICENSE candidates
/// that are not among the files answer 404.
pub fn repository_routes(files: &[(&str, &[u8])]) -> Vec<Route> {
    let mut dirs: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    dirs.insert(String::new(), Vec::new());
    let mut routes = vec![route(
        format!("/repos/{}/{}", OWNER, REPO),
        200,
        json!({"default_branch": "main"}),
    )];

    for (path, data) in files {
        let parts: Vec<&str> = path.split('/').collect();
        for depth in 1..parts.len() {
            let dir = parts[..depth].join("/");
            if !dirs.contains_key(&dir) {
                let parent = parts[..depth - 1].join("/");
                dirs.insert(dir.clone(), Vec::new());
                dirs.entry(parent).or_default().push(json!({
                    "name": parts[depth - 1],
                    "path": dir,
                    "type": "dir",
                    "size": 0
                }));
            }
        }
        let parent = parts[..parts.len() - 1].join("/");
        let name = parts[parts.len() - 1];
        dirs.entry(parent).or_default().push(json!({
            "name": name,
            "path": path,
            "type": "file",
            "size": data.len()
        }));
        routes.push(route(
            contents_path(path),
            200,
            json!({
                "name": name,
                "path": path,
                "type": "file",
                "encoding": "base64",
                "content": base64::engine::general_purpose::STANDARD.encode(data)
            }),
        ));
    }

    for (dir, children) in dirs {
        routes.push(route(contents_path(&dir), 200, Value::Array(children)));
    }
    for candidate in README_CANDIDATES.iter().chain(LICENSE_CANDIDATES.iter()) {
        if !files.iter().any(|(p, _)| p == candidate) {
            routes.push(route(
                contents_path(candidate),
                404,
                json!({"message": "Not Found"}),
            ));
        }
    }
    routes
}

/// Registers `files` on a synchronous mock server.
pub fn mock_repository(server: &mut ServerGuard, files: &[(&str, &[u8])]) -> Vec<Mock> {
    repository_routes(files)
        .into_iter()
        .map(|r| {
            server
                .mock("GET", r.path.as_str())
                .match_query(Matcher::Any)
                .with_status(r.status)
                .with_header("content-type", "application/json")
                .with_body(r.body)
                .create()
        })
        .collect()
}

/// Registers `files` on a mock server from async tests.
pub async fn mock_repository_async(server: &mut ServerGuard, files: &[(&str, &[u8])]) -> Vec<Mock> {
    let mut mocks = Vec::new();
    for r in repository_routes(files) {
        mocks.push(
            server
                .mock("GET", r.path.as_str())
                .match_query(Matcher::Any)
                .with_status(r.status)
                .with_header("content-type", "application/json")
                .with_body(r.body)
                .create_async()
                .await,
        );
    }
    mocks
}

/// The repository used throughout the integration tests.
pub fn sample_files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("README.md", b"# Hello\n\n![logo](./logo.png)".as_slice()),
        ("a.txt", b"hello".as_slice()),
        ("logo.png", b"\x89PNG".as_slice()),
        ("sub/b.md", b"world".as_slice()),
    ]
}
