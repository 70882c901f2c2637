//! HTTP tests: the router bound on an ephemeral port, called with reqwest
//! against real repositories.

mod common;

use common::TestRepo;
use reqwest::StatusCode;
use serde_json::{json, Value};

use githandle::server::{AppState, Bound};

/// Start a server and return its base URL. The server lives as long as
/// the test runtime.
async fn spawn_server() -> String {
    let bound = Bound::bind(AppState::default(), "127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let addr = bound.local_addr().unwrap();
    tokio::spawn(bound.run());
    format!("http://{addr}")
}

async fn post(base: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get_json(base: &str, path: &str, repo: &TestRepo) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .get(format!("{base}{path}"))
        .query(&[("repoPath", repo.path_str())])
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

mod api {
    use super::*;

    #[tokio::test]
    async fn health_and_page() {
        let base = spawn_server().await;
        let health = reqwest::get(format!("{base}/healthz")).await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(health.text().await.unwrap(), "ok");

        let page = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert!(page.text().await.unwrap().contains("<html"));
    }

    #[tokio::test]
    async fn status_reports_untracked_then_staged() {
        let repo = TestRepo::new();
        repo.write("a.txt", "a\n");
        let base = spawn_server().await;

        let (code, status) = get_json(&base, "/api/status", &repo).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(status["current"], "main");
        assert_eq!(status["not_added"], json!(["a.txt"]));

        let (code, ack) = post(
            &base,
            "/api/stage",
            json!({"repoPath": repo.path_str(), "files": ["a.txt"]}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(ack["message"], "Files staged successfully");

        let (_, status) = get_json(&base, "/api/status", &repo).await;
        assert_eq!(status["staged"], json!(["a.txt"]));
        assert_eq!(status["not_added"], json!([]));
    }

    #[tokio::test]
    async fn empty_commit_message_is_400() {
        let repo = TestRepo::new();
        let base = spawn_server().await;
        let head = repo.head();

        let (code, body) = post(
            &base,
            "/api/commit",
            json!({"repoPath": repo.path_str(), "message": "   "}),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Commit message is required");
        assert_eq!(repo.head(), head);
    }

    #[tokio::test]
    async fn missing_repo_path_is_400() {
        let base = spawn_server().await;
        let (code, body) = post(&base, "/api/push", json!({})).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn git_failure_is_500_with_git_text() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_server().await;
        let (code, body) = post(
            &base,
            "/api/pull",
            json!({"repoPath": dir.path().display().to_string()}),
        )
        .await;
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .to_lowercase()
            .contains("not a git repository"));
    }

    #[tokio::test]
    async fn recent_commits_and_branches() {
        let repo = TestRepo::with_commits(12);
        repo.git(&["branch", "topic"]);
        let base = spawn_server().await;

        let (_, commits) = get_json(&base, "/api/commits", &repo).await;
        let all = commits["all"].as_array().unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0]["message"], "commit 12");

        let (_, branches) = get_json(&base, "/api/branches", &repo).await;
        assert_eq!(branches["all"], json!(["main", "topic"]));
        assert_eq!(branches["current"], "main");
    }

    #[tokio::test]
    async fn branch_create_and_switch() {
        let repo = TestRepo::new();
        let base = spawn_server().await;

        let (code, _) = post(
            &base,
            "/api/branch/create",
            json!({"repoPath": repo.path_str(), "branchName": "topic"}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(repo.current_branch(), "topic");

        let (code, _) = post(
            &base,
            "/api/branch/switch",
            json!({"repoPath": repo.path_str(), "branchName": "main"}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(repo.current_branch(), "main");
    }
}

mod revert {
    use super::*;

    #[tokio::test]
    async fn guarded_revert_round_trip() {
        let repo = TestRepo::new();
        let target = repo.commit_file("a.txt", "a\n", "Add a");
        let base = spawn_server().await;

        let (code, body) = post(
            &base,
            "/api/revert",
            json!({"repoPath": repo.path_str(), "hash": target}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["message"], "Commit reverted successfully");
        assert_eq!(body["revertedCommit"], "Add a");
    }

    #[tokio::test]
    async fn dirty_tree_is_400() {
        let repo = TestRepo::new();
        let target = repo.commit_file("a.txt", "a\n", "Add a");
        repo.write("README.md", "dirty\n");
        let base = spawn_server().await;

        let (code, body) = post(
            &base,
            "/api/revert",
            json!({"repoPath": repo.path_str(), "hash": target}),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not clean"));
        assert_eq!(repo.subjects()[0], "Add a");
    }

    #[tokio::test]
    async fn unknown_hash_is_404() {
        let repo = TestRepo::new();
        let base = spawn_server().await;
        let (code, _) = post(
            &base,
            "/api/revert",
            json!({"repoPath": repo.path_str(), "hash": "0123456789abcdef"}),
        )
        .await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_hash_is_400() {
        let repo = TestRepo::new();
        let base = spawn_server().await;
        let (code, body) = post(&base, "/api/revert", json!({"repoPath": repo.path_str()})).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Repository path and commit hash are required");
    }
}

mod git_action {
    use super::*;

    #[tokio::test]
    async fn unknown_action_is_400() {
        let repo = TestRepo::new();
        let base = spawn_server().await;
        let (code, body) = post(
            &base,
            "/api/git-action",
            json!({"repoPath": repo.path_str(), "action": "rebase", "params": []}),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid action");
    }

    #[tokio::test]
    async fn log_returns_result_array() {
        let repo = TestRepo::with_commits(3);
        let base = spawn_server().await;
        let (code, body) = post(
            &base,
            "/api/git-action",
            json!({"repoPath": repo.path_str(), "action": "log", "params": {"count": 2}}),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        let result = body["result"].as_array().unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0]["message"], "commit 3");
    }

    #[tokio::test]
    async fn reset_soft_keeps_changes_staged() {
        let repo = TestRepo::new();
        let base_hash = repo.head();
        repo.commit_file("a.txt", "a\n", "Add a");
        let base = spawn_server().await;

        let (code, _) = post(
            &base,
            "/api/git-action",
            json!({
                "repoPath": repo.path_str(),
                "action": "reset",
                "params": {"hash": base_hash, "mode": "soft"},
            }),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(repo.head(), base_hash);

        let (_, status) = get_json(&base, "/api/status", &repo).await;
        assert_eq!(status["staged"], json!(["a.txt"]));
    }
}

mod flow {
    use super::*;

    #[tokio::test]
    async fn init_then_start_feature() {
        let repo = TestRepo::new();
        let base = spawn_server().await;

        let (code, body) = post(&base, "/api/flow/init", json!({"repoPath": repo.path_str()})).await;
        assert_eq!(code, StatusCode::OK, "{body}");

        let (code, body) = post(
            &base,
            "/api/flow/start",
            json!({"repoPath": repo.path_str(), "kind": "feature", "name": "login"}),
        )
        .await;
        assert_eq!(code, StatusCode::OK, "{body}");
        assert_eq!(repo.current_branch(), "feature/login");
    }

    #[tokio::test]
    async fn release_without_version_is_400() {
        let repo = TestRepo::new();
        let base = spawn_server().await;
        post(&base, "/api/flow/init", json!({"repoPath": repo.path_str()})).await;

        let (code, _) = post(
            &base,
            "/api/flow/start",
            json!({"repoPath": repo.path_str(), "kind": "release", "name": "r"}),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }
}

mod fragments {
    use super::*;

    async fn get_html(base: &str, path: &str, query: &[(&str, String)]) -> (StatusCode, String) {
        let resp = reqwest::Client::new()
            .get(format!("{base}{path}"))
            .query(query)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.text().await.unwrap())
    }

    #[tokio::test]
    async fn commit_pages() {
        let repo = TestRepo::with_commits(80);
        let base = spawn_server().await;

        let (code, first) = get_html(
            &base,
            "/ui/commits",
            &[("repoPath", repo.path_str()), ("skip", "0".into()), ("count", "50".into())],
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert!(first.contains("commit 80"));
        assert!(!first.contains("commit 30<"));

        let (_, second) = get_html(
            &base,
            "/ui/commits",
            &[("repoPath", repo.path_str()), ("skip", "50".into()), ("count", "50".into())],
        )
        .await;
        assert!(second.contains("commit 30"));
        assert!(second.contains("commit 1<"));
        assert!(!second.contains("commit 31<"));
    }

    #[tokio::test]
    async fn errors_render_as_html() {
        let base = spawn_server().await;
        let (code, body) = get_html(&base, "/ui/status", &[]).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(!body.trim_start().starts_with('{'));
    }

    #[tokio::test]
    async fn status_and_branch_fragments() {
        let repo = TestRepo::new();
        repo.write("<b>.txt", "x\n");
        let base = spawn_server().await;

        let (code, status) = get_html(&base, "/ui/status", &[("repoPath", repo.path_str())]).await;
        assert_eq!(code, StatusCode::OK);
        assert!(status.contains("&lt;b&gt;.txt"));
        assert!(!status.contains("<b>.txt"));

        let (_, branches) = get_html(&base, "/ui/branches", &[("repoPath", repo.path_str())]).await;
        assert!(branches.contains("main"));
    }
}
