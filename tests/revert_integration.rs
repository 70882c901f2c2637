//! Integration tests for the guarded revert and the generic action table
//! against real repositories.

mod common;

use common::TestRepo;
use serde_json::json;

use githandle::core::types::Revision;
use githandle::dispatch::{self, guarded_revert, ActionOutput, ActionRequest, DispatchError};
use githandle::git::{RepositoryHandle, Vcs};

fn rev(hash: &str) -> Revision {
    Revision::new(hash).unwrap()
}

#[tokio::test]
async fn reverts_clean_commit() {
    let repo = TestRepo::new();
    let target = repo.commit_file("a.txt", "a\n", "Add a");
    let handle = RepositoryHandle::new(repo.path());

    let outcome = guarded_revert(&handle, &rev(&target)).await.unwrap();

    assert_eq!(outcome.message, "Commit reverted successfully");
    assert_eq!(outcome.reverted_commit, "Add a");
    assert_eq!(repo.subjects()[0], "Revert \"Add a\"");
    assert!(!repo.path().join("a.txt").exists());
}

#[tokio::test]
async fn dirty_tree_is_refused_before_reverting() {
    let repo = TestRepo::new();
    let target = repo.commit_file("a.txt", "a\n", "Add a");
    repo.write("scratch.txt", "wip\n");
    let head = repo.head();

    let err = guarded_revert(&RepositoryHandle::new(repo.path()), &rev(&target))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::DirtyWorkingTree));
    assert_eq!(err.status_code(), 400);
    assert_eq!(repo.head(), head);
}

#[tokio::test]
async fn unknown_hash_is_not_found() {
    let repo = TestRepo::new();
    let head = repo.head();

    let err = guarded_revert(&RepositoryHandle::new(repo.path()), &rev("0123456789abcdef"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::CommitNotFound(_)));
    assert_eq!(err.status_code(), 404);
    assert_eq!(repo.head(), head);
}

#[tokio::test]
async fn conflicting_revert_is_aborted_and_classified() {
    let repo = TestRepo::new();
    let target = repo.commit_file("file.txt", "one\n", "First version");
    repo.commit_file("file.txt", "two\n", "Second version");

    let err = guarded_revert(&RepositoryHandle::new(repo.path()), &rev(&target))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::MergeConflict { .. }));
    let envelope = err.to_envelope();
    assert!(envelope.error.contains("conflicts"));
    assert!(envelope.details.is_some());

    // The aborted revert leaves the tree as it was.
    let status = RepositoryHandle::new(repo.path()).status().await.unwrap();
    assert!(status.is_clean());
    assert_eq!(repo.read("file.txt"), "two\n");
}

mod generic_actions {
    use super::*;

    fn request(repo: &TestRepo, action: &str, params: serde_json::Value) -> ActionRequest {
        serde_json::from_value(json!({
            "repoPath": repo.path_str(),
            "action": action,
            "params": params,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn log_and_status() {
        let repo = TestRepo::with_commits(5);
        let handle = RepositoryHandle::new(repo.path());

        let out = dispatch::dispatch(&handle, &request(&repo, "log", json!({"skip": 1, "count": 2})))
            .await
            .unwrap();
        match out {
            ActionOutput::Commits(commits) => {
                let subjects: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
                assert_eq!(subjects, ["commit 4", "commit 3"]);
            }
            other => panic!("unexpected output: {other:?}"),
        }

        let out = dispatch::dispatch(&handle, &request(&repo, "status", json!(null)))
            .await
            .unwrap();
        assert!(matches!(out, ActionOutput::Status(s) if s.is_clean()));
    }

    #[tokio::test]
    async fn reset_hard_moves_head() {
        let repo = TestRepo::with_commits(3);
        let handle = RepositoryHandle::new(repo.path());
        let target = handle.log(2, 1).await.unwrap().remove(0);

        dispatch::dispatch(
            &handle,
            &request(&repo, "reset", json!({"hash": target.hash, "mode": "hard"})),
        )
        .await
        .unwrap();

        assert_eq!(repo.head(), target.hash);
        assert_eq!(repo.subjects(), ["commit 1"]);
    }

    #[tokio::test]
    async fn checkout_new_branch_from_flags() {
        let repo = TestRepo::new();
        let handle = RepositoryHandle::new(repo.path());

        dispatch::dispatch(&handle, &request(&repo, "checkout", json!(["-b", "topic"])))
            .await
            .unwrap();
        assert_eq!(repo.current_branch(), "topic");

        let out = dispatch::dispatch(&handle, &request(&repo, "branch", json!([])))
            .await
            .unwrap();
        assert_eq!(
            out,
            ActionOutput::Branches(vec!["main".to_string(), "topic".to_string()])
        );
    }

    #[tokio::test]
    async fn unknown_action_never_reaches_git() {
        let repo = TestRepo::new();
        let head = repo.head();
        let err = dispatch::dispatch(
            &RepositoryHandle::new(repo.path()),
            &request(&repo, "rebase", json!([])),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid action");
        assert_eq!(repo.head(), head);
    }
}
