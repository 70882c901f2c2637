//! server::routes
//!
//! Routes:
//! - `GET  /`                    - Browser shell
//! - `GET  /healthz`             - Health check
//! - `GET  /api/status`          - StatusSnapshot
//! - `GET  /api/branches`        - BranchList
//! - `GET  /api/commits`         - `{all}` of the most recent commits
//! - `POST /api/stage`           - Stage files
//! - `POST /api/commit`          - Commit the index
//! - `POST /api/push`            - Push
//! - `POST /api/pull`            - Pull
//! - `POST /api/branch/create`   - Create and check out a branch
//! - `POST /api/branch/switch`   - Check out a branch
//! - `POST /api/branch/merge`    - Merge a branch into the current one
//! - `POST /api/revert`          - Guarded revert
//! - `POST /api/git-action`      - Generic action table
//! - `POST /api/flow/init`       - Create master and develop
//! - `POST /api/flow/start`      - Start a feature/release/hotfix branch
//! - `GET  /ui/status`           - Status panel fragment
//! - `GET  /ui/commits`          - Commit items fragment (`skip`, `count`)
//! - `GET  /ui/branches`         - Branch `<option>` fragment
//!
//! GET endpoints take `repoPath` as a query parameter; POST endpoints take
//! it in a camelCase JSON body.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use super::error::AppError;
use super::AppState;
use crate::dispatch::action::{run_action, ActionRequest, ActionResponse};
use crate::dispatch::ops::{self, require_repo_path, Ack, CommitList};
use crate::dispatch::revert::{guarded_revert, require_hash, RevertOutcome, RevertRequest};
use crate::dispatch::DispatchError;
use crate::flow::{self, BranchKind, FlowStart};
use crate::git::{BranchList, RepositoryHandle, StatusSnapshot};
use crate::ui::{html, page};

/// Build the router with all routes and shared state.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/healthz", get(handle_health))
        // JSON API
        .route("/api/status", get(handle_status))
        .route("/api/branches", get(handle_branches))
        .route("/api/commits", get(handle_commits))
        .route("/api/stage", post(handle_stage))
        .route("/api/commit", post(handle_commit))
        .route("/api/push", post(handle_push))
        .route("/api/pull", post(handle_pull))
        .route("/api/branch/create", post(handle_branch_create))
        .route("/api/branch/switch", post(handle_branch_switch))
        .route("/api/branch/merge", post(handle_branch_merge))
        .route("/api/revert", post(handle_revert))
        .route("/api/git-action", post(handle_git_action))
        .route("/api/flow/init", post(handle_flow_init))
        .route("/api/flow/start", post(handle_flow_start))
        // HTML fragments
        .route("/ui/status", get(handle_ui_status))
        .route("/ui/commits", get(handle_ui_commits))
        .route("/ui/branches", get(handle_ui_branches))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoQuery {
    repo_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery {
    repo_path: Option<String>,
    skip: Option<usize>,
    count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoBody {
    repo_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StageBody {
    repo_path: Option<String>,
    files: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitBody {
    repo_path: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BranchBody {
    repo_path: Option<String>,
    branch_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowStartBody {
    repo_path: Option<String>,
    kind: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

type ApiResult<T> = Result<Json<T>, AppError>;

impl AppState {
    /// Adapter bound to the request's repository path.
    fn repo(&self, repo_path: Option<&str>) -> Result<RepositoryHandle, AppError> {
        let path = require_repo_path(repo_path)?;
        Ok(RepositoryHandle::with_binary(path, self.git_binary.clone()))
    }
}

// ---------------------------------------------------------------------------
// Page and health
// ---------------------------------------------------------------------------

async fn handle_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let default_repo = state
        .default_repo
        .as_ref()
        .map(|p| p.display().to_string());
    Html(page::render_page(default_repo.as_deref(), state.page_size))
}

async fn handle_health() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

#[instrument(skip(state))]
async fn handle_status(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> ApiResult<StatusSnapshot> {
    let Query(query) = query?;
    let repo = state.repo(query.repo_path.as_deref())?;
    Ok(Json(ops::status(&repo).await?))
}

#[instrument(skip(state))]
async fn handle_branches(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> ApiResult<BranchList> {
    let Query(query) = query?;
    let repo = state.repo(query.repo_path.as_deref())?;
    Ok(Json(ops::branches(&repo).await?))
}

#[instrument(skip(state))]
async fn handle_commits(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> ApiResult<CommitList> {
    let Query(query) = query?;
    let repo = state.repo(query.repo_path.as_deref())?;
    Ok(Json(ops::recent_commits(&repo, state.recent_commits).await?))
}

#[instrument(skip(state, body))]
async fn handle_stage(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StageBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(ops::stage(&repo, body.files.as_deref()).await?))
}

#[instrument(skip(state, body))]
async fn handle_commit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CommitBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(ops::commit(&repo, body.message.as_deref()).await?))
}

#[instrument(skip(state, body))]
async fn handle_push(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RepoBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(ops::push(&repo).await?))
}

#[instrument(skip(state, body))]
async fn handle_pull(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RepoBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(ops::pull(&repo).await?))
}

#[instrument(skip(state, body))]
async fn handle_branch_create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BranchBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(
        ops::create_branch(&repo, body.branch_name.as_deref()).await?,
    ))
}

#[instrument(skip(state, body))]
async fn handle_branch_switch(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BranchBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(
        ops::switch_branch(&repo, body.branch_name.as_deref()).await?,
    ))
}

#[instrument(skip(state, body))]
async fn handle_branch_merge(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BranchBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    Ok(Json(
        ops::merge_branch(&repo, body.branch_name.as_deref()).await?,
    ))
}

#[instrument(skip(state, body))]
async fn handle_revert(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RevertRequest>, JsonRejection>,
) -> ApiResult<RevertOutcome> {
    let Json(body) = body?;
    let path = body.repo_path.as_deref().filter(|p| !p.trim().is_empty());
    if path.is_none() {
        return Err(DispatchError::invalid("Repository path and commit hash are required").into());
    }
    let rev = require_hash(body.hash.as_deref())?;
    let repo = state.repo(path)?;
    Ok(Json(guarded_revert(&repo, &rev).await?))
}

#[instrument(skip(state, body))]
async fn handle_git_action(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> ApiResult<ActionResponse> {
    let Json(request) = body?;
    let validated = request.validate()?;
    let repo = RepositoryHandle::with_binary(validated.repo_path, state.git_binary.clone());
    let result = run_action(&repo, &validated.params).await?;
    Ok(Json(ActionResponse { result }))
}

#[instrument(skip(state, body))]
async fn handle_flow_init(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RepoBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    let created = flow::init(&repo, &state.flow)
        .await
        .map_err(DispatchError::from)?;
    let message = if created.is_empty() {
        "Git Flow already initialized".to_string()
    } else {
        format!("Git Flow initialized (created {})", created.join(", "))
    };
    Ok(Json(Ack::new(message)))
}

#[instrument(skip(state, body))]
async fn handle_flow_start(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FlowStartBody>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let repo = state.repo(body.repo_path.as_deref())?;
    let (kind, name) = match (body.kind.as_deref(), body.name.as_deref()) {
        (Some(kind), Some(name)) if !kind.trim().is_empty() && !name.trim().is_empty() => {
            (kind, name)
        }
        _ => return Err(DispatchError::invalid("Please fill in all required fields").into()),
    };
    let start = kind
        .parse::<BranchKind>()
        .and_then(|kind| FlowStart::new(kind, name, body.version.as_deref()))
        .map_err(DispatchError::from)?;
    let branch = flow::start(&repo, &state.flow, &start)
        .await
        .map_err(DispatchError::from)?;
    Ok(Json(Ack::new(format!("Created {} branch: {branch}", start.kind))))
}

// ---------------------------------------------------------------------------
// HTML fragments
// ---------------------------------------------------------------------------

#[instrument(skip(state))]
async fn handle_ui_status(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query.map_err(|e| AppError::from(e).fragment())?;
    let repo = state
        .repo(query.repo_path.as_deref())
        .map_err(AppError::fragment)?;
    let status = ops::status(&repo)
        .await
        .map_err(AppError::Fragment)?;
    Ok(Html(html::status_panel(&status)))
}

#[instrument(skip(state))]
async fn handle_ui_commits(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query.map_err(|e| AppError::from(e).fragment())?;
    let repo = state
        .repo(query.repo_path.as_deref())
        .map_err(AppError::fragment)?;
    let skip = query.skip.unwrap_or(0);
    let count = query.count.unwrap_or(state.page_size).max(1);
    let commits = ops::commits_page(&repo, skip, count)
        .await
        .map_err(AppError::Fragment)?;
    Ok(Html(html::commit_items(&commits, Utc::now())))
}

#[instrument(skip(state))]
async fn handle_ui_branches(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query.map_err(|e| AppError::from(e).fragment())?;
    let repo = state
        .repo(query.repo_path.as_deref())
        .map_err(AppError::fragment)?;
    let branches = ops::branches(&repo).await.map_err(AppError::Fragment)?;
    Ok(Html(html::branch_options(&branches)))
}
