use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use codemap_indexer::{
    bounded_prefix, build_index_with, render_report, CodebaseIndex, FileStatus, IndexStats,
    IndexerConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Report prefix budget for the query context
pub(crate) const DEFAULT_CONTEXT_CHARS: usize = 20_000;

pub(crate) struct AppState {
    root: PathBuf,
    config: IndexerConfig,
    index: RwLock<Option<Arc<CodebaseIndex>>>,
}

pub(crate) type SharedState = Arc<AppState>;

impl AppState {
    pub(crate) fn new(root: PathBuf, config: IndexerConfig) -> SharedState {
        Arc::new(Self {
            root,
            config,
            index: RwLock::new(None),
        })
    }

    /// The current index, built on first use
    async fn current(&self) -> anyhow::Result<Arc<CodebaseIndex>> {
        if let Some(index) = self.index.read().await.as_ref() {
            return Ok(index.clone());
        }

        let mut slot = self.index.write().await;
        if let Some(index) = slot.as_ref() {
            return Ok(index.clone());
        }
        let index = Arc::new(self.build().await?);
        *slot = Some(index.clone());
        Ok(index)
    }

    /// Build a fresh index and replace the current one wholesale
    async fn rebuild(&self) -> anyhow::Result<Arc<CodebaseIndex>> {
        let index = Arc::new(self.build().await?);
        *self.index.write().await = Some(index.clone());
        Ok(index)
    }

    async fn build(&self) -> anyhow::Result<CodebaseIndex> {
        let root = self.root.clone();
        let config = self.config.clone();
        let index = tokio::task::spawn_blocking(move || build_index_with(&root, &config)).await??;
        Ok(index)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ApiStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
struct ApiResponse {
    status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    data: serde_json::Value,
}

fn ok_response(data: impl Serialize) -> Response {
    match serde_json::to_value(data) {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse {
                status: ApiStatus::Ok,
                message: None,
                data,
            }),
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to serialize response: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiResponse {
            status: ApiStatus::Error,
            message: Some(message.to_string()),
            data: serde_json::Value::Null,
        }),
    )
        .into_response()
}

fn index_failure(err: &anyhow::Error) -> Response {
    log::warn!("Codebase index unavailable: {err:#}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to build codebase index",
    )
}

pub(crate) fn router(state: SharedState) -> Router {
    Router::new()
        .route("/status", get(http_status))
        .route("/context", get(http_context))
        .route("/reindex", post(http_reindex))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    file: String,
}

async fn http_status(State(state): State<SharedState>, Query(query): Query<StatusQuery>) -> Response {
    let index = match state.current().await {
        Ok(index) => index,
        Err(e) => return index_failure(&e),
    };

    match index.file(&query.file) {
        Some(file) => ok_response(FileStatus::from_file(file)),
        None => error_response(
            StatusCode::NOT_FOUND,
            &format!("File not indexed: {}", query.file),
        ),
    }
}

#[derive(Debug, Deserialize)]
struct ContextQuery {
    q: String,
    max_chars: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ContextOutput {
    prompt: String,
    truncated: bool,
}

/// Prompt text a completion service would receive for `question`
fn build_prompt(report: &str, question: &str, max_chars: usize) -> ContextOutput {
    let prefix = bounded_prefix(report, max_chars);
    ContextOutput {
        prompt: format!("Codebase index:\n\n{prefix}\n\nQuestion: {question}\n"),
        truncated: prefix.len() < report.len(),
    }
}

async fn http_context(
    State(state): State<SharedState>,
    Query(query): Query<ContextQuery>,
) -> Response {
    let index = match state.current().await {
        Ok(index) => index,
        Err(e) => return index_failure(&e),
    };

    let report = render_report(&index, &state.root);
    let max_chars = query.max_chars.unwrap_or(DEFAULT_CONTEXT_CHARS);
    ok_response(build_prompt(&report, &query.q, max_chars))
}

async fn http_reindex(State(state): State<SharedState>) -> Response {
    match state.rebuild().await {
        Ok(index) => ok_response(IndexStats::from_index(&index)),
        Err(e) => index_failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::tempdir;
    use tower::ServiceExt;

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn project() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(
            temp.path().join("src/index.ts"),
            "app.get('/users', handler)\nfunction main() {\n  return 1;\n}\n",
        )
        .unwrap();
        temp
    }

    fn state_for(root: &std::path::Path) -> SharedState {
        AppState::new(fs::canonicalize(root).unwrap(), IndexerConfig::default())
    }

    #[tokio::test]
    async fn status_reports_designated_file() {
        let temp = project();
        let app = router(state_for(temp.path()));

        let (status, body) = call(app, "GET", "/status?file=src/index.ts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"]["line_count"], 5);
        assert_eq!(body["data"]["routes"], 1);
        assert_eq!(body["data"]["functions"], 1);
    }

    #[tokio::test]
    async fn status_for_unknown_file_is_not_found() {
        let temp = project();
        let app = router(state_for(temp.path()));

        let (status, body) = call(app, "GET", "/status?file=src/missing.ts").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn context_is_bounded_report_prefix() {
        let temp = project();
        let app = router(state_for(temp.path()));

        let (status, body) = call(app, "GET", "/context?q=routes&max_chars=30").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["truncated"], true);
        let prompt = body["data"]["prompt"].as_str().unwrap();
        assert!(prompt.starts_with("Codebase index:\n\n# Codebase Structure"));
        assert!(prompt.ends_with("Question: routes\n"));
    }

    #[tokio::test]
    async fn reindex_replaces_index() {
        let temp = project();
        let state = state_for(temp.path());

        let (_, body) = call(router(state.clone()), "GET", "/status?file=src/index.ts").await;
        assert_eq!(body["data"]["routes"], 1);

        fs::write(
            temp.path().join("src/index.ts"),
            "app.get('/a', h)\napp.post('/b', h)\n",
        )
        .unwrap();

        let (_, stale) = call(router(state.clone()), "GET", "/status?file=src/index.ts").await;
        assert_eq!(stale["data"]["routes"], 1);

        let (status, stats) = call(router(state.clone()), "POST", "/reindex").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["data"]["routes"], 2);

        let (_, fresh) = call(router(state), "GET", "/status?file=src/index.ts").await;
        assert_eq!(fresh["data"]["routes"], 2);
    }

    #[tokio::test]
    async fn scan_failure_is_generic_server_error() {
        let temp = tempdir().unwrap();
        let state = AppState::new(temp.path().join("gone"), IndexerConfig::default());

        let (status, body) = call(router(state), "GET", "/status?file=x.ts").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to build codebase index");
    }

    #[test]
    fn prompt_without_truncation() {
        let out = build_prompt("# Codebase Structure\n", "what?", DEFAULT_CONTEXT_CHARS);
        assert!(!out.truncated);
        assert!(out.prompt.contains("# Codebase Structure\n"));
    }
}
