// src/web.rs

//! The browser front end: an embedded single page plus a small JSON API.
//!
//! Analyses run on blocking worker threads. Progress for each request is
//! broadcast as Server-Sent Events tagged with the caller's `request_id`.

use crate::config::{ConfigBuilder, GitHubConfig, LlmConfig};
use crate::constants::EXPORT_FILE_NAME;
use crate::errors::Error;
use crate::progress::ProgressReporter;
use crate::{analyze, connect, summarize};
use axum::extract::Query;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode, Uri},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Settings shared by every request the server handles.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// GitHub settings. The token is used when a request does not carry one.
    pub github: GitHubConfig,
    /// Completion endpoint. `None` disables `/api/summarize`.
    pub llm: Option<LlmConfig>,
}

// --- Internal Types ---
#[derive(Clone, Debug)]
struct BroadcastMessage {
    request_id: String,
    payload: String,
}

struct AppState {
    tx: broadcast::Sender<BroadcastMessage>,
    config: ServerConfig,
}

// --- Web Progress Reporter ---
// Bridges the synchronous progress trait to async SSE
struct WebProgressReporter {
    tx: broadcast::Sender<BroadcastMessage>,
    request_id: String,
    count: AtomicU64,
}

impl WebProgressReporter {
    fn new(tx: broadcast::Sender<BroadcastMessage>, request_id: String) -> Self {
        Self {
            tx,
            request_id,
            count: AtomicU64::new(0),
        }
    }

    fn send(&self, payload: serde_json::Value) {
        // No subscribers is fine.
        let _ = self.tx.send(BroadcastMessage {
            request_id: self.request_id.clone(),
            payload: payload.to_string(),
        });
    }
}

impl ProgressReporter for WebProgressReporter {
    fn set_message(&self, msg: String) {
        self.send(json!({"type": "progress", "msg": msg}));
    }
    fn inc(&self, delta: u64) {
        let before = self.count.fetch_add(delta, Ordering::Relaxed);
        let after = before + delta;
        if after / 25 != before / 25 {
            self.send(json!({"type": "count", "entries": after}));
        }
    }
    fn finish(&self) {
        self.send(json!({"type": "done"}));
    }
    fn finish_with_message(&self, msg: String) {
        self.set_message(msg);
        self.finish();
    }
}

// --- Request and Response Structs ---
#[derive(Deserialize, Serialize, Debug)]
pub struct AnalyzeRequest {
    pub repo_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub sorted: bool,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct AnalyzeResponse {
    pub repo_url: String,
    pub readme: String,
    pub license: String,
    pub structure: String,
    pub contents: String,
    pub export: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SummarizeRequest {
    pub document: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Deserialize, Debug)]
pub struct EventQuery {
    pub request_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FeaturesResponse {
    pub summarize: bool,
    /// Name offered for the downloaded export.
    pub export_file_name: String,
}

// --- Server Startup ---
pub fn create_router(config: ServerConfig) -> Router {
    let (tx, _rx) = broadcast::channel(100);
    let state = Arc::new(AppState { tx, config });

    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/events", get(sse_handler))
        .route("/api/features", get(features_handler))
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, open_browser: bool, config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(config);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let url = format!("http://{}", addr);

    println!("repodigest running at {}", url);
    info!("Listening on {}", addr);

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("Could not open a browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Maps a failed analysis to a status: bad input is the caller's fault,
/// everything else is the provider's.
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Config(_) | Error::InvalidRepoUrl(_) | Error::NotFound { .. } => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// The text shown to the browser for a failed analysis. Details stay in the log.
fn public_message(error: &Error) -> &'static str {
    match error {
        Error::Config(_) => "The request settings are invalid.",
        Error::InvalidRepoUrl(_) => "Could not parse the repository URL.",
        Error::NotFound { .. } => "Repository not found.",
        Error::Access { .. } => "GitHub refused access to the repository.",
        _ => "The repository could not be read from GitHub.",
    }
}

// --- Handlers ---

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();
    if path.is_empty() {
        path = "index.html".to_string();
    }
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn features_handler(State(state): State<Arc<AppState>>) -> Json<FeaturesResponse> {
    Json(FeaturesResponse {
        summarize: state.config.llm.is_some(),
        export_file_name: EXPORT_FILE_NAME.to_string(),
    })
}

// Server-Sent Events Handler
async fn sse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQuery>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let filter_id = params.request_id.unwrap_or_else(|| "global".to_string());
    let rx = state.tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |msg| {
        // Clients only see their own events
        match msg {
            Ok(m) if m.request_id == filter_id => Some(Ok(Event::default().data(m.payload))),
            Ok(_) => None,
            Err(_) => Some(Ok(Event::default().event("error").data("Stream error"))),
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let tx = state.tx.clone();
    let server = state.config.clone();
    let request_id = req
        .request_id
        .clone()
        .unwrap_or_else(|| "global".to_string());

    let result = tokio::task::spawn_blocking(move || {
        let reporter = WebProgressReporter::new(tx, request_id);
        reporter.set_message("Connecting...".to_string());

        let mut builder = ConfigBuilder::new()
            .repo_url(req.repo_url)
            .api_url(server.github.api_base_url.clone())
            .timeout(server.github.timeout)
            .sort_entries(req.sorted);
        let token = req
            .token
            .filter(|t| !t.trim().is_empty())
            .or(server.github.token.clone());
        if let Some(token) = token {
            builder = builder.token(token);
        }
        if let Some(git_ref) = req.git_ref.filter(|r| !r.trim().is_empty()) {
            builder = builder.git_ref(git_ref);
        }

        let config = builder.build()?;
        let client = connect(&config)?;
        let analysis = analyze(&config, &client, &reporter)?;
        reporter.finish();

        let export = analysis.to_export();
        Ok::<AnalyzeResponse, Error>(AnalyzeResponse {
            repo_url: analysis.repo_url,
            readme: analysis.readme,
            license: analysis.license,
            structure: analysis.structure,
            contents: analysis.contents,
            export,
        })
    })
    .await;

    match result {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e)) => {
            warn!("Analysis failed: {}", e);
            error_response(status_for(&e), public_message(&e))
        }
        Err(e) => {
            warn!("Analysis task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error.")
        }
    }
}

async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> Response {
    let Some(llm) = state.config.llm.clone() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Summarization is not configured on this server.",
        );
    };
    if req.document.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Nothing to summarize.");
    }

    let tx = state.tx.clone();
    let request_id = req.request_id.unwrap_or_else(|| "global".to_string());
    let document = req.document;

    let result = tokio::task::spawn_blocking(move || {
        let reporter = WebProgressReporter::new(tx, request_id);
        reporter.set_message("Summarizing...".to_string());
        let summary = summarize(&llm, &document);
        reporter.finish();
        summary
    })
    .await;

    match result {
        Ok(summary) => (StatusCode::OK, Json(SummarizeResponse { summary })).into_response(),
        Err(e) => {
            warn!("Summary task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error.")
        }
    }
}
