//! Web server implementation

use crate::api::{self, ApiError};
use crate::config::{StoreBackend, WebServerConfig};
use crate::page;
use crate::static_files;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use quotes_common::{Database, Error, MemoryStore, QuoteForm, QuoteId, QuoteStore, Submitted};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared server state
///
/// The app is single-session: one form buffer is shared by every request.
pub struct WebServerState {
    pub store: Arc<dyn QuoteStore>,
    pub form: Mutex<QuoteForm>,
    pub cfg: WebServerConfig,
}

/// Web server
pub struct WebServer {
    state: Arc<WebServerState>,
}

pub async fn serve(cfg: WebServerConfig) -> anyhow::Result<()> {
    let addr = cfg.addr;
    let server = WebServer::new(cfg)?;
    server.serve(addr).await
}

impl WebServer {
    /// Create a new web server, opening the configured store
    pub fn new(cfg: WebServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn QuoteStore> = match &cfg.store {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Sqlite(path) => Arc::new(Database::open(path)?),
        };
        Ok(Self::with_store(cfg, store))
    }

    /// Create a web server over an existing store
    pub fn with_store(cfg: WebServerConfig, store: Arc<dyn QuoteStore>) -> Self {
        Self {
            state: Arc::new(WebServerState {
                store,
                form: Mutex::new(QuoteForm::new()),
                cfg,
            }),
        }
    }

    pub fn state(&self) -> Arc<WebServerState> {
        self.state.clone()
    }

    /// Create router
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            // Page and its form posts
            .route("/", get(index_handler))
            .route("/form/submit", post(form_submit_handler))
            .route("/form/cancel", post(form_cancel_handler))
            .route("/quotes/:id/edit", post(quote_edit_handler))
            .route("/quotes/:id/delete", post(quote_delete_handler))
            .route("/assets/*path", get(static_handler))
            // Health
            .route("/health", get(health_handler))
            .route("/api/health", get(health_handler))
            // JSON API
            .route(
                "/api/quotes",
                get(api::list_quotes_handler).post(api::create_quote_handler),
            )
            .route(
                "/api/quotes/:id",
                get(api::get_quote_handler)
                    .put(api::replace_quote_handler)
                    .delete(api::delete_quote_handler),
            )
            .route("/api/form", get(api::form_state_handler));

        if self.state.cfg.test_mode {
            warn!("Test mode enabled: POST /api/test/reset is exposed");
            router = router.route("/api/test/reset", post(api::test_reset_handler));
        }

        router
            .fallback(not_found_handler)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already-bound listener
    pub async fn serve_on(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        info!("Quotes web server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Quotes web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quotes-web"
    }))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not found"})),
    )
}

async fn static_handler(Path(path): Path<String>) -> Response {
    static_files::serve(&path)
}

// ============================================================================
// Page handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuoteFormInput {
    #[serde(default)]
    text: String,
    #[serde(default)]
    author: String,
}

async fn index_handler(State(state): State<Arc<WebServerState>>) -> Response {
    render_index(&state, StatusCode::OK, None).await
}

async fn render_index(
    state: &WebServerState,
    status: StatusCode,
    notice: Option<String>,
) -> Response {
    let form = state.form.lock().await;
    match state.store.list() {
        Ok(quotes) => {
            let html = page::render_page(&quotes, &form, notice.as_deref());
            (status, Html(html)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Redirect back to the page on success; re-render with a notice on bad input
async fn after_form_action(state: &WebServerState, result: Result<(), Error>) -> Response {
    match result {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) if e.is_client_error() => {
            let status = ApiError::from(e).status();
            let notice = match status {
                StatusCode::NOT_FOUND => "That quote no longer exists.".to_string(),
                _ => "Both a quote and an author are required.".to_string(),
            };
            render_index(state, status, Some(notice)).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn form_submit_handler(
    State(state): State<Arc<WebServerState>>,
    Form(input): Form<QuoteFormInput>,
) -> Response {
    let result = {
        let mut form = state.form.lock().await;
        form.set_text(input.text);
        form.set_author(input.author);
        form.submit(state.store.as_ref())
    };

    let result = result.map(|submitted| match submitted {
        Submitted::Created(q) => info!("Quote {} submitted", q.id),
        Submitted::Updated(q) => info!("Quote {} re-submitted", q.id),
    });
    after_form_action(&state, result).await
}

async fn form_cancel_handler(State(state): State<Arc<WebServerState>>) -> Response {
    state.form.lock().await.cancel();
    Redirect::to("/").into_response()
}

async fn quote_edit_handler(
    State(state): State<Arc<WebServerState>>,
    Path(id): Path<u64>,
) -> Response {
    let result = {
        let mut form = state.form.lock().await;
        form.edit(state.store.as_ref(), QuoteId(id)).map(|_| ())
    };
    after_form_action(&state, result).await
}

async fn quote_delete_handler(
    State(state): State<Arc<WebServerState>>,
    Path(id): Path<u64>,
) -> Response {
    let result = {
        let mut form = state.form.lock().await;
        form.delete(state.store.as_ref(), QuoteId(id))
    };
    after_form_action(&state, result).await
}
