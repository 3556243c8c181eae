//! JSON API
//!
//! json-server style resource routes over the quote store:
//!
//! | Method | Path               | Success |
//! |--------|--------------------|---------|
//! | GET    | `/api/quotes`      | 200 list |
//! | POST   | `/api/quotes`      | 201 created quote |
//! | GET    | `/api/quotes/:id`  | 200 quote |
//! | PUT    | `/api/quotes/:id`  | 200 updated quote |
//! | DELETE | `/api/quotes/:id`  | 204 |
//! | GET    | `/api/form`        | 200 form snapshot |
//!
//! Errors are returned as `{"error": "..."}`, including malformed bodies
//! and non-numeric ids rejected before a handler runs.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use quotes_common::{Error, FormSnapshot, Quote, QuoteDraft, QuoteId};
use tracing::{debug, error, info, warn};

use crate::server::WebServerState;

/// HTTP mapping of a store/form error or a rejected request
#[derive(Debug)]
pub enum ApiError {
    Store(Error),
    /// The request never reached the handler: bad body or path segment
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(Error::EmptyField { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Store(e) => e.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Store(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!("Request failed: {}", message);
        } else if matches!(self, ApiError::Rejected { .. }) {
            warn!("Rejected request: {}", message);
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

type QuoteIdPath = WithRejection<Path<u64>, ApiError>;
type DraftBody = WithRejection<Json<QuoteDraft>, ApiError>;

pub async fn list_quotes_handler(
    State(state): State<Arc<WebServerState>>,
) -> ApiResult<Json<Vec<Quote>>> {
    let quotes = state.store.list()?;
    debug!("Listing {} quote(s)", quotes.len());
    Ok(Json(quotes))
}

pub async fn create_quote_handler(
    State(state): State<Arc<WebServerState>>,
    WithRejection(Json(draft), _): DraftBody,
) -> ApiResult<impl IntoResponse> {
    let quote = state.store.insert(&draft)?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn get_quote_handler(
    State(state): State<Arc<WebServerState>>,
    WithRejection(Path(id), _): QuoteIdPath,
) -> ApiResult<Json<Quote>> {
    Ok(Json(state.store.get(QuoteId(id))?))
}

pub async fn replace_quote_handler(
    State(state): State<Arc<WebServerState>>,
    WithRejection(Path(id), _): QuoteIdPath,
    WithRejection(Json(draft), _): DraftBody,
) -> ApiResult<Json<Quote>> {
    Ok(Json(state.store.replace(QuoteId(id), &draft)?))
}

pub async fn delete_quote_handler(
    State(state): State<Arc<WebServerState>>,
    WithRejection(Path(id), _): QuoteIdPath,
) -> ApiResult<StatusCode> {
    // Through the form so an open edit of this quote is dropped too.
    let mut form = state.form.lock().await;
    form.delete(state.store.as_ref(), QuoteId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn form_state_handler(State(state): State<Arc<WebServerState>>) -> Json<FormSnapshot> {
    Json(state.form.lock().await.snapshot())
}

/// Clear all quotes and the form. Only routed in test mode.
pub async fn test_reset_handler(State(state): State<Arc<WebServerState>>) -> ApiResult<StatusCode> {
    let mut form = state.form.lock().await;
    state.store.clear()?;
    form.cancel();
    info!("Test state reset");
    Ok(StatusCode::NO_CONTENT)
}
