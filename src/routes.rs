use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregator::{self, Aggregator};
use crate::article::Article;
use crate::registry::CategorySelector;

pub struct AppState {
    pub aggregator: Aggregator,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/news", get(news_index))
        .route("/news/search/:query", get(search_news))
        .route("/news/:category", get(news_category))
        .route("/health", get(health))
        .with_state(state)
}

// Custom error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch news articles" })),
                )
                    .into_response()
            }
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError::Internal(err.into())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    12
}

impl NewsQuery {
    /// Both parameters must be positive; anything else is a client error.
    fn validate(&self) -> Result<(usize, usize), ApiError> {
        if self.page < 1 {
            return Err(ApiError::BadRequest(format!(
                "page must be a positive integer, got {}",
                self.page
            )));
        }
        if self.limit < 1 {
            return Err(ApiError::BadRequest(format!(
                "limit must be a positive integer, got {}",
                self.limit
            )));
        }
        Ok((self.page as usize, self.limit as usize))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    articles: Vec<Article>,
    total: usize,
    has_more: bool,
    page: usize,
    limit: usize,
}

#[derive(Serialize)]
struct SearchResponse {
    articles: Vec<Article>,
    total: usize,
    query: String,
}

// Route handlers
pub async fn news_index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    news_page(&state, CategorySelector::All, query).await
}

pub async fn news_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(query): Query<NewsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // An unrecognized category means "all categories", not an error
    let selector = CategorySelector::parse(Some(&category));
    news_page(&state, selector, query).await
}

async fn news_page(
    state: &AppState,
    selector: CategorySelector,
    query: NewsQuery,
) -> Result<Json<NewsResponse>, ApiError> {
    let (page, limit) = query.validate()?;

    let mut articles = state.aggregator.aggregate(selector).await;
    aggregator::rank(&mut articles);
    let window = aggregator::paginate(articles, page, limit);

    Ok(Json(NewsResponse {
        articles: window.articles,
        total: window.total,
        has_more: window.has_more,
        page,
        limit,
    }))
}

pub async fn search_news(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let term = query.to_lowercase();

    // Search scans the full merged corpus across all categories
    let articles = state.aggregator.aggregate(CategorySelector::All).await;
    let matches = aggregator::search(articles, &term);

    Ok(Json(SearchResponse {
        total: matches.len(),
        articles: matches,
        query: term,
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK", "timestamp": Utc::now() }))
}
