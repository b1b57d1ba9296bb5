use super::ApiError;
use crate::app_state::models::AppState;
use crate::error::ServiceError;
use crate::models::page::{Page, PageQuery};
use axum::Json;
use axum::extract::{Extension, Query, rejection::QueryRejection};
use std::sync::Arc;

fn page_query(query: Result<Query<PageQuery>, QueryRejection>) -> Result<PageQuery, ServiceError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| ServiceError::invalid_parameter("query", e.body_text()))
}

/// `GET /live?page&page_size`
pub async fn live(
    Extension(app_state): Extension<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let page = app_state.paginator.live(page_query(query)?)?;
    Ok(Json(page))
}

/// `GET /historical?page&page_size`, newest first.
pub async fn historical(
    Extension(app_state): Extension<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page>, ApiError> {
    let page = app_state.paginator.historical(page_query(query)?)?;
    Ok(Json(page))
}
