use super::ApiError;
use crate::app_state::models::AppState;
use crate::error::ServiceError;
use crate::models::page::DataEnvelope;
use crate::models::setting_record::SettingsFilter;
use axum::Json;
use axum::extract::{Extension, Query, rejection::QueryRejection};
use std::sync::Arc;
use tracing::debug;

/// `GET /settings`: seed records filtered by exact match on any supplied field.
pub async fn settings(
    Extension(app_state): Extension<Arc<AppState>>,
    filter: Result<Query<SettingsFilter>, QueryRejection>,
) -> Result<Json<DataEnvelope>, ApiError> {
    let Query(filter) =
        filter.map_err(|e| ServiceError::invalid_parameter("query", e.body_text()))?;

    let data = app_state.sample_store.filter(&filter);
    debug!("Settings filter {:?} matched {} record(s)", filter, data.len());

    Ok(Json(DataEnvelope { data }))
}

/// `GET /dummy`: the cached seed collection, unpaginated.
///
/// Served from the typed records, not the raw file: unknown seed fields are
/// not echoed and integer values are rendered as floats.
pub async fn dummy(Extension(app_state): Extension<Arc<AppState>>) -> Json<DataEnvelope> {
    Json(DataEnvelope {
        data: app_state.sample_store.all().as_ref().clone(),
    })
}
