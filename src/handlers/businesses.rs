use crate::directory::{BusinessQuery, find_business, list_businesses};
use crate::errors::AppError;
use crate::models::Business;
use crate::state::AppState;
use crate::stats::{Dashboard, build_dashboard_at};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BusinessQuery>,
) -> Json<Vec<Business>> {
    let data = state.data.lock().await;
    Json(list_businesses(&data.businesses, &query))
}

pub async fn get(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Business>, AppError> {
    let data = state.data.lock().await;
    find_business(&data.businesses, &key)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("business {key}")))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Dashboard>, AppError> {
    let data = state.data.lock().await;
    let business = find_business(&data.businesses, &key)
        .ok_or_else(|| AppError::not_found(format!("business {key}")))?;
    Ok(Json(build_dashboard_at(&data, &business.id, Utc::now())))
}
