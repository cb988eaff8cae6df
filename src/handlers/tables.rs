use crate::backend::{Backend, Row, load_rows};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TableParams {
    pub select: Option<String>,
    pub limit: Option<usize>,
}

/// Always succeeds; a failed query yields an empty list.
pub async fn rows(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<TableParams>,
) -> Json<Vec<Row>> {
    let data = state.data.lock().await;
    let backend = Backend::new(&data);
    let mut query = backend
        .from(&table)
        .select(params.select.as_deref().unwrap_or("*"));
    if let Some(limit) = params.limit {
        query = query.limit(limit);
    }
    Json(load_rows(&query))
}
