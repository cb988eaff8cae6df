use crate::directory::{BusinessQuery, find_business, list_businesses};
use crate::state::AppState;
use crate::ui::{render_brand, render_index, render_not_found};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use chrono::Utc;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let businesses = list_businesses(&data.businesses, &BusinessQuery::default());
    Html(render_index(&businesses))
}

pub async fn brand(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> (StatusCode, Html<String>) {
    let data = state.data.lock().await;
    match find_business(&data.businesses, &slug) {
        Some(business) => (
            StatusCode::OK,
            Html(render_brand(business, &data.coupons, Utc::now().date_naive())),
        ),
        None => (StatusCode::NOT_FOUND, Html(render_not_found(&slug))),
    }
}
