use crate::feed::{EventQuery, NewsQuery, event_feed, news_feed};
use crate::models::{EventItem, NewsItem};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

pub async fn news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Json<Vec<NewsItem>> {
    let data = state.data.lock().await;
    Json(news_feed(&data.news, &query))
}

pub async fn events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Json<Vec<EventItem>> {
    let data = state.data.lock().await;
    Json(event_feed(&data.events, &query, Utc::now()))
}
