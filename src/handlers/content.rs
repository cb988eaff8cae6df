use crate::errors::AppError;
use crate::models::{ContentItem, ContentStatus, Platform};
use crate::platforms::{connect, disconnect, list_content, publish_due, schedule};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub async fn platforms(State(state): State<AppState>) -> Json<Vec<Platform>> {
    let data = state.data.lock().await;
    Json(data.platforms.clone())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    #[serde(default)]
    pub account_handle: String,
}

pub async fn connect_platform(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<Platform>, AppError> {
    let platform = state
        .mutate(|data| {
            let platform = find_platform(&mut data.platforms, &id)?;
            connect(platform, &payload.account_handle, Utc::now())?;
            Ok(platform.clone())
        })
        .await?;
    info!(platform = %platform.name, "platform connected");
    Ok(Json(platform))
}

pub async fn disconnect_platform(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Platform>, AppError> {
    let platform = state
        .mutate(|data| {
            let platform = find_platform(&mut data.platforms, &id)?;
            disconnect(platform);
            Ok(platform.clone())
        })
        .await?;
    info!(platform = %platform.name, "platform disconnected");
    Ok(Json(platform))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentParams {
    pub business_id: Option<String>,
    pub status: Option<ContentStatus>,
}

pub async fn content(
    State(state): State<AppState>,
    Query(params): Query<ContentParams>,
) -> Json<Vec<ContentItem>> {
    let data = state.data.lock().await;
    Json(list_content(
        &data.content,
        params.business_id.as_deref(),
        params.status,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub scheduled_for: DateTime<Utc>,
}

pub async fn schedule_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<ContentItem>, AppError> {
    let item = state
        .mutate(|data| {
            let item = data
                .content
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::not_found(format!("content {id}")))?;
            schedule(item, &data.platforms, payload.scheduled_for, Utc::now())?;
            Ok(item.clone())
        })
        .await?;
    Ok(Json(item))
}

#[derive(Debug, Serialize)]
pub struct Published {
    pub published: Vec<String>,
}

pub async fn publish(State(state): State<AppState>) -> Result<Json<Published>, AppError> {
    let published = state
        .mutate(|data| Ok(publish_due(&mut data.content, Utc::now())))
        .await?;
    Ok(Json(Published { published }))
}

fn find_platform<'a>(platforms: &'a mut [Platform], id: &str) -> Result<&'a mut Platform, AppError> {
    platforms
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::not_found(format!("platform {id}")))
}
