use crate::errors::AppError;
use crate::models::{AppData, Notification};
use crate::profile::{
    AchievementUpdate, NotificationFilter, ProfileTab, ProfileView, is_profile,
    list_notifications, mark_all_read, mark_read, record_progress, unread_count, view,
};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub tab: Option<String>,
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<ProfileView>, AppError> {
    let data = state.data.lock().await;
    let profile = data
        .profiles
        .iter()
        .find(|p| is_profile(p, &id))
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("profile {id}")))?;
    let tab = params
        .tab
        .as_deref()
        .and_then(|t| t.parse::<ProfileTab>().ok())
        .unwrap_or_default();
    Ok(Json(view(profile, tab, &data.notifications)))
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    #[serde(default = "one")]
    pub increment: u32,
}

fn one() -> u32 {
    1
}

pub async fn progress(
    State(state): State<AppState>,
    Path((id, achievement_id)): Path<(String, String)>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<AchievementUpdate>, AppError> {
    let update = state
        .mutate(|data| {
            let profile = data
                .profiles
                .iter_mut()
                .find(|p| is_profile(p, &id))
                .ok_or_else(|| AppError::not_found(format!("profile {id}")))?;
            record_progress(profile, &achievement_id, payload.increment, Utc::now())
                .ok_or_else(|| AppError::not_found(format!("achievement {achievement_id}")))
        })
        .await?;
    Ok(Json(update))
}

#[derive(Debug, Deserialize)]
pub struct NotificationParams {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub unread: usize,
    pub items: Vec<Notification>,
}

pub async fn notifications(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<NotificationParams>,
) -> Result<Json<NotificationList>, AppError> {
    let filter = params
        .filter
        .as_deref()
        .map(str::parse::<NotificationFilter>)
        .transpose()
        .map_err(AppError::bad_request)?
        .unwrap_or_default();
    let data = state.data.lock().await;
    let user_id = profile_id(&data, &id)?;
    Ok(Json(NotificationList {
        unread: unread_count(&data.notifications, &user_id),
        items: list_notifications(&data.notifications, &user_id, filter),
    }))
}

pub async fn read_one(
    State(state): State<AppState>,
    Path((id, notification_id)): Path<(String, String)>,
) -> Result<Json<Notification>, AppError> {
    let notification = state
        .mutate(|data| {
            let user_id = profile_id(data, &id)?;
            mark_read(&mut data.notifications, &user_id, &notification_id)
                .ok_or_else(|| AppError::not_found(format!("notification {notification_id}")))
        })
        .await?;
    Ok(Json(notification))
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: usize,
}

pub async fn read_all(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarkedRead>, AppError> {
    let updated = state
        .mutate(|data| {
            let user_id = profile_id(data, &id)?;
            Ok(mark_all_read(&mut data.notifications, &user_id))
        })
        .await?;
    Ok(Json(MarkedRead { updated }))
}

fn profile_id(data: &AppData, key: &str) -> Result<String, AppError> {
    data.profiles
        .iter()
        .find(|p| is_profile(p, key))
        .map(|p| p.id.clone())
        .ok_or_else(|| AppError::not_found(format!("profile {key}")))
}
