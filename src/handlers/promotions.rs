use super::Deleted;
use crate::errors::AppError;
use crate::models::{Promotion, PromotionKind, PromotionPerformance, Recurrence, Targeting, new_id};
use crate::promotions::{PromotionQuery, PromotionView, list_promotions, toggle_active, validate, view};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PromotionQuery>,
) -> Json<Vec<PromotionView>> {
    let now = Utc::now();
    let data = state.data.lock().await;
    let views = list_promotions(&data.promotions, &query, now)
        .into_iter()
        .map(|p| view(p, now))
        .collect();
    Json(views)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromotion {
    pub business_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: PromotionKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub targeting: Targeting,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewPromotion>,
) -> Result<(StatusCode, Json<PromotionView>), AppError> {
    let now = Utc::now();
    let promotion = Promotion {
        id: new_id("promo"),
        business_id: payload.business_id,
        title: payload.title.trim().to_string(),
        description: payload.description,
        kind: payload.kind,
        start_date: payload.start_date,
        end_date: payload.end_date,
        recurrence: payload.recurrence,
        targeting: payload.targeting,
        channels: payload.channels,
        is_active: payload.is_active.unwrap_or(true),
        performance: PromotionPerformance::default(),
        created_at: now,
    };
    validate(&promotion).map_err(AppError::unprocessable)?;

    let created = state
        .mutate(|data| {
            if !data.businesses.iter().any(|b| b.id == promotion.business_id) {
                return Err(AppError::not_found(format!("business {}", promotion.business_id)));
            }
            data.promotions.push(promotion.clone());
            Ok(promotion)
        })
        .await?;
    info!(promotion = %created.id, "promotion created");
    Ok((StatusCode::CREATED, Json(view(created, now))))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(promotion): Json<Promotion>,
) -> Result<Json<PromotionView>, AppError> {
    validate(&promotion).map_err(AppError::unprocessable)?;
    let updated = state
        .mutate(|data| {
            if !data.businesses.iter().any(|b| b.id == promotion.business_id) {
                return Err(AppError::not_found(format!("business {}", promotion.business_id)));
            }
            let slot = data
                .promotions
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::not_found(format!("promotion {id}")))?;
            *slot = Promotion {
                id: slot.id.clone(),
                title: promotion.title.trim().to_string(),
                performance: slot.performance.clone(),
                created_at: slot.created_at,
                ..promotion
            };
            Ok(slot.clone())
        })
        .await?;
    info!(promotion = %updated.id, "promotion updated");
    Ok(Json(view(updated, Utc::now())))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    state
        .mutate(|data| {
            let before = data.promotions.len();
            data.promotions.retain(|p| p.id != id);
            if data.promotions.len() == before {
                return Err(AppError::not_found(format!("promotion {id}")));
            }
            Ok(())
        })
        .await?;
    Ok(Json(Deleted { id, deleted: true }))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PromotionView>, AppError> {
    let promotion = state
        .mutate(|data| {
            toggle_active(&mut data.promotions, &id)
                .ok_or_else(|| AppError::not_found(format!("promotion {id}")))
        })
        .await?;
    Ok(Json(view(promotion, Utc::now())))
}
