use super::Deleted;
use crate::coupons::{
    CouponDraft, CouponQuery, CouponRates, CouponStatus, FieldError, Redemption, create_coupon,
    list_coupons, rates, redeem, revise_coupon, status_on, toggle_active, validate_step,
};
use crate::errors::AppError;
use crate::models::{AppData, Coupon};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponListItem {
    #[serde(flatten)]
    pub coupon: Coupon,
    pub status: CouponStatus,
    pub rates: CouponRates,
}

/// A draft that failed validation (422 with the per-field errors), or a
/// request that failed before validation.
#[derive(Debug)]
pub enum DraftRejected {
    Fields(Vec<FieldError>),
    Request(AppError),
}

impl IntoResponse for DraftRejected {
    fn into_response(self) -> Response {
        match self {
            Self::Fields(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response(),
            Self::Request(err) => err.into_response(),
        }
    }
}

impl From<AppError> for DraftRejected {
    fn from(err: AppError) -> Self {
        Self::Request(err)
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CouponQuery>,
) -> Json<Vec<CouponListItem>> {
    let today = Utc::now().date_naive();
    let data = state.data.lock().await;
    let items = list_coupons(&data.coupons, &query, today)
        .into_iter()
        .map(|coupon| CouponListItem {
            status: status_on(&coupon, today),
            rates: rates(&coupon.performance),
            coupon,
        })
        .collect();
    Json(items)
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub step: u8,
    pub draft: CouponDraft,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub step: u8,
    pub can_advance: bool,
    pub errors: Vec<FieldError>,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(payload): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let data = state.data.lock().await;
    let errors = validate_step(&payload.draft, payload.step, &data.coupons);
    Json(ValidateResponse {
        step: payload.step,
        can_advance: errors.is_empty(),
        errors,
    })
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<CouponDraft>,
) -> Result<(StatusCode, Json<Coupon>), DraftRejected> {
    let coupon = state
        .mutate_with(|data| -> Result<Coupon, DraftRejected> {
            known_business(data, &draft.business_id)?;
            let coupon = create_coupon(draft, &data.coupons, Utc::now())
                .map_err(DraftRejected::Fields)?;
            data.coupons.push(coupon.clone());
            Ok(coupon)
        })
        .await?;
    info!(coupon = %coupon.id, code = %coupon.code, "coupon created");
    Ok((StatusCode::CREATED, Json(coupon)))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(coupon): Json<Coupon>,
) -> Result<Json<Coupon>, DraftRejected> {
    let updated = state
        .mutate_with(|data| -> Result<Coupon, DraftRejected> {
            known_business(data, &coupon.business_id)?;
            revise_coupon(&mut data.coupons, &id, coupon)
                .ok_or_else(|| AppError::not_found(format!("coupon {id}")))?
                .map_err(DraftRejected::Fields)
        })
        .await?;
    info!(coupon = %updated.id, code = %updated.code, "coupon updated");
    Ok(Json(updated))
}

fn known_business(data: &AppData, business_id: &str) -> Result<(), DraftRejected> {
    if data.businesses.iter().any(|b| b.id == business_id) {
        return Ok(());
    }
    Err(DraftRejected::Fields(vec![FieldError {
        field: "businessId",
        message: format!("unknown business {business_id}"),
    }]))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    state
        .mutate(|data| {
            let before = data.coupons.len();
            data.coupons.retain(|c| c.id != id);
            if data.coupons.len() == before {
                return Err(AppError::not_found(format!("coupon {id}")));
            }
            Ok(())
        })
        .await?;
    info!(coupon = %id, "coupon deleted");
    Ok(Json(Deleted { id, deleted: true }))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Coupon>, AppError> {
    let coupon = state
        .mutate(|data| {
            toggle_active(&mut data.coupons, &id)
                .ok_or_else(|| AppError::not_found(format!("coupon {id}")))
        })
        .await?;
    Ok(Json(coupon))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    /// Cents.
    pub purchase_amount: i64,
}

pub async fn redeem_coupon(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RedeemRequest>,
) -> Result<Json<Redemption>, AppError> {
    if payload.purchase_amount < 0 {
        return Err(AppError::bad_request("purchaseAmount cannot be negative"));
    }
    let redemption = state
        .mutate(|data| {
            let coupon = data
                .coupons
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::not_found(format!("coupon {id}")))?;
            Ok(redeem(coupon, payload.purchase_amount, Utc::now())?)
        })
        .await?;
    info!(coupon = %id, discount = redemption.discount_amount, "coupon redeemed");
    Ok(Json(redemption))
}
