use super::Deleted;
use crate::errors::AppError;
use crate::loyalty::{
    AdjustmentPreview, AdjustmentRequest, JoinRequest, MemberQuery, MemberUpdate, ProgramDraft,
    ProgramStats, TierProgress, apply_adjustment, build_program, earn, join, list_members,
    preview_adjustment, program_stats, redeem_reward, retier_members, tier_progress,
    update_member, validate_program,
};
use crate::models::{AppData, LoyaltyMember, LoyaltyProgram, PointsEntry};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramParams {
    pub business_id: Option<String>,
}

pub async fn programs(
    State(state): State<AppState>,
    Query(params): Query<ProgramParams>,
) -> Json<Vec<LoyaltyProgram>> {
    let data = state.data.lock().await;
    let programs = data
        .loyalty_programs
        .iter()
        .filter(|p| params.business_id.as_ref().is_none_or(|id| &p.business_id == id))
        .cloned()
        .collect();
    Json(programs)
}

pub async fn create_program(
    State(state): State<AppState>,
    Json(draft): Json<ProgramDraft>,
) -> Result<(StatusCode, Json<LoyaltyProgram>), AppError> {
    let program = build_program(draft).map_err(AppError::unprocessable)?;
    let created = state
        .mutate(|data| {
            known_business(data, &program.business_id)?;
            data.loyalty_programs.push(program.clone());
            Ok(program)
        })
        .await?;
    info!(program = %created.id, business = %created.business_id, "program created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces a program's settings and moves members whose tier changed.
pub async fn replace_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(program): Json<LoyaltyProgram>,
) -> Result<Json<LoyaltyProgram>, AppError> {
    validate_program(&program).map_err(AppError::unprocessable)?;
    let (updated, moved) = state
        .mutate(|data| {
            known_business(data, &program.business_id)?;
            let slot = data
                .loyalty_programs
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::not_found(format!("program {id}")))?;
            *slot = LoyaltyProgram {
                id: slot.id.clone(),
                name: program.name.trim().to_string(),
                ..program
            };
            let updated = slot.clone();
            let moved = retier_members(&updated, &mut data.loyalty_members);
            Ok((updated, moved))
        })
        .await?;
    info!(program = %id, moved, "program updated");
    Ok(Json(updated))
}

/// Deleting a program removes its members with it.
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let removed = state
        .mutate(|data| {
            let before = data.loyalty_programs.len();
            data.loyalty_programs.retain(|p| p.id != id);
            if data.loyalty_programs.len() == before {
                return Err(AppError::not_found(format!("program {id}")));
            }
            let members = data.loyalty_members.len();
            data.loyalty_members.retain(|m| m.program_id != id);
            Ok(members - data.loyalty_members.len())
        })
        .await?;
    info!(program = %id, members = removed, "program deleted");
    Ok(Json(Deleted { id, deleted: true }))
}

pub async fn program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LoyaltyProgram>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(find_program(&data, &id)?.clone()))
}

pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgramStats>, AppError> {
    let data = state.data.lock().await;
    let program = find_program(&data, &id)?;
    Ok(Json(program_stats(program, &data.loyalty_members, Utc::now())))
}

pub async fn members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<LoyaltyMember>>, AppError> {
    let data = state.data.lock().await;
    let program = find_program(&data, &id)?;
    Ok(Json(list_members(
        &data.loyalty_members,
        &program.id,
        &query,
        Utc::now(),
    )))
}

pub async fn join_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<JoinRequest>,
) -> Result<(StatusCode, Json<LoyaltyMember>), AppError> {
    let member = state
        .mutate(|data| {
            let program = find_program(data, &id)?;
            if !program.is_active {
                return Err(AppError::unprocessable(format!("program {id} is not accepting members")));
            }
            let member = join(program, &data.loyalty_members, payload, Utc::now())
                .map_err(AppError::unprocessable)?;
            data.loyalty_members.push(member.clone());
            Ok(member)
        })
        .await?;
    info!(member = %member.id, program = %id, "member joined");
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_member_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MemberUpdate>,
) -> Result<Json<LoyaltyMember>, AppError> {
    let member = state
        .mutate(|data| {
            update_member(&mut data.loyalty_members, &id, payload)
                .ok_or_else(|| AppError::not_found(format!("member {id}")))?
                .map_err(AppError::unprocessable)
        })
        .await?;
    Ok(Json(member))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    state
        .mutate(|data| {
            let before = data.loyalty_members.len();
            data.loyalty_members.retain(|m| m.id != id);
            if data.loyalty_members.len() == before {
                return Err(AppError::not_found(format!("member {id}")));
            }
            Ok(())
        })
        .await?;
    info!(member = %id, "member removed");
    Ok(Json(Deleted { id, deleted: true }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub member: LoyaltyMember,
    pub entry: PointsEntry,
    pub tier_progress: TierProgress,
}

pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AdjustmentRequest>,
) -> Result<Json<AdjustmentPreview>, AppError> {
    let data = state.data.lock().await;
    let member = data
        .loyalty_members
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| AppError::not_found(format!("member {id}")))?;
    Ok(Json(preview_adjustment(member, &payload)))
}

pub async fn adjust(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AdjustmentRequest>,
) -> Result<Json<LedgerResponse>, AppError> {
    let response = with_member(&state, &id, |member, program| {
        apply_adjustment(member, program, &payload, Utc::now())
    })
    .await?;
    info!(
        member = %id,
        delta = payload.points_to_adjust,
        reason = %payload.reason,
        "points adjusted"
    );
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnRequest {
    /// Cents.
    pub amount_spent: i64,
}

pub async fn earn_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EarnRequest>,
) -> Result<Json<LedgerResponse>, AppError> {
    let response = with_member(&state, &id, |member, program| {
        earn(member, program, payload.amount_spent, Utc::now())
    })
    .await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRewardRequest {
    pub reward_id: String,
}

pub async fn redeem(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RedeemRewardRequest>,
) -> Result<Json<LedgerResponse>, AppError> {
    let response = with_member(&state, &id, |member, program| {
        redeem_reward(member, program, &payload.reward_id, Utc::now())
    })
    .await?;
    info!(member = %id, reward = %payload.reward_id, "reward redeemed");
    Ok(Json(response))
}

/// Runs one ledger operation against a member and its program, persisting on success.
async fn with_member<F>(state: &AppState, id: &str, op: F) -> Result<LedgerResponse, AppError>
where
    F: FnOnce(&mut LoyaltyMember, &LoyaltyProgram) -> Result<PointsEntry, crate::errors::LedgerError>,
{
    state
        .mutate(|data| {
            let AppData {
                loyalty_programs,
                loyalty_members,
                ..
            } = data;
            let member = loyalty_members
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| AppError::not_found(format!("member {id}")))?;
            let program = loyalty_programs
                .iter()
                .find(|p| p.id == member.program_id)
                .ok_or_else(|| AppError::not_found(format!("program {}", member.program_id)))?;
            let entry = op(member, program)?;
            Ok(LedgerResponse {
                member: member.clone(),
                entry,
                tier_progress: tier_progress(member.lifetime_points, &program.tiers),
            })
        })
        .await
}

fn find_program<'a>(data: &'a AppData, id: &str) -> Result<&'a LoyaltyProgram, AppError> {
    data.loyalty_programs
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::not_found(format!("program {id}")))
}

fn known_business(data: &AppData, business_id: &str) -> Result<(), AppError> {
    if data.businesses.iter().any(|b| b.id == business_id) {
        Ok(())
    } else {
        Err(AppError::not_found(format!("business {business_id}")))
    }
}
