//! Coupon list pipeline, creation wizard and redemption.

use crate::errors::CouponError;
use crate::models::{
    Coupon, CouponConstraints, CouponPerformance, Discount, DiscountKind, new_id,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const WIZARD_STEPS: u8 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CouponStatus {
    Active,
    Inactive,
    Scheduled,
    Expired,
}

pub fn status_on(coupon: &Coupon, today: NaiveDate) -> CouponStatus {
    if today > coupon.end_date {
        CouponStatus::Expired
    } else if today < coupon.start_date {
        CouponStatus::Scheduled
    } else if coupon.is_active {
        CouponStatus::Active
    } else {
        CouponStatus::Inactive
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CouponSort {
    #[default]
    Newest,
    Expiring,
    Popular,
    Code,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponQuery {
    /// `None` means all.
    pub status: Option<CouponStatus>,
    pub q: Option<String>,
    pub business_id: Option<String>,
    #[serde(default)]
    pub sort: CouponSort,
}

pub fn list_coupons(coupons: &[Coupon], query: &CouponQuery, today: NaiveDate) -> Vec<Coupon> {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut out: Vec<Coupon> = coupons
        .iter()
        .filter(|c| query.business_id.as_ref().is_none_or(|id| &c.business_id == id))
        .filter(|c| query.status.is_none_or(|s| status_on(c, today) == s))
        .filter(|c| match &needle {
            Some(needle) => {
                c.code.to_lowercase().contains(needle) || c.title.to_lowercase().contains(needle)
            }
            None => true,
        })
        .cloned()
        .collect();

    match query.sort {
        CouponSort::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        CouponSort::Expiring => out.sort_by(|a, b| a.end_date.cmp(&b.end_date)),
        CouponSort::Popular => {
            out.sort_by(|a, b| b.performance.redemptions.cmp(&a.performance.redemptions))
        }
        CouponSort::Code => out.sort_by(|a, b| a.code.to_lowercase().cmp(&b.code.to_lowercase())),
    }
    out
}

/// Flips `isActive` on the matching coupon only. Returns the updated coupon.
pub fn toggle_active(coupons: &mut [Coupon], id: &str) -> Option<Coupon> {
    let coupon = coupons.iter_mut().find(|c| c.id == id)?;
    coupon.is_active = !coupon.is_active;
    Some(coupon.clone())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponDraft {
    #[serde(default)]
    pub business_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount: Option<Discount>,
    #[serde(default)]
    pub constraints: CouponConstraints,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors for one wizard step. `existing` is checked for code collisions.
///
/// Step 1 is the basics, 2 the discount, 3 constraints and schedule, 4 the
/// review which re-checks everything before it.
pub fn validate_step(draft: &CouponDraft, step: u8, existing: &[Coupon]) -> Vec<FieldError> {
    match step {
        1 => validate_basics(draft, existing),
        2 => validate_discount(draft),
        3 => validate_schedule(draft),
        4 => (1..WIZARD_STEPS)
            .flat_map(|s| validate_step(draft, s, existing))
            .collect(),
        other => vec![FieldError::new(
            "step",
            format!("step must be between 1 and {WIZARD_STEPS}, got {other}"),
        )],
    }
}

pub fn can_advance(draft: &CouponDraft, step: u8, existing: &[Coupon]) -> bool {
    validate_step(draft, step, existing).is_empty()
}

fn validate_basics(draft: &CouponDraft, existing: &[Coupon]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.business_id.trim().is_empty() {
        errors.push(FieldError::new("businessId", "business is required"));
    }
    if draft.title.trim().is_empty() {
        errors.push(FieldError::new("title", "title is required"));
    }
    let code = draft.code.trim();
    if !(3..=20).contains(&code.len()) {
        errors.push(FieldError::new("code", "code must be 3 to 20 characters"));
    } else if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        errors.push(FieldError::new(
            "code",
            "code may only contain letters, digits and dashes",
        ));
    } else if existing
        .iter()
        .any(|c| c.business_id == draft.business_id && c.code.eq_ignore_ascii_case(code))
    {
        errors.push(FieldError::new("code", format!("code {code} is already in use")));
    }
    errors
}

fn validate_discount(draft: &CouponDraft) -> Vec<FieldError> {
    let Some(discount) = &draft.discount else {
        return vec![FieldError::new("discount", "discount is required")];
    };
    match discount.kind {
        DiscountKind::Percentage if !(discount.value > 0.0 && discount.value <= 100.0) => {
            vec![FieldError::new(
                "discount.value",
                "percentage must be greater than 0 and at most 100",
            )]
        }
        DiscountKind::Fixed if discount.value <= 0.0 => {
            vec![FieldError::new("discount.value", "amount must be positive")]
        }
        _ => Vec::new(),
    }
}

fn validate_schedule(draft: &CouponDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) if end < start => {
            errors.push(FieldError::new("endDate", "end date must not precede start date"));
        }
        (None, _) => errors.push(FieldError::new("startDate", "start date is required")),
        (_, None) => errors.push(FieldError::new("endDate", "end date is required")),
        _ => {}
    }
    if draft.constraints.max_uses == Some(0) {
        errors.push(FieldError::new("constraints.maxUses", "max uses must be positive"));
    }
    if draft.constraints.uses_per_customer == Some(0) {
        errors.push(FieldError::new(
            "constraints.usesPerCustomer",
            "uses per customer must be positive",
        ));
    }
    if draft.constraints.min_purchase.is_some_and(|m| m < 0) {
        errors.push(FieldError::new(
            "constraints.minPurchase",
            "minimum purchase cannot be negative",
        ));
    }
    errors
}

/// Builds a coupon from a draft that passes the review step.
pub fn create_coupon(
    draft: CouponDraft,
    existing: &[Coupon],
    now: DateTime<Utc>,
) -> Result<Coupon, Vec<FieldError>> {
    let errors = validate_step(&draft, WIZARD_STEPS, existing);
    let (Some(discount), Some(start_date), Some(end_date)) =
        (draft.discount, draft.start_date, draft.end_date)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Coupon {
        id: new_id("cpn"),
        business_id: draft.business_id,
        code: draft.code.trim().to_uppercase(),
        title: draft.title.trim().to_string(),
        description: draft.description,
        discount,
        constraints: draft.constraints,
        start_date,
        end_date,
        is_active: draft.is_active,
        performance: CouponPerformance::default(),
        created_at: now,
    })
}

/// Applies an edit to stored coupon `id` under the review-step rules, with
/// the coupon itself excluded from the code clash check. Id, performance and
/// creation time stay with the stored coupon. `None` when no coupon has `id`.
pub fn revise_coupon(
    coupons: &mut [Coupon],
    id: &str,
    incoming: Coupon,
) -> Option<Result<Coupon, Vec<FieldError>>> {
    let others: Vec<Coupon> = coupons.iter().filter(|c| c.id != id).cloned().collect();
    let slot = coupons.iter_mut().find(|c| c.id == id)?;

    let draft = CouponDraft {
        business_id: incoming.business_id.clone(),
        code: incoming.code.clone(),
        title: incoming.title.clone(),
        description: String::new(),
        discount: Some(incoming.discount.clone()),
        constraints: incoming.constraints.clone(),
        start_date: Some(incoming.start_date),
        end_date: Some(incoming.end_date),
        is_active: incoming.is_active,
    };
    let errors = validate_step(&draft, WIZARD_STEPS, &others);
    if !errors.is_empty() {
        return Some(Err(errors));
    }

    *slot = Coupon {
        id: slot.id.clone(),
        code: incoming.code.trim().to_uppercase(),
        title: incoming.title.trim().to_string(),
        performance: slot.performance.clone(),
        created_at: slot.created_at,
        ..incoming
    };
    Some(Ok(slot.clone()))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub coupon_id: String,
    pub code: String,
    pub kind: DiscountKind,
    /// Cents taken off the purchase. Zero for item-based discounts.
    pub discount_amount: i64,
    pub total_after_discount: i64,
    pub redemptions: u64,
}

/// Checks the coupon can be used for a purchase of `amount` cents at `now`
/// and counts the redemption.
pub fn redeem(coupon: &mut Coupon, amount: i64, now: DateTime<Utc>) -> Result<Redemption, CouponError> {
    let today = now.date_naive();
    if !coupon.is_active {
        return Err(CouponError::Inactive);
    }
    if today < coupon.start_date {
        return Err(CouponError::NotStarted(coupon.start_date));
    }
    if today > coupon.end_date {
        return Err(CouponError::Expired(coupon.end_date));
    }
    let constraints = &coupon.constraints;
    if !constraints.valid_days.is_empty() && !constraints.valid_days.contains(&today.weekday()) {
        return Err(CouponError::WrongDay);
    }
    if let Some(max) = constraints.max_uses
        && coupon.performance.redemptions >= u64::from(max)
    {
        return Err(CouponError::Exhausted(max));
    }
    if let Some(minimum) = constraints.min_purchase
        && amount < minimum
    {
        return Err(CouponError::BelowMinimum { minimum });
    }

    let discount_amount = discount_amount(&coupon.discount, amount);
    coupon.performance.redemptions += 1;

    Ok(Redemption {
        coupon_id: coupon.id.clone(),
        code: coupon.code.clone(),
        kind: coupon.discount.kind,
        discount_amount,
        total_after_discount: amount - discount_amount,
        redemptions: coupon.performance.redemptions,
    })
}

pub fn discount_amount(discount: &Discount, amount: i64) -> i64 {
    let amount = amount.max(0);
    match discount.kind {
        DiscountKind::Percentage => {
            ((amount as f64) * discount.value.clamp(0.0, 100.0) / 100.0).round() as i64
        }
        DiscountKind::Fixed => (discount.value.round() as i64).clamp(0, amount),
        DiscountKind::Bogo | DiscountKind::FreeItem => 0,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponRates {
    pub clip_rate: f64,
    pub redemption_rate: f64,
}

pub fn rates(performance: &CouponPerformance) -> CouponRates {
    CouponRates {
        clip_rate: ratio(performance.clips, performance.views),
        redemption_rate: ratio(performance.redemptions, performance.clips),
    }
}

fn ratio(n: u64, d: u64) -> f64 {
    if d == 0 { 0.0 } else { n as f64 / d as f64 }
}
