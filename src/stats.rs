use crate::coupons::{CouponStatus, status_on};
use crate::loyalty::is_active;
use crate::models::{AppData, PointsEntryKind};
use crate::promotions::{PromotionStatus, status_at};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const WEEK_COUNT: usize = 8;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRedemptions {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub redemptions: u64,
    pub points_redeemed: i64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub business_id: String,
    pub total_coupons: usize,
    pub active_coupons: usize,
    pub coupon_redemptions: u64,
    pub promotions_by_status: BTreeMap<String, usize>,
    pub loyalty_members: usize,
    pub active_loyalty_members: usize,
    pub outstanding_points: i64,
    pub weekly_redemptions: Vec<WeeklyRedemptions>,
}

pub fn build_dashboard_at(data: &AppData, business_id: &str, now: DateTime<Utc>) -> Dashboard {
    let today = now.date_naive();

    let coupons: Vec<_> = data
        .coupons
        .iter()
        .filter(|c| c.business_id == business_id)
        .collect();

    let mut promotions_by_status: BTreeMap<String, usize> = BTreeMap::new();
    for promotion in data.promotions.iter().filter(|p| p.business_id == business_id) {
        let key = match status_at(promotion, now) {
            PromotionStatus::Scheduled => "scheduled",
            PromotionStatus::Active => "active",
            PromotionStatus::Paused => "paused",
            PromotionStatus::Expired => "expired",
        };
        *promotions_by_status.entry(key.to_string()).or_default() += 1;
    }

    let program_ids: Vec<&str> = data
        .loyalty_programs
        .iter()
        .filter(|p| p.business_id == business_id)
        .map(|p| p.id.as_str())
        .collect();
    let members: Vec<_> = data
        .loyalty_members
        .iter()
        .filter(|m| program_ids.contains(&m.program_id.as_str()))
        .collect();

    // Redemptions per day across every member of this business.
    let mut per_day: BTreeMap<NaiveDate, (u64, i64)> = BTreeMap::new();
    for entry in members
        .iter()
        .flat_map(|m| &m.points_history)
        .filter(|e| e.kind == PointsEntryKind::Redeemed)
    {
        let slot = per_day.entry(entry.date.date_naive()).or_default();
        slot.0 += 1;
        slot.1 += -entry.delta;
    }

    let current_week_start = week_start(today);
    let mut weekly_redemptions = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);
        let (redemptions, points_redeemed) = per_day
            .range(start..=end)
            .fold((0u64, 0i64), |(n, p), (_, (dn, dp))| (n + dn, p + dp));
        weekly_redemptions.push(WeeklyRedemptions {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            redemptions,
            points_redeemed,
        });
    }

    Dashboard {
        business_id: business_id.to_string(),
        total_coupons: coupons.len(),
        active_coupons: coupons
            .iter()
            .filter(|c| status_on(c, today) == CouponStatus::Active)
            .count(),
        coupon_redemptions: coupons.iter().map(|c| c.performance.redemptions).sum(),
        promotions_by_status,
        loyalty_members: members.len(),
        active_loyalty_members: members.iter().filter(|m| is_active(m, now)).count(),
        outstanding_points: members.iter().map(|m| m.points_balance).sum(),
        weekly_redemptions,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
