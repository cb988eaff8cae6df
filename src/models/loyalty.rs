use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A points-threshold bucket. `threshold` is compared against lifetime points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub name: String,
    pub threshold: i64,
    pub multiplier: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub points_cost: i64,
    /// Per member. `None` is unlimited.
    #[serde(default)]
    pub redemption_limit: Option<u32>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProgram {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub points_per_dollar: f64,
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PointsEntryKind {
    Earned,
    Redeemed,
    Adjusted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointsEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub delta: i64,
    pub reason: String,
    pub kind: PointsEntryKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyMember {
    pub id: String,
    pub program_id: String,
    pub name: String,
    pub email: String,
    pub points_balance: i64,
    pub lifetime_points: i64,
    pub tier: String,
    pub join_date: NaiveDate,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub points_history: Vec<PointsEntry>,
    #[serde(default)]
    pub redemptions: BTreeMap<String, u32>,
}
