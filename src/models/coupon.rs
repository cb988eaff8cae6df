use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
    Bogo,
    FreeItem,
}

/// `value` is a percentage for `Percentage` and cents for `Fixed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub kind: DiscountKind,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CouponConstraints {
    /// Cents.
    pub min_purchase: Option<i64>,
    pub max_uses: Option<u32>,
    pub uses_per_customer: Option<u32>,
    pub new_customers_only: bool,
    /// Empty means every day.
    pub valid_days: Vec<Weekday>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CouponPerformance {
    pub views: u64,
    pub clips: u64,
    pub redemptions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub business_id: String,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount: Discount,
    #[serde(default)]
    pub constraints: CouponConstraints,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    #[serde(default)]
    pub performance: CouponPerformance,
    pub created_at: DateTime<Utc>,
}
