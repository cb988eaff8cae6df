pub mod business;
pub mod content;
pub mod coupon;
pub mod feed;
pub mod loyalty;
pub mod profile;
pub mod promotion;

pub use business::{Business, OpeningHours};
pub use content::{ContentItem, ContentStatus, Platform, PlatformKind};
pub use coupon::{Coupon, CouponConstraints, CouponPerformance, Discount, DiscountKind};
pub use feed::{EventItem, NewsItem};
pub use loyalty::{
    LoyaltyMember, LoyaltyProgram, PointsEntry, PointsEntryKind, Reward, Tier,
};
pub use profile::{Achievement, Badge, Notification, NotificationKind, UserProfile};
pub use promotion::{
    Audience, Promotion, PromotionKind, PromotionPerformance, Recurrence, Targeting,
};

use serde::{Deserialize, Serialize};

/// The whole persisted document, one list per table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppData {
    pub businesses: Vec<Business>,
    pub coupons: Vec<Coupon>,
    pub promotions: Vec<Promotion>,
    pub loyalty_programs: Vec<LoyaltyProgram>,
    pub loyalty_members: Vec<LoyaltyMember>,
    pub profiles: Vec<UserProfile>,
    pub notifications: Vec<Notification>,
    pub news: Vec<NewsItem>,
    pub events: Vec<EventItem>,
    pub platforms: Vec<Platform>,
    pub content: Vec<ContentItem>,
}

pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}
