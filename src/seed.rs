//! Sample directory used when a fresh install has no data file yet.

use crate::models::*;
use chrono::{DateTime, Duration, Utc, Weekday};
use std::collections::BTreeMap;

pub fn sample_data(now: DateTime<Utc>) -> AppData {
    let today = now.date_naive();

    let businesses = vec![
        business(
            "biz_harbor",
            "harbor-coffee",
            "Harbor Coffee Roasters",
            "Cafe",
            4.7,
            212,
            &["coffee", "breakfast", "wifi"],
            true,
        ),
        business(
            "biz_lantern",
            "lantern-books",
            "Lantern Books",
            "Retail",
            4.5,
            98,
            &["books", "events", "kids"],
            false,
        ),
        business(
            "biz_ember",
            "ember-pizza",
            "Ember Wood-Fired Pizza",
            "Restaurant",
            4.7,
            341,
            &["pizza", "dinner", "family"],
            true,
        ),
    ];

    let coupons = vec![
        Coupon {
            id: "cpn_welcome".into(),
            business_id: "biz_harbor".into(),
            code: "WELCOME10".into(),
            title: "10% off your first order".into(),
            description: "New customers save on any drink.".into(),
            discount: Discount {
                kind: DiscountKind::Percentage,
                value: 10.0,
            },
            constraints: CouponConstraints {
                new_customers_only: true,
                uses_per_customer: Some(1),
                ..Default::default()
            },
            start_date: today - Duration::days(30),
            end_date: today + Duration::days(60),
            is_active: true,
            performance: CouponPerformance {
                views: 1_240,
                clips: 310,
                redemptions: 122,
            },
            created_at: now - Duration::days(30),
        },
        Coupon {
            id: "cpn_pastry".into(),
            business_id: "biz_harbor".into(),
            code: "PASTRY-BOGO".into(),
            title: "Buy one pastry, get one free".into(),
            description: "Weekday mornings only.".into(),
            discount: Discount {
                kind: DiscountKind::Bogo,
                value: 0.0,
            },
            constraints: CouponConstraints {
                max_uses: Some(200),
                valid_days: vec![
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                ],
                ..Default::default()
            },
            start_date: today - Duration::days(10),
            end_date: today + Duration::days(5),
            is_active: true,
            performance: CouponPerformance {
                views: 640,
                clips: 150,
                redemptions: 88,
            },
            created_at: now - Duration::days(10),
        },
        Coupon {
            id: "cpn_summer".into(),
            business_id: "biz_ember".into(),
            code: "SUMMER5".into(),
            title: "$5 off orders over $30".into(),
            description: String::new(),
            discount: Discount {
                kind: DiscountKind::Fixed,
                value: 500.0,
            },
            constraints: CouponConstraints {
                min_purchase: Some(3_000),
                ..Default::default()
            },
            start_date: today - Duration::days(90),
            end_date: today - Duration::days(1),
            is_active: true,
            performance: CouponPerformance {
                views: 2_010,
                clips: 402,
                redemptions: 260,
            },
            created_at: now - Duration::days(90),
        },
        Coupon {
            id: "cpn_story".into(),
            business_id: "biz_lantern".into(),
            code: "STORYTIME".into(),
            title: "Free bookmark with any kids' book".into(),
            description: String::new(),
            discount: Discount {
                kind: DiscountKind::FreeItem,
                value: 0.0,
            },
            constraints: CouponConstraints::default(),
            start_date: today + Duration::days(7),
            end_date: today + Duration::days(37),
            is_active: false,
            performance: CouponPerformance::default(),
            created_at: now - Duration::days(2),
        },
    ];

    let promotions = vec![
        Promotion {
            id: "promo_happy".into(),
            business_id: "biz_ember".into(),
            title: "Happy hour slices".into(),
            description: "Half-price slices 3-5pm.".into(),
            kind: PromotionKind::Sale,
            start_date: now - Duration::days(3),
            end_date: now + Duration::days(25),
            recurrence: Recurrence::Daily,
            targeting: Targeting::default(),
            channels: vec!["email".into(), "social".into()],
            is_active: true,
            performance: PromotionPerformance {
                impressions: 5_400,
                clicks: 610,
                conversions: 140,
            },
            created_at: now - Duration::days(4),
        },
        Promotion {
            id: "promo_author".into(),
            business_id: "biz_lantern".into(),
            title: "Local author signing".into(),
            description: String::new(),
            kind: PromotionKind::Event,
            start_date: now + Duration::days(6),
            end_date: now + Duration::days(6) + Duration::hours(3),
            recurrence: Recurrence::None,
            targeting: Targeting {
                audience: Audience::LoyaltyMembers,
                radius_miles: Some(10.0),
            },
            channels: vec!["email".into()],
            is_active: true,
            performance: PromotionPerformance::default(),
            created_at: now - Duration::days(1),
        },
        Promotion {
            id: "promo_holiday".into(),
            business_id: "biz_harbor".into(),
            title: "Holiday blend preorders".into(),
            description: String::new(),
            kind: PromotionKind::Seasonal,
            start_date: now - Duration::days(60),
            end_date: now - Duration::days(20),
            recurrence: Recurrence::None,
            targeting: Targeting {
                audience: Audience::Tier("Gold".into()),
                radius_miles: None,
            },
            channels: vec!["social".into()],
            is_active: true,
            performance: PromotionPerformance {
                impressions: 8_900,
                clicks: 720,
                conversions: 305,
            },
            created_at: now - Duration::days(61),
        },
    ];

    let loyalty_programs = vec![LoyaltyProgram {
        id: "prog_harbor".into(),
        business_id: "biz_harbor".into(),
        name: "Harbor Regulars".into(),
        points_per_dollar: 10.0,
        tiers: vec![
            tier("Bronze", 0, 1.0, &["Birthday drink"]),
            tier("Silver", 500, 1.25, &["Birthday drink", "Free refills"]),
            tier("Gold", 1_500, 1.5, &["Birthday drink", "Free refills", "Early access"]),
            tier("Platinum", 5_000, 2.0, &["All Gold benefits", "Monthly free bag"]),
        ],
        rewards: vec![
            Reward {
                id: "rw_drink".into(),
                name: "Free drink".into(),
                description: "Any size, any drink.".into(),
                points_cost: 250,
                redemption_limit: None,
                is_active: true,
            },
            Reward {
                id: "rw_bag".into(),
                name: "Bag of beans".into(),
                description: String::new(),
                points_cost: 1_000,
                redemption_limit: Some(2),
                is_active: true,
            },
            Reward {
                id: "rw_mug".into(),
                name: "Harbor mug".into(),
                description: String::new(),
                points_cost: 600,
                redemption_limit: Some(1),
                is_active: false,
            },
        ],
        is_active: true,
    }];

    let loyalty_members = vec![
        member(
            "mem_ava",
            "Ava Thompson",
            "ava@example.com",
            820,
            2_100,
            "Gold",
            now - Duration::days(2),
            now,
        ),
        member(
            "mem_noah",
            "Noah Patel",
            "noah@example.com",
            140,
            640,
            "Silver",
            now - Duration::days(45),
            now,
        ),
        member(
            "mem_mia",
            "Mia Chen",
            "mia@example.com",
            60,
            60,
            "Bronze",
            now - Duration::days(30),
            now,
        ),
    ];

    let profiles = vec![UserProfile {
        id: "user_sam".into(),
        username: "samwanders".into(),
        display_name: "Sam Rivera".into(),
        bio: "Coffee, books, and downtown walks.".into(),
        location: "Downtown".into(),
        join_date: today - Duration::days(400),
        points: 1_350,
        badges: vec![
            Badge {
                id: "badge_explorer".into(),
                name: "Explorer".into(),
                description: "Checked in at 10 businesses.".into(),
                icon: "compass".into(),
                earned_at: Some(now - Duration::days(100)),
            },
            Badge {
                id: "badge_critic".into(),
                name: "Critic".into(),
                description: "Wrote 25 reviews.".into(),
                icon: "pen".into(),
                earned_at: None,
            },
        ],
        achievements: vec![
            Achievement {
                id: "ach_reviews".into(),
                name: "Review 25 places".into(),
                description: String::new(),
                progress: 18,
                target: 25,
                points_reward: 250,
                completed_at: None,
            },
            Achievement {
                id: "ach_checkins".into(),
                name: "Check in 10 times".into(),
                description: String::new(),
                progress: 10,
                target: 10,
                points_reward: 100,
                completed_at: Some(now - Duration::days(100)),
            },
        ],
        following: 42,
        followers: 37,
        saved_businesses: vec!["biz_harbor".into(), "biz_ember".into()],
    }];

    let notifications = vec![
        notification("ntf_1", NotificationKind::Reward, "You earned 50 points", now - Duration::hours(2), false),
        notification("ntf_2", NotificationKind::Deal, "New coupon at Harbor Coffee", now - Duration::days(1), false),
        notification("ntf_3", NotificationKind::Event, "Author signing this week", now - Duration::days(3), true),
    ];

    let news = vec![
        NewsItem {
            id: "news_market".into(),
            title: "Farmers market returns to Main Street".into(),
            summary: "Saturday mornings through October.".into(),
            category: "Community".into(),
            author: "Day.News staff".into(),
            published_at: now - Duration::hours(5),
            business_id: None,
        },
        NewsItem {
            id: "news_ember".into(),
            title: "Ember Pizza adds a second oven".into(),
            summary: String::new(),
            category: "Business".into(),
            author: "Jordan Lee".into(),
            published_at: now - Duration::days(2),
            business_id: Some("biz_ember".into()),
        },
        NewsItem {
            id: "news_parking".into(),
            title: "New parking rules downtown".into(),
            summary: String::new(),
            category: "Community".into(),
            author: "Day.News staff".into(),
            published_at: now - Duration::days(6),
            business_id: None,
        },
    ];

    let events = vec![
        EventItem {
            id: "evt_signing".into(),
            title: "Local author signing".into(),
            description: String::new(),
            category: "Books".into(),
            venue: "Lantern Books".into(),
            starts_at: now + Duration::days(6),
            ends_at: now + Duration::days(6) + Duration::hours(3),
            business_id: Some("biz_lantern".into()),
            price: None,
            featured: true,
        },
        EventItem {
            id: "evt_jazz".into(),
            title: "Jazz on the patio".into(),
            description: String::new(),
            category: "Music".into(),
            venue: "Harbor Coffee Roasters".into(),
            starts_at: now + Duration::days(2),
            ends_at: now + Duration::days(2) + Duration::hours(2),
            business_id: Some("biz_harbor".into()),
            price: Some(1_000),
            featured: false,
        },
        EventItem {
            id: "evt_tasting".into(),
            title: "Pizza tasting night".into(),
            description: String::new(),
            category: "Food".into(),
            venue: "Ember Wood-Fired Pizza".into(),
            starts_at: now - Duration::days(4),
            ends_at: now - Duration::days(4) + Duration::hours(3),
            business_id: Some("biz_ember".into()),
            price: Some(2_500),
            featured: false,
        },
    ];

    let platforms = vec![
        Platform {
            id: "plat_insta".into(),
            name: "Instagram".into(),
            kind: PlatformKind::Social,
            connected: true,
            connected_at: Some(now - Duration::days(120)),
            account_handle: Some("@harborcoffee".into()),
        },
        Platform {
            id: "plat_yelp".into(),
            name: "Yelp".into(),
            kind: PlatformKind::Review,
            connected: false,
            connected_at: None,
            account_handle: None,
        },
        Platform {
            id: "plat_gbp".into(),
            name: "Google Business Profile".into(),
            kind: PlatformKind::Listing,
            connected: false,
            connected_at: None,
            account_handle: None,
        },
    ];

    let content = vec![
        ContentItem {
            id: "post_blend".into(),
            business_id: "biz_harbor".into(),
            title: "New single-origin on bar".into(),
            body: "Ethiopian Guji, bright and floral.".into(),
            platform_ids: vec!["plat_insta".into()],
            status: ContentStatus::Draft,
            scheduled_for: None,
            published_at: None,
        },
        ContentItem {
            id: "post_jazz".into(),
            business_id: "biz_harbor".into(),
            title: "Jazz this weekend".into(),
            body: String::new(),
            platform_ids: vec!["plat_insta".into()],
            status: ContentStatus::Scheduled,
            scheduled_for: Some(now + Duration::days(1)),
            published_at: None,
        },
    ];

    AppData {
        businesses,
        coupons,
        promotions,
        loyalty_programs,
        loyalty_members,
        profiles,
        notifications,
        news,
        events,
        platforms,
        content,
    }
}

#[allow(clippy::too_many_arguments)]
fn business(
    id: &str,
    slug: &str,
    name: &str,
    category: &str,
    rating: f32,
    review_count: u32,
    tags: &[&str],
    featured: bool,
) -> Business {
    Business {
        id: id.into(),
        slug: slug.into(),
        name: name.into(),
        category: category.into(),
        description: format!("{name} in the heart of downtown."),
        address: "100 Main St".into(),
        phone: None,
        website: None,
        rating,
        review_count,
        price_range: "$$".into(),
        hours: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .map(|day| OpeningHours {
                day: (*day).into(),
                open: "08:00".into(),
                close: "18:00".into(),
            })
            .collect(),
        tags: tags.iter().map(|t| (*t).into()).collect(),
        featured,
    }
}

fn tier(name: &str, threshold: i64, multiplier: f64, benefits: &[&str]) -> Tier {
    Tier {
        name: name.into(),
        threshold,
        multiplier,
        benefits: benefits.iter().map(|b| (*b).into()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    name: &str,
    email: &str,
    balance: i64,
    lifetime: i64,
    tier: &str,
    last_active: DateTime<Utc>,
    now: DateTime<Utc>,
) -> LoyaltyMember {
    let spent = lifetime - balance;
    let mut points_history = vec![PointsEntry {
        id: format!("{id}_earn"),
        date: now - Duration::days(180),
        delta: lifetime,
        reason: "Purchases".into(),
        kind: PointsEntryKind::Earned,
    }];
    let mut redemptions = BTreeMap::new();
    if spent > 0 {
        points_history.push(PointsEntry {
            id: format!("{id}_redeem"),
            date: last_active,
            delta: -spent,
            reason: "Free drink".into(),
            kind: PointsEntryKind::Redeemed,
        });
        redemptions.insert("rw_drink".to_string(), 1);
    }
    LoyaltyMember {
        id: id.into(),
        program_id: "prog_harbor".into(),
        name: name.into(),
        email: email.into(),
        points_balance: balance,
        lifetime_points: lifetime,
        tier: tier.into(),
        join_date: (now - Duration::days(200)).date_naive(),
        last_active,
        points_history,
        redemptions,
    }
}

fn notification(
    id: &str,
    kind: NotificationKind,
    title: &str,
    created_at: DateTime<Utc>,
    read: bool,
) -> Notification {
    Notification {
        id: id.into(),
        user_id: "user_sam".into(),
        kind,
        title: title.into(),
        body: String::new(),
        created_at,
        read,
    }
}
