use crate::handlers::{
    businesses, content, coupons, feed, loyalty, pages, profiles, promotions, tables,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/brands/:slug", get(pages::brand))
        .route("/api/tables/:table", get(tables::rows))
        .route("/api/businesses", get(businesses::list))
        .route("/api/businesses/:id", get(businesses::get))
        .route("/api/businesses/:id/dashboard", get(businesses::dashboard))
        .route("/api/coupons", get(coupons::list).post(coupons::create))
        .route("/api/coupons/validate", post(coupons::validate))
        .route(
            "/api/coupons/:id",
            axum::routing::put(coupons::replace).delete(coupons::delete),
        )
        .route("/api/coupons/:id/toggle", post(coupons::toggle))
        .route("/api/coupons/:id/redeem", post(coupons::redeem_coupon))
        .route(
            "/api/promotions",
            get(promotions::list).post(promotions::create),
        )
        .route(
            "/api/promotions/:id",
            axum::routing::put(promotions::replace).delete(promotions::delete),
        )
        .route("/api/promotions/:id/toggle", post(promotions::toggle))
        .route(
            "/api/loyalty/programs",
            get(loyalty::programs).post(loyalty::create_program),
        )
        .route(
            "/api/loyalty/programs/:id",
            get(loyalty::program)
                .put(loyalty::replace_program)
                .delete(loyalty::delete_program),
        )
        .route("/api/loyalty/programs/:id/stats", get(loyalty::stats))
        .route(
            "/api/loyalty/programs/:id/members",
            get(loyalty::members).post(loyalty::join_program),
        )
        .route(
            "/api/loyalty/members/:id",
            axum::routing::put(loyalty::update_member_details).delete(loyalty::delete_member),
        )
        .route(
            "/api/loyalty/members/:id/adjust/preview",
            post(loyalty::preview),
        )
        .route("/api/loyalty/members/:id/adjust", post(loyalty::adjust))
        .route("/api/loyalty/members/:id/earn", post(loyalty::earn_points))
        .route("/api/loyalty/members/:id/redeem", post(loyalty::redeem))
        .route("/api/profiles/:id", get(profiles::get))
        .route(
            "/api/profiles/:id/achievements/:achievement_id/progress",
            post(profiles::progress),
        )
        .route("/api/profiles/:id/notifications", get(profiles::notifications))
        .route(
            "/api/profiles/:id/notifications/read-all",
            post(profiles::read_all),
        )
        .route(
            "/api/profiles/:id/notifications/:notification_id/read",
            post(profiles::read_one),
        )
        .route("/api/feed/news", get(feed::news))
        .route("/api/feed/events", get(feed::events))
        .route("/api/platforms", get(content::platforms))
        .route("/api/platforms/:id/connect", post(content::connect_platform))
        .route(
            "/api/platforms/:id/disconnect",
            post(content::disconnect_platform),
        )
        .route("/api/content", get(content::content))
        .route("/api/content/publish-due", post(content::publish))
        .route("/api/content/:id/schedule", post(content::schedule_content))
        .with_state(state)
}
