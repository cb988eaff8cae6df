pub mod businesses;
pub mod content;
pub mod coupons;
pub mod feed;
pub mod loyalty;
pub mod pages;
pub mod profiles;
pub mod promotions;
pub mod tables;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}
