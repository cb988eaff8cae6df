pub mod app;
pub mod backend;
pub mod config;
pub mod coupons;
pub mod directory;
pub mod errors;
pub mod feed;
pub mod handlers;
pub mod loyalty;
pub mod models;
pub mod platforms;
pub mod profile;
pub mod promotions;
pub mod seed;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
