use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{what} not found"),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failures reported by the table client in the `error` half of a query result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("relation \"{0}\" does not exist")]
    UnknownTable(String),

    #[error("column \"{column}\" does not exist on \"{table}\"")]
    UnknownColumn { table: String, column: String },

    #[error("failed to encode row: {0}")]
    Encode(String),
}

/// Rejections from the loyalty points ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("points adjustment must be non-zero")]
    ZeroAdjustment,

    #[error("a reason is required")]
    MissingReason,

    #[error("balance cannot go below zero (balance {balance}, change {delta})")]
    NegativeBalance { balance: i64, delta: i64 },

    #[error("purchase amount must be positive")]
    InvalidAmount,

    #[error("reward {0} is not available")]
    RewardUnavailable(String),

    #[error("insufficient points: need {needed}, have {available}")]
    InsufficientPoints { needed: i64, available: i64 },

    #[error("redemption limit of {limit} reached for reward {reward}")]
    RedemptionLimit { reward: String, limit: u32 },

    #[error("points total out of range")]
    Overflow,
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::unprocessable(err.to_string())
    }
}

/// Rejections when a coupon is redeemed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponError {
    #[error("coupon is not active")]
    Inactive,

    #[error("coupon is not valid until {0}")]
    NotStarted(chrono::NaiveDate),

    #[error("coupon expired on {0}")]
    Expired(chrono::NaiveDate),

    #[error("coupon has reached its limit of {0} uses")]
    Exhausted(u32),

    #[error("minimum purchase of {minimum} cents not met")]
    BelowMinimum { minimum: i64 },

    #[error("coupon cannot be used on this day")]
    WrongDay,
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        Self::unprocessable(err.to_string())
    }
}

/// Rejections when connecting platforms or scheduling content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PublishError {
    #[error("an account handle is required to connect")]
    MissingHandle,

    #[error("no connected platform selected")]
    NoConnectedPlatform,

    #[error("scheduled time must be in the future")]
    ScheduleInPast,

    #[error("content was already published")]
    AlreadyPublished,
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        Self::unprocessable(err.to_string())
    }
}
