use thiserror::Error;

use finance::timestamp::Timestamp;

use crate::event::Address;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("[PoolEngine] {0}")]
    Finance(#[from] finance::error::Error),

    #[error(
        "[PoolEngine] Time ordering violation! The timestamp {current} precedes the last accrual at {last}"
    )]
    TimeOrdering {
        last: Timestamp,
        current: Timestamp,
    },

    #[error("[PoolEngine] Arithmetic overflow computing {0}")]
    Overflow(String),

    #[error("[PoolEngine] Invalid interest rate model! Cause: {0}")]
    InvalidRateModel(String),

    #[error("[PoolEngine] Unresolved asset identity in an event of pool {pool}")]
    UnresolvedAsset { pool: Address },

    #[error("[PoolEngine] Insufficient balance")]
    InsufficientBalance,

    #[error("[PoolEngine] Zero amount {0} event")]
    ZeroAmount(&'static str),
}

impl Error {
    pub(crate) fn overflow(details: &str) -> Self {
        Self::Overflow(details.into())
    }

    pub(crate) fn invalid_model(cause: &str) -> Self {
        Self::InvalidRateModel(cause.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
