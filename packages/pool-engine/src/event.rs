use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use finance::{coin::Coin, percent::Percent100, timestamp::Timestamp};

use crate::error::{Error, Result};

/// A chain address in its canonical textual form.
#[derive(
    Serialize, Deserialize, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new<A>(address: A) -> Self
    where
        A: Into<String>,
    {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// The idempotent key of an event record.
///
/// Ordering follows the chain's total order: block number, then the log's
/// index within it.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub struct EventId {
    block_number: u64,
    log_index: u32,
}

impl EventId {
    pub const fn new(block_number: u64, log_index: u32) -> Self {
        Self {
            block_number,
            log_index,
        }
    }

    pub const fn block_number(&self) -> u64 {
        self.block_number
    }

    pub const fn log_index(&self) -> u32 {
        self.log_index
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_fmt(format_args!("{}-{}", self.block_number, self.log_index))
    }
}

/// What every mutating event carries besides its kind-specific payload.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EventMeta {
    pub pool: Address,
    /// The token the event moves, collateral or borrow side, already
    /// resolved by the decoding layer.
    pub asset: Address,
    pub id: EventId,
    pub timestamp: Timestamp,
    pub tx_hash: String,
}

/// The closed set of events the engine understands. Anything not decodable
/// into one of these never reaches the engine.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LendingEvent {
    PoolCreated {
        collateral_token: Address,
        borrow_token: Address,
        ltv: Percent100,
    },
    SupplyLiquidity {
        user: Address,
        amount: Coin,
        on_behalf_of: Address,
    },
    WithdrawLiquidity {
        user: Address,
        amount: Coin,
        to: Address,
    },
    Borrow {
        user: Address,
        amount: Coin,
        on_behalf_of: Address,
    },
    Repay {
        user: Address,
        amount: Coin,
        repayer: Address,
    },
    SupplyCollateral {
        user: Address,
        amount: Coin,
        on_behalf_of: Address,
    },
    WithdrawCollateral {
        user: Address,
        amount: Coin,
        to: Address,
    },
    CreatePosition {
        user: Address,
    },
}

impl LendingEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::SupplyLiquidity { .. } => "supply_liquidity",
            Self::WithdrawLiquidity { .. } => "withdraw_liquidity",
            Self::Borrow { .. } => "borrow",
            Self::Repay { .. } => "repay",
            Self::SupplyCollateral { .. } => "supply_collateral",
            Self::WithdrawCollateral { .. } => "withdraw_collateral",
            Self::CreatePosition { .. } => "create_position",
        }
    }

    pub fn user(&self) -> Option<&Address> {
        match self {
            Self::PoolCreated { .. } => None,
            Self::SupplyLiquidity { user, .. }
            | Self::WithdrawLiquidity { user, .. }
            | Self::Borrow { user, .. }
            | Self::Repay { user, .. }
            | Self::SupplyCollateral { user, .. }
            | Self::WithdrawCollateral { user, .. }
            | Self::CreatePosition { user } => Some(user),
        }
    }

    pub fn amount(&self) -> Option<Coin> {
        match self {
            Self::PoolCreated { .. } | Self::CreatePosition { .. } => None,
            Self::SupplyLiquidity { amount, .. }
            | Self::WithdrawLiquidity { amount, .. }
            | Self::Borrow { amount, .. }
            | Self::Repay { amount, .. }
            | Self::SupplyCollateral { amount, .. }
            | Self::WithdrawCollateral { amount, .. } => Some(*amount),
        }
    }
}

/// A validated event, ready for the engine.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Envelope {
    pub meta: EventMeta,
    pub event: LendingEvent,
}

impl Envelope {
    /// Builds the envelope, refusing an event whose asset identity the
    /// decoding layer could not resolve. Substituting a placeholder, the
    /// pool address say, would silently corrupt per-asset analytics.
    pub fn try_new(
        pool: Address,
        asset: Option<Address>,
        id: EventId,
        timestamp: Timestamp,
        tx_hash: String,
        event: LendingEvent,
    ) -> Result<Self> {
        asset
            .ok_or_else(|| Error::UnresolvedAsset { pool: pool.clone() })
            .map(|asset| Self {
                meta: EventMeta {
                    pool,
                    asset,
                    id,
                    timestamp,
                    tx_hash,
                },
                event,
            })
    }
}
