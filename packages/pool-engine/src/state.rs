use serde::{Deserialize, Serialize};

use finance::{coin::Coin, percent::Percent100, timestamp::Timestamp};

use crate::{
    error::{Error, Result},
    event::Address,
};

/// The authoritative accounting state of one pool.
///
/// Everything else the engine reports is derived from these five fields.
/// The struct is caller-owned value data; each operation takes it in and
/// hands an updated copy back.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PoolState {
    pub total_supply_assets: Coin,
    pub total_supply_shares: Coin,
    pub total_borrow_assets: Coin,
    pub total_borrow_shares: Coin,
    pub last_accrued: Timestamp,
}

impl PoolState {
    pub fn new(created: Timestamp) -> Self {
        Self {
            last_accrued: created,
            ..Self::default()
        }
    }
}

/// The registry row of a dynamically created pool.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PoolInfo {
    pub address: Address,
    pub collateral_token: Address,
    pub borrow_token: Address,
    pub ltv: Percent100,
    pub created: Timestamp,
}

/// Lifetime flow counters of a pool. Only ever grow.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PoolActivity {
    pub total_deposits: Coin,
    pub total_withdrawals: Coin,
    pub total_borrows: Coin,
    pub total_repays: Coin,
}

impl PoolActivity {
    pub fn deposit(self, amount: Coin) -> Result<Self> {
        self.total_deposits
            .checked_add(amount)
            .map(|total_deposits| Self {
                total_deposits,
                ..self
            })
            .ok_or_else(|| Error::overflow("pool deposits counter"))
    }

    pub fn withdraw(self, amount: Coin) -> Result<Self> {
        self.total_withdrawals
            .checked_add(amount)
            .map(|total_withdrawals| Self {
                total_withdrawals,
                ..self
            })
            .ok_or_else(|| Error::overflow("pool withdrawals counter"))
    }

    pub fn borrow(self, amount: Coin) -> Result<Self> {
        self.total_borrows
            .checked_add(amount)
            .map(|total_borrows| Self {
                total_borrows,
                ..self
            })
            .ok_or_else(|| Error::overflow("pool borrows counter"))
    }

    pub fn repay(self, amount: Coin) -> Result<Self> {
        self.total_repays
            .checked_add(amount)
            .map(|total_repays| Self {
                total_repays,
                ..self
            })
            .ok_or_else(|| Error::overflow("pool repays counter"))
    }
}

/// Lifetime flow counters of a user, across all pools.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct UserActivity {
    pub total_deposited: Coin,
    pub total_withdrawn: Coin,
    pub total_borrowed: Coin,
    pub total_repaid: Coin,
}

impl UserActivity {
    pub fn deposit(self, amount: Coin) -> Result<Self> {
        self.total_deposited
            .checked_add(amount)
            .map(|total_deposited| Self {
                total_deposited,
                ..self
            })
            .ok_or_else(|| Error::overflow("user deposited counter"))
    }

    pub fn withdraw(self, amount: Coin) -> Result<Self> {
        self.total_withdrawn
            .checked_add(amount)
            .map(|total_withdrawn| Self {
                total_withdrawn,
                ..self
            })
            .ok_or_else(|| Error::overflow("user withdrawn counter"))
    }

    pub fn borrow(self, amount: Coin) -> Result<Self> {
        self.total_borrowed
            .checked_add(amount)
            .map(|total_borrowed| Self {
                total_borrowed,
                ..self
            })
            .ok_or_else(|| Error::overflow("user borrowed counter"))
    }

    pub fn repay(self, amount: Coin) -> Result<Self> {
        self.total_repaid
            .checked_add(amount)
            .map(|total_repaid| Self {
                total_repaid,
                ..self
            })
            .ok_or_else(|| Error::overflow("user repaid counter"))
    }
}
