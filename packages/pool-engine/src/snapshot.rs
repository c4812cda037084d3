use serde::{Deserialize, Serialize};

use finance::{
    coin::Coin,
    compound,
    duration::Duration,
    percent::{Percent, Percent100},
    timestamp::Timestamp,
};

use crate::{
    curve::{self, InterestRateModel},
    error::Result,
    event::Address,
    state::PoolState,
};

/// The width of one analytics bucket.
pub const SNAPSHOT_WINDOW: Duration = Duration::HOUR;

/// The compounding cadence APYs are quoted at.
pub const COMPOUNDING_PERIODS_PER_YEAR: u32 = 365;

/// The deterministic key of a periodic analytics record: at most one exists
/// per pool per window, however many events land inside it. The storage
/// layer stays free to insert idempotently on this key.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub struct SnapshotKey {
    pub pool: Address,
    pub bucket: Timestamp,
}

impl SnapshotKey {
    pub fn record_id(&self) -> String {
        format!("{}-{}", self.pool, self.bucket)
    }
}

pub fn bucket(at: Timestamp) -> Timestamp {
    at.floor_to(SNAPSHOT_WINDOW)
}

/// Whether a new periodic record is due at `at`, given when the previous
/// one was taken. `None` while the current bucket is already covered.
pub fn due_snapshot(
    pool: &Address,
    at: Timestamp,
    last_snapshot: Option<Timestamp>,
) -> Option<SnapshotKey> {
    let current = bucket(at);

    match last_snapshot {
        Some(last) if bucket(last) >= current => None,
        _ => Some(SnapshotKey {
            pool: pool.clone(),
            bucket: current,
        }),
    }
}

/// All rates derived from a pool's totals. Recomputed on demand, never
/// authoritative.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RateSnapshot {
    pub utilization: Percent100,
    pub borrow_rate: Percent,
    pub supply_rate: Percent,
    pub borrow_apy: Percent,
    pub supply_apy: Percent,
}

pub fn rate_snapshot(state: &PoolState, model: &InterestRateModel) -> Result<RateSnapshot> {
    let utilization = curve::utilization(state.total_supply_assets, state.total_borrow_assets)?;
    let borrow_rate = model.borrow_rate(utilization)?;
    let supply_rate = model.supply_rate(utilization, borrow_rate)?;

    Ok(RateSnapshot {
        utilization,
        borrow_rate,
        supply_rate,
        borrow_apy: compound::apy(borrow_rate, COMPOUNDING_PERIODS_PER_YEAR),
        supply_apy: compound::apy(supply_rate, COMPOUNDING_PERIODS_PER_YEAR),
    })
}

/// The periodic analytics row, as the collaborator persists it.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PoolSnapshot {
    pub key: SnapshotKey,
    pub rates: RateSnapshot,
    pub total_supply_assets: Coin,
    pub total_borrow_assets: Coin,
}

impl PoolSnapshot {
    pub fn build(key: SnapshotKey, state: &PoolState, model: &InterestRateModel) -> Result<Self> {
        rate_snapshot(state, model).map(|rates| Self {
            key,
            rates,
            total_supply_assets: state.total_supply_assets,
            total_borrow_assets: state.total_borrow_assets,
        })
    }
}
