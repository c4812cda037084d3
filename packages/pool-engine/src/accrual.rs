use serde::{Deserialize, Serialize};

use finance::{
    coin::Coin, duration::Duration, interest, percent::Percent100, timestamp::Timestamp,
    zero::Zero,
};

use crate::{
    curve::{self, InterestRateModel},
    error::{Error, Result},
    state::PoolState,
};

/// Pool totals advanced to an instant, paired with the analytics row
/// describing the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accrual {
    pub state: PoolState,
    pub result: AccrualResult,
}

/// One interest accrual, as the collaborator persists it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AccrualResult {
    pub previous_supply_assets: Coin,
    pub new_supply_assets: Coin,
    pub previous_borrow_assets: Coin,
    pub new_borrow_assets: Coin,
    pub interest_earned: Coin,
}

/// Brings the pool's totals up to `now`.
///
/// Interest is linear over the elapsed window at the rate the curve gives
/// for the utilization at the window's start. The borrow side grows by the
/// full interest; the supply side only by the share left after the protocol
/// reserve cut. Must run before any event delta touches the totals.
///
/// Calling again at the same instant is a no-op, so several events within
/// one block never double-accrue. A call moving backwards in time is an
/// upstream reordering bug and fails.
pub fn accrue(state: &PoolState, model: &InterestRateModel, now: Timestamp) -> Result<Accrual> {
    if now < state.last_accrued {
        return Err(Error::TimeOrdering {
            last: state.last_accrued,
            current: now,
        });
    }

    let elapsed = Duration::between(&state.last_accrued, &now);
    if elapsed.is_zero() {
        return Ok(Accrual {
            state: *state,
            result: unchanged(state),
        });
    }

    let utilization = curve::utilization(state.total_supply_assets, state.total_borrow_assets)?;
    let borrow_rate = model.borrow_rate(utilization)?;

    let interest_earned = interest::interest(borrow_rate, state.total_borrow_assets, elapsed)
        .ok_or_else(|| Error::overflow("pool interest"))?;
    let supplier_share = (Percent100::HUNDRED - model.reserve_factor())
        .of(interest_earned)
        .ok_or_else(|| Error::overflow("supplier interest share"))?;

    let new_borrow_assets = state
        .total_borrow_assets
        .checked_add(interest_earned)
        .ok_or_else(|| Error::overflow("total borrow assets"))?;
    let new_supply_assets = state
        .total_supply_assets
        .checked_add(supplier_share)
        .ok_or_else(|| Error::overflow("total supply assets"))?;

    Ok(Accrual {
        state: PoolState {
            total_supply_assets: new_supply_assets,
            total_borrow_assets: new_borrow_assets,
            last_accrued: now,
            ..*state
        },
        result: AccrualResult {
            previous_supply_assets: state.total_supply_assets,
            new_supply_assets,
            previous_borrow_assets: state.total_borrow_assets,
            new_borrow_assets,
            interest_earned,
        },
    })
}

fn unchanged(state: &PoolState) -> AccrualResult {
    AccrualResult {
        previous_supply_assets: state.total_supply_assets,
        new_supply_assets: state.total_supply_assets,
        previous_borrow_assets: state.total_borrow_assets,
        new_borrow_assets: state.total_borrow_assets,
        interest_earned: Coin::ZERO,
    }
}
