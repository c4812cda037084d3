use finance::{
    coin::{Amount, Coin},
    fraction::SimpleFraction,
    timestamp::Timestamp,
    zero::Zero,
};

use crate::{
    accrual::{self, Accrual, AccrualResult},
    curve::InterestRateModel,
    error::{Error, Result},
    event::{Envelope, LendingEvent},
    snapshot::{self, PoolSnapshot},
    state::{PoolActivity, PoolInfo, PoolState, UserActivity},
};

/// Everything one event turns into. The caller persists all of it; the
/// engine keeps none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub pool: PoolState,
    pub pool_activity: PoolActivity,
    pub user_activity: UserActivity,
    pub accrual: AccrualResult,
    /// Present on pool-creation events only.
    pub pool_info: Option<PoolInfo>,
    /// Present when the event opens a new analytics bucket.
    pub snapshot: Option<PoolSnapshot>,
}

/// Runs one event through the pool: accrue up to the event's instant first,
/// then layer the event's own delta on the fresh totals, never the other
/// way around. Collateral amounts live in per-user positions, so collateral
/// events leave the pool totals alone yet still refresh the rate clock.
pub fn apply_event(
    pool: &PoolState,
    pool_activity: &PoolActivity,
    user_activity: &UserActivity,
    model: &InterestRateModel,
    envelope: &Envelope,
    last_snapshot: Option<Timestamp>,
) -> Result<Applied> {
    let now = envelope.meta.timestamp;

    if envelope.event.amount().is_some_and(|amount| amount.is_zero()) {
        return Err(Error::ZeroAmount(envelope.event.kind()));
    }

    let Accrual {
        state: mut pool,
        result,
    } = accrual::accrue(pool, model, now)?;
    let mut pool_activity = *pool_activity;
    let mut user_activity = *user_activity;
    let mut pool_info = None;

    match &envelope.event {
        LendingEvent::PoolCreated {
            collateral_token,
            borrow_token,
            ltv,
        } => {
            pool_info = Some(PoolInfo {
                address: envelope.meta.pool.clone(),
                collateral_token: collateral_token.clone(),
                borrow_token: borrow_token.clone(),
                ltv: *ltv,
                created: now,
            });
        }
        LendingEvent::SupplyLiquidity { amount, .. } => {
            let minted = mint_shares(pool.total_supply_assets, pool.total_supply_shares, *amount)?;

            pool.total_supply_assets = pool
                .total_supply_assets
                .checked_add(*amount)
                .ok_or_else(|| Error::overflow("total supply assets"))?;
            pool.total_supply_shares = pool
                .total_supply_shares
                .checked_add(minted)
                .ok_or_else(|| Error::overflow("total supply shares"))?;
            pool_activity = pool_activity.deposit(*amount)?;
            user_activity = user_activity.deposit(*amount)?;
        }
        LendingEvent::WithdrawLiquidity { amount, .. } => {
            let burned = burn_shares(pool.total_supply_assets, pool.total_supply_shares, *amount)?;

            pool.total_supply_assets = pool
                .total_supply_assets
                .checked_sub(*amount)
                .ok_or(Error::InsufficientBalance)?;
            pool.total_supply_shares = pool
                .total_supply_shares
                .checked_sub(burned)
                .ok_or_else(|| Error::overflow("total supply shares"))?;
            pool_activity = pool_activity.withdraw(*amount)?;
            user_activity = user_activity.withdraw(*amount)?;
        }
        LendingEvent::Borrow { amount, .. } => {
            let minted = mint_shares(pool.total_borrow_assets, pool.total_borrow_shares, *amount)?;

            pool.total_borrow_assets = pool
                .total_borrow_assets
                .checked_add(*amount)
                .ok_or_else(|| Error::overflow("total borrow assets"))?;
            pool.total_borrow_shares = pool
                .total_borrow_shares
                .checked_add(minted)
                .ok_or_else(|| Error::overflow("total borrow shares"))?;
            pool_activity = pool_activity.borrow(*amount)?;
            user_activity = user_activity.borrow(*amount)?;
        }
        LendingEvent::Repay { amount, .. } => {
            let burned = burn_shares(pool.total_borrow_assets, pool.total_borrow_shares, *amount)?;

            // The loan-side computation is the source of truth for what is
            // due; a repayment slightly above the pool-side total is
            // rounding, not corruption. Clamping at zero is the safe move.
            pool.total_borrow_assets = pool.total_borrow_assets.saturating_sub(*amount);
            pool.total_borrow_shares = pool
                .total_borrow_shares
                .checked_sub(burned)
                .ok_or_else(|| Error::overflow("total borrow shares"))?;
            pool_activity = pool_activity.repay(*amount)?;
            user_activity = user_activity.repay(*amount)?;
        }
        LendingEvent::SupplyCollateral { .. }
        | LendingEvent::WithdrawCollateral { .. }
        | LendingEvent::CreatePosition { .. } => {}
    }

    let snapshot = match snapshot::due_snapshot(&envelope.meta.pool, now, last_snapshot) {
        Some(key) => Some(PoolSnapshot::build(key, &pool, model)?),
        None => None,
    };

    Ok(Applied {
        pool,
        pool_activity,
        user_activity,
        accrual: result,
        pool_info,
        snapshot,
    })
}

/// Shares for a deposit, priced at the pool's pre-delta exchange rate,
/// truncating. An empty pool starts at par.
fn mint_shares(total_assets: Coin, total_shares: Coin, amount: Coin) -> Result<Coin> {
    if total_shares.is_zero() || total_assets.is_zero() {
        return Ok(amount);
    }

    SimpleFraction::new(Amount::from(total_shares), Amount::from(total_assets))
        .of(amount)
        .ok_or_else(|| Error::overflow("share mint"))
}

/// Shares retired by a withdrawal, truncating, never more than exist.
fn burn_shares(total_assets: Coin, total_shares: Coin, amount: Coin) -> Result<Coin> {
    if total_assets.is_zero() {
        return Ok(Coin::ZERO);
    }

    SimpleFraction::new(Amount::from(total_shares), Amount::from(total_assets))
        .of(amount)
        .map(|burned| burned.min(total_shares))
        .ok_or_else(|| Error::overflow("share burn"))
}

#[cfg(test)]
mod tests {
    use finance::{
        coin::Coin,
        duration::Duration,
        percent::{Percent, Percent100},
        timestamp::Timestamp,
        zero::Zero,
    };

    use crate::{
        curve::InterestRateModel,
        error::Error,
        event::{Address, Envelope, EventId, LendingEvent},
        state::{PoolActivity, PoolState, UserActivity},
    };

    use super::{apply_event, Applied};

    fn model() -> InterestRateModel {
        InterestRateModel::try_new(
            Percent::ZERO,
            Percent::from_bps(2_000),
            Percent::from_bps(10_000),
            Percent100::from_bps(8_000),
            Percent100::ZERO,
        )
        .unwrap()
    }

    fn pool(supply: u128, shares: u128, borrow: u128, borrow_shares: u128) -> PoolState {
        PoolState {
            total_supply_assets: Coin::new(supply),
            total_supply_shares: Coin::new(shares),
            total_borrow_assets: Coin::new(borrow),
            total_borrow_shares: Coin::new(borrow_shares),
            last_accrued: Timestamp::from_seconds(0),
        }
    }

    fn envelope(event: LendingEvent, at: u64) -> Envelope {
        Envelope::try_new(
            Address::new("0xp00l"),
            Some(Address::new("0xa55e7")),
            EventId::new(1, 0),
            Timestamp::from_seconds(at),
            "0xabc".into(),
            event,
        )
        .unwrap()
    }

    fn user() -> Address {
        Address::new("0xu5er")
    }

    fn supply(amount: u128, at: u64) -> Envelope {
        envelope(
            LendingEvent::SupplyLiquidity {
                user: user(),
                amount: Coin::new(amount),
                on_behalf_of: user(),
            },
            at,
        )
    }

    fn apply(state: &PoolState, envelope: &Envelope) -> Result<Applied, Error> {
        apply_event(
            state,
            &PoolActivity::default(),
            &UserActivity::default(),
            &model(),
            envelope,
            None,
        )
    }

    #[test]
    fn first_deposit_mints_at_par() {
        let applied = apply(&pool(0, 0, 0, 0), &supply(1_000, 60)).unwrap();

        assert_eq!(Coin::new(1_000), applied.pool.total_supply_assets);
        assert_eq!(Coin::new(1_000), applied.pool.total_supply_shares);
        assert_eq!(Coin::new(1_000), applied.pool_activity.total_deposits);
        assert_eq!(Coin::new(1_000), applied.user_activity.total_deposited);
        assert_eq!(Timestamp::from_seconds(60), applied.pool.last_accrued);
    }

    #[test]
    fn deposit_prices_shares_after_accrual() {
        // A year at 50% utilization first grows assets to 1_062_500, so the
        // same deposit buys proportionally fewer shares.
        let state = pool(1_000_000, 1_000_000, 500_000, 500_000);
        let applied = apply(&state, &supply(1_062_500, Duration::YEAR.secs())).unwrap();

        assert_eq!(Coin::new(62_500), applied.accrual.interest_earned);
        assert_eq!(Coin::new(2_125_000), applied.pool.total_supply_assets);
        assert_eq!(Coin::new(2_000_000), applied.pool.total_supply_shares);
    }

    #[test]
    fn withdraw_burns_proportionally() {
        let state = pool(1_000, 1_000, 0, 0);
        let applied = apply(
            &state,
            &envelope(
                LendingEvent::WithdrawLiquidity {
                    user: user(),
                    amount: Coin::new(400),
                    to: user(),
                },
                0,
            ),
        )
        .unwrap();

        assert_eq!(Coin::new(600), applied.pool.total_supply_assets);
        assert_eq!(Coin::new(600), applied.pool.total_supply_shares);
        assert_eq!(Coin::new(400), applied.pool_activity.total_withdrawals);
    }

    #[test]
    fn withdraw_beyond_liquidity_fails() {
        let state = pool(1_000, 1_000, 0, 0);

        assert_eq!(
            Err(Error::InsufficientBalance),
            apply(
                &state,
                &envelope(
                    LendingEvent::WithdrawLiquidity {
                        user: user(),
                        amount: Coin::new(1_001),
                        to: user(),
                    },
                    0,
                ),
            )
        );
    }

    #[test]
    fn borrow_grows_the_debt_side() {
        let state = pool(1_000_000, 1_000_000, 0, 0);
        let applied = apply(
            &state,
            &envelope(
                LendingEvent::Borrow {
                    user: user(),
                    amount: Coin::new(250_000),
                    on_behalf_of: user(),
                },
                0,
            ),
        )
        .unwrap();

        assert_eq!(Coin::new(250_000), applied.pool.total_borrow_assets);
        assert_eq!(Coin::new(250_000), applied.pool.total_borrow_shares);
        assert_eq!(Coin::new(250_000), applied.pool_activity.total_borrows);
        assert_eq!(Coin::new(250_000), applied.user_activity.total_borrowed);
        // the supply side is untouched by a borrow
        assert_eq!(state.total_supply_assets, applied.pool.total_supply_assets);
    }

    #[test]
    fn repay_with_excess_closes_out() {
        let state = pool(1_000_000, 1_000_000, 500, 500);
        let applied = apply(
            &state,
            &envelope(
                LendingEvent::Repay {
                    user: user(),
                    amount: Coin::new(600),
                    repayer: user(),
                },
                0,
            ),
        )
        .unwrap();

        assert!(applied.pool.total_borrow_assets.is_zero());
        assert!(applied.pool.total_borrow_shares.is_zero());
        assert_eq!(Coin::new(600), applied.pool_activity.total_repays);
    }

    #[test]
    fn collateral_event_only_advances_the_clock() {
        let state = pool(1_000_000, 1_000_000, 500_000, 500_000);
        let applied = apply(
            &state,
            &envelope(
                LendingEvent::SupplyCollateral {
                    user: user(),
                    amount: Coin::new(700),
                    on_behalf_of: user(),
                },
                3_600,
            ),
        )
        .unwrap();

        // interest accrued, nothing else moved
        assert!(applied.accrual.interest_earned > Coin::ZERO);
        assert_eq!(
            applied.accrual.new_supply_assets,
            applied.pool.total_supply_assets
        );
        assert_eq!(Timestamp::from_seconds(3_600), applied.pool.last_accrued);
        assert_eq!(PoolActivity::default(), applied.pool_activity);
    }

    #[test]
    fn zero_amount_is_refused() {
        assert_eq!(
            Err(Error::ZeroAmount("supply_liquidity")),
            apply(&pool(0, 0, 0, 0), &supply(0, 0))
        );
    }

    #[test]
    fn pool_creation_yields_the_registry_row() {
        let applied = apply(
            &PoolState::default(),
            &envelope(
                LendingEvent::PoolCreated {
                    collateral_token: Address::new("0xc011"),
                    borrow_token: Address::new("0xb0rr"),
                    ltv: Percent100::from_percent(75),
                },
                100,
            ),
        )
        .unwrap();

        let info = applied.pool_info.unwrap();
        assert_eq!(Address::new("0xp00l"), info.address);
        assert_eq!(Address::new("0xc011"), info.collateral_token);
        assert_eq!(Percent100::from_percent(75), info.ltv);
        assert_eq!(Timestamp::from_seconds(100), info.created);
    }

    #[test]
    fn snapshot_once_per_bucket() {
        let state = pool(1_000_000, 1_000_000, 500_000, 500_000);

        let first = apply(&state, &supply(1_000, 100)).unwrap();
        let snapshot = first.snapshot.expect("the first event opens the bucket");
        assert_eq!(Timestamp::from_seconds(0), snapshot.key.bucket);
        assert_eq!(
            first.pool.total_supply_assets,
            snapshot.total_supply_assets
        );

        let second = apply_event(
            &first.pool,
            &first.pool_activity,
            &UserActivity::default(),
            &model(),
            &supply(1_000, 200),
            Some(Timestamp::from_seconds(100)),
        )
        .unwrap();
        assert_eq!(None, second.snapshot);

        let next_hour = apply_event(
            &second.pool,
            &second.pool_activity,
            &UserActivity::default(),
            &model(),
            &supply(1_000, 3_700),
            Some(Timestamp::from_seconds(100)),
        )
        .unwrap();
        assert_eq!(
            Timestamp::from_seconds(3_600),
            next_hour.snapshot.unwrap().key.bucket
        );
    }

    #[test]
    fn out_of_order_event_is_rejected() {
        let state = PoolState {
            last_accrued: Timestamp::from_seconds(500),
            ..pool(1_000, 1_000, 0, 0)
        };

        assert!(matches!(
            apply(&state, &supply(1_000, 499)),
            Err(Error::TimeOrdering { .. })
        ));
    }
}
