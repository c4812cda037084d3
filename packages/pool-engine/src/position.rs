use serde::{Deserialize, Serialize};

use finance::{
    coin::Coin, duration::Duration, interest, percent::{Percent, Percent100},
    timestamp::Timestamp,
};

use crate::error::{Error, Result};

/// One user's debt in one pool.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct BorrowPosition {
    pub amount: Coin,
    /// Interest ever accrued onto the position. Informational, only grows,
    /// repayments do not reduce it.
    pub accrued_interest: Coin,
    pub borrow_rate: Percent,
    pub last_accrued: Timestamp,
    pub is_active: bool,
}

impl BorrowPosition {
    /// Folds the interest since `last_accrued` into the debt at the pool's
    /// current rate, which the caller must have computed freshly.
    ///
    /// A position without debt, or one already at `now`, is left as-is.
    pub fn accrue(&self, now: Timestamp, current_rate: Percent) -> Result<Self> {
        if now < self.last_accrued {
            return Err(Error::TimeOrdering {
                last: self.last_accrued,
                current: now,
            });
        }

        let elapsed = Duration::between(&self.last_accrued, &now);
        if self.amount.is_zero() || elapsed.is_zero() {
            return Ok(*self);
        }

        let interest = interest::interest(current_rate, self.amount, elapsed)
            .ok_or_else(|| Error::overflow("position interest"))?;

        Ok(Self {
            amount: self
                .amount
                .checked_add(interest)
                .ok_or_else(|| Error::overflow("position debt"))?,
            accrued_interest: self
                .accrued_interest
                .checked_add(interest)
                .ok_or_else(|| Error::overflow("position interest counter"))?,
            borrow_rate: current_rate,
            last_accrued: now,
            is_active: self.is_active,
        })
    }

    pub fn borrow(&self, amount: Coin, now: Timestamp, current_rate: Percent) -> Result<Self> {
        self.amount
            .checked_add(amount)
            .ok_or_else(|| Error::overflow("position debt"))
            .map(|total| Self {
                amount: total,
                borrow_rate: current_rate,
                last_accrued: now,
                is_active: true,
                ..*self
            })
    }

    /// Settles a repayment. An excess over the outstanding debt closes the
    /// position and is the caller's to refund; the engine only clamps.
    pub fn repay(&self, amount: Coin) -> Self {
        let amount = self.amount.saturating_sub(amount);

        Self {
            amount,
            is_active: !amount.is_zero(),
            ..*self
        }
    }
}

/// One user's collateral of one asset in one pool.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CollateralPosition {
    pub amount: Coin,
    /// The effective loan-to-value weight this collateral counts with.
    pub collateral_factor: Percent100,
    pub is_active: bool,
}

impl CollateralPosition {
    pub fn supply(&self, amount: Coin) -> Result<Self> {
        self.amount
            .checked_add(amount)
            .ok_or_else(|| Error::overflow("collateral amount"))
            .map(|total| Self {
                amount: total,
                is_active: true,
                ..*self
            })
    }

    pub fn withdraw(&self, amount: Coin) -> Result<Self> {
        self.amount
            .checked_sub(amount)
            .ok_or(Error::InsufficientBalance)
            .map(|left| Self {
                amount: left,
                is_active: !left.is_zero(),
                ..*self
            })
    }
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

    use crate::error::Error;

    use super::{BorrowPosition, CollateralPosition};

    fn position(amount: u128, rate: u32, last_accrued: u64) -> BorrowPosition {
        BorrowPosition {
            amount: Coin::new(amount),
            accrued_interest: Coin::ZERO,
            borrow_rate: Percent::from_bps(rate),
            last_accrued: Timestamp::from_seconds(last_accrued),
            is_active: true,
        }
    }

    #[test]
    fn accrue_a_year() {
        let position = position(1_000_000, 1_000, 0);
        let now = Timestamp::from_seconds(Duration::YEAR.secs());

        let accrued = position.accrue(now, Percent::from_bps(1_250)).unwrap();

        assert_eq!(Coin::new(1_125_000), accrued.amount);
        assert_eq!(Coin::new(125_000), accrued.accrued_interest);
        assert_eq!(Percent::from_bps(1_250), accrued.borrow_rate);
        assert_eq!(now, accrued.last_accrued);
    }

    #[test]
    fn accrue_no_debt_is_a_no_op() {
        let position = BorrowPosition::default();
        let now = Timestamp::from_seconds(1_000);

        assert_eq!(
            position,
            position.accrue(now, Percent::from_bps(1_250)).unwrap()
        );
    }

    #[test]
    fn accrue_same_instant_is_a_no_op() {
        let position = position(1_000_000, 1_000, 500);

        assert_eq!(
            position,
            position
                .accrue(Timestamp::from_seconds(500), Percent::from_bps(9_999))
                .unwrap()
        );
    }

    #[test]
    fn accrue_backwards_fails() {
        let position = position(1_000_000, 1_000, 500);

        assert_eq!(
            Err(Error::TimeOrdering {
                last: Timestamp::from_seconds(500),
                current: Timestamp::from_seconds(499),
            }),
            position.accrue(Timestamp::from_seconds(499), Percent::from_bps(1_000))
        );
    }

    #[test]
    fn borrow_activates_and_stamps() {
        let now = Timestamp::from_seconds(42);
        let position = BorrowPosition::default()
            .borrow(Coin::new(700), now, Percent::from_bps(1_250))
            .unwrap();

        assert!(position.is_active);
        assert_eq!(Coin::new(700), position.amount);
        assert_eq!(now, position.last_accrued);
        assert_eq!(Percent::from_bps(1_250), position.borrow_rate);
    }

    #[test]
    fn repay_partial_and_full() {
        let position = position(1_000, 1_250, 0);

        let partial = position.repay(Coin::new(300));
        assert_eq!(Coin::new(700), partial.amount);
        assert!(partial.is_active);

        let closed = partial.repay(Coin::new(900));
        assert!(closed.amount.is_zero());
        assert!(!closed.is_active);
        // the informational counter survives closure
        assert_eq!(position.accrued_interest, closed.accrued_interest);
    }

    #[test]
    fn collateral_lifecycle() {
        let position = CollateralPosition {
            collateral_factor: Percent100::from_percent(80),
            ..CollateralPosition::default()
        };

        let supplied = position.supply(Coin::new(500)).unwrap();
        assert!(supplied.is_active);
        assert_eq!(Coin::new(500), supplied.amount);

        let drained = supplied.withdraw(Coin::new(500)).unwrap();
        assert!(!drained.is_active);
        assert!(drained.amount.is_zero());

        assert_eq!(
            Err(Error::InsufficientBalance),
            supplied.withdraw(Coin::new(501))
        );
    }
}
