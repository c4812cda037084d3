use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use finance::coin::Amount;

use crate::position::{BorrowPosition, CollateralPosition};

/// Collateral-to-debt solvency ratio, scaled by 1e18.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct HealthFactor(Amount);

impl HealthFactor {
    pub const SCALE: Amount = 1_000_000_000_000_000_000;

    /// Reported for a position with no debt, whatever the collateral.
    pub const NO_DEBT: Self = Self(2 * Self::SCALE);

    /// The most conservative reading, reported when the computation fails.
    pub const FLOOR: Self = Self(0);

    pub const fn new(value: Amount) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> Amount {
        self.0
    }

    pub const fn is_solvent(&self) -> bool {
        self.0 >= Self::SCALE
    }
}

impl Display for HealthFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_fmt(format_args!(
            "{}.{:02}",
            self.0 / Self::SCALE,
            self.0 % Self::SCALE / (Self::SCALE / 100)
        ))
    }
}

/// A health factor plus the fidelity it was computed at.
///
/// `degraded` flags the fail-closed path: the factor then is [`HealthFactor::FLOOR`],
/// a warning for the caller to log, never a confirmed risk reading.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RiskAssessment {
    pub factor: HealthFactor,
    pub degraded: bool,
}

/// Weighs the user's active collateral against the active debt.
///
/// Both sides must already be expressed in one common unit; no price
/// conversion happens here. Liquidation decisions stay with the caller,
/// this only reports the ratio.
pub fn assess(
    collaterals: &[CollateralPosition],
    borrows: &[BorrowPosition],
) -> RiskAssessment {
    match try_assess(collaterals, borrows) {
        Some(factor) => RiskAssessment {
            factor,
            degraded: false,
        },
        None => RiskAssessment {
            factor: HealthFactor::FLOOR,
            degraded: true,
        },
    }
}

fn try_assess(
    collaterals: &[CollateralPosition],
    borrows: &[BorrowPosition],
) -> Option<HealthFactor> {
    let weighted_collateral = collaterals
        .iter()
        .filter(|position| position.is_active)
        .try_fold(0 as Amount, |sum, position| {
            position
                .collateral_factor
                .of(position.amount)
                .and_then(|weighted| sum.checked_add(weighted.into()))
        })?;

    let total_debt = borrows
        .iter()
        .filter(|position| position.is_active)
        .try_fold(0 as Amount, |sum, position| {
            sum.checked_add(position.amount.into())
        })?;

    if total_debt == 0 {
        return Some(HealthFactor::NO_DEBT);
    }

    weighted_collateral
        .checked_mul(HealthFactor::SCALE)
        .map(|scaled| HealthFactor::new(scaled / total_debt))
}

#[cfg(test)]
mod tests {
    use finance::{
        coin::{Amount, Coin},
        percent::{Percent, Percent100},
        timestamp::Timestamp,
        zero::Zero,
    };

    use crate::position::{BorrowPosition, CollateralPosition};

    use super::{assess, HealthFactor};

    fn collateral(amount: u128, factor_percent: u32) -> CollateralPosition {
        CollateralPosition {
            amount: Coin::new(amount),
            collateral_factor: Percent100::from_percent(factor_percent),
            is_active: true,
        }
    }

    fn debt(amount: u128) -> BorrowPosition {
        BorrowPosition {
            amount: Coin::new(amount),
            accrued_interest: Coin::ZERO,
            borrow_rate: Percent::from_bps(1_000),
            last_accrued: Timestamp::from_seconds(0),
            is_active: true,
        }
    }

    #[test]
    fn no_debt_sentinel() {
        let assessment = assess(&[collateral(1_000, 80)], &[]);
        assert_eq!(HealthFactor::NO_DEBT, assessment.factor);
        assert!(!assessment.degraded);

        // also with positions present but inactive
        let mut closed = debt(1_000);
        closed = closed.repay(Coin::new(1_000));
        assert_eq!(
            HealthFactor::NO_DEBT,
            assess(&[collateral(1_000, 80)], &[closed]).factor
        );
    }

    #[test]
    fn even_odds() {
        // 1_000 at 80% against 800 debt
        let assessment = assess(&[collateral(1_000, 80)], &[debt(800)]);
        assert_eq!(HealthFactor::new(HealthFactor::SCALE), assessment.factor);
        assert!(assessment.factor.is_solvent());
    }

    #[test]
    fn comfortably_solvent() {
        let assessment = assess(
            &[collateral(1_000, 80), collateral(500, 50)],
            &[debt(200), debt(325)],
        );
        // (800 + 250) * 1e18 / 525
        assert_eq!(HealthFactor::new(2 * HealthFactor::SCALE), assessment.factor);
    }

    #[test]
    fn under_collateralized() {
        let assessment = assess(&[collateral(1_000, 50)], &[debt(800)]);
        assert_eq!(HealthFactor::new(625_000_000_000_000_000), assessment.factor);
        assert!(!assessment.factor.is_solvent());
    }

    #[test]
    fn inactive_collateral_does_not_count() {
        let mut inactive = collateral(1_000_000, 80);
        inactive.is_active = false;

        let assessment = assess(&[inactive], &[debt(800)]);
        assert_eq!(HealthFactor::FLOOR, assessment.factor);
        assert!(!assessment.degraded);
    }

    #[test]
    fn fails_closed_on_overflow() {
        let assessment = assess(
            &[collateral(Amount::MAX, 100), collateral(Amount::MAX, 100)],
            &[debt(800)],
        );
        assert_eq!(HealthFactor::FLOOR, assessment.factor);
        assert!(assessment.degraded);
        assert!(!assessment.factor.is_solvent());
    }

    #[test]
    fn display() {
        assert_eq!("1.25", format!("{}", HealthFactor::new(1_250_000_000_000_000_000)));
        assert_eq!("2.00", format!("{}", HealthFactor::NO_DEBT));
        assert_eq!("0.00", format!("{}", HealthFactor::FLOOR));
    }
}
