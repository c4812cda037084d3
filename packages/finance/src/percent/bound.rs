use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Sub,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    fraction::{Fractionable, SimpleFraction},
    zero::Zero,
};

use super::Units;

const HUNDRED_UNITS: Units = 10_000;

/// A percentage in basis points, verified to stay at or below `UPPER_BOUND`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Units", into = "Units")]
pub struct BoundPercent<const UPPER_BOUND: Units>(Units);

impl<const UPPER_BOUND: Units> BoundPercent<UPPER_BOUND> {
    pub const ZERO: Self = Self(0);

    pub const HUNDRED: Self = Self(HUNDRED_UNITS);

    pub const MAX: Self = Self(UPPER_BOUND);

    #[track_caller]
    pub const fn from_bps(units: Units) -> Self {
        debug_assert!(units <= UPPER_BOUND);

        Self(units)
    }

    #[track_caller]
    pub const fn from_percent(percent: Units) -> Self {
        Self::from_bps(percent * 100)
    }

    pub const fn units(&self) -> Units {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0
            .checked_add(rhs.0)
            .filter(|&sum| sum <= UPPER_BOUND)
            .map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// The part of `whole` this percentage denotes, truncating.
    ///
    /// `None` on multiplication overflow.
    #[track_caller]
    pub fn of<A>(&self, whole: A) -> Option<A>
    where
        A: Fractionable,
    {
        SimpleFraction::new(self.0, HUNDRED_UNITS).of(whole)
    }
}

impl<const UPPER_BOUND: Units> Zero for BoundPercent<UPPER_BOUND> {
    const ZERO: Self = Self::ZERO;
}

impl<const UPPER_BOUND: Units> TryFrom<Units> for BoundPercent<UPPER_BOUND> {
    type Error = Error;

    fn try_from(units: Units) -> Result<Self> {
        if units <= UPPER_BOUND {
            Ok(Self(units))
        } else {
            Err(Error::UpperBoundCrossed {
                bound: UPPER_BOUND,
                value: units,
            })
        }
    }
}

impl<const UPPER_BOUND: Units> From<BoundPercent<UPPER_BOUND>> for Units {
    fn from(percent: BoundPercent<UPPER_BOUND>) -> Self {
        percent.units()
    }
}

impl<const UPPER_BOUND: Units> Sub for BoundPercent<UPPER_BOUND> {
    type Output = Self;

    #[track_caller]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.sub(rhs.0))
    }
}

impl<const UPPER_BOUND: Units> Display for BoundPercent<UPPER_BOUND> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let whole = self.0 / 100;
        let fraction = self.0 % 100;

        if fraction == 0 {
            f.write_fmt(format_args!("{whole}%"))
        } else if fraction % 10 == 0 {
            f.write_fmt(format_args!("{whole}.{}%", fraction / 10))
        } else {
            f.write_fmt(format_args!("{whole}.{fraction:02}%"))
        }
    }
}
