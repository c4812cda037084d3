use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

pub type Units = u64;

/// A timespan between two [`Timestamp`]s, in whole seconds.
///
/// Block timestamps come at second resolution, hence no sub-second units.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize,
)]
pub struct Duration(Units);

impl Duration {
    const SECONDS_IN_MINUTE: Units = 60;
    const SECONDS_IN_HOUR: Units = Self::SECONDS_IN_MINUTE * Self::MINUTES_IN_HOUR;
    const SECONDS_IN_DAY: Units = Self::SECONDS_IN_HOUR * Self::HOURS_IN_DAY;

    const MINUTES_IN_HOUR: Units = 60;
    const HOURS_IN_DAY: Units = 24;

    pub const HOUR: Duration = Self::from_hours(1);

    pub const YEAR: Duration = Self::from_days(365);

    pub const MAX: Duration = Self::from_secs(Units::MAX);

    pub const fn from_secs(secs: Units) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: u16) -> Self {
        Self::from_secs(minutes as Units * Self::SECONDS_IN_MINUTE)
    }

    pub const fn from_hours(hours: u16) -> Self {
        Self::from_secs(hours as Units * Self::SECONDS_IN_HOUR)
    }

    pub const fn from_days(days: u16) -> Self {
        Self::from_secs(days as Units * Self::SECONDS_IN_DAY)
    }

    #[track_caller]
    pub fn between(start: &Timestamp, end: &Timestamp) -> Self {
        debug_assert!(start <= end);

        Self(end.seconds() - start.seconds())
    }

    pub const fn secs(&self) -> Units {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_mul(&self, rhs: u16) -> Option<Self> {
        self.secs().checked_mul(rhs.into()).map(Self::from_secs)
    }
}

impl Add<Duration> for Duration {
    type Output = Self;

    #[track_caller]
    fn add(self, rhs: Duration) -> Self::Output {
        Self::from_secs(self.secs().add(rhs.secs()))
    }
}

impl Sub<Duration> for Duration {
    type Output = Self;

    #[track_caller]
    fn sub(self, rhs: Duration) -> Self::Output {
        Self::from_secs(self.secs().sub(rhs.secs()))
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_fmt(format_args!("{} {}", self.secs(), "sec"))
    }
}
