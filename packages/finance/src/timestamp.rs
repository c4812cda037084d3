use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

use crate::duration::Duration;

/// A point in time, in unix seconds.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    pub const fn seconds(&self) -> u64 {
        self.0
    }

    /// The start of the `window`-wide bucket this instant falls into.
    #[track_caller]
    pub fn floor_to(&self, window: Duration) -> Self {
        debug_assert!(!window.is_zero());

        Self(self.0 - self.0 % window.secs())
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    #[track_caller]
    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.add(rhs.secs()))
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    #[track_caller]
    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0.sub(rhs.secs()))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}
