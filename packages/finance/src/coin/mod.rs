use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::zero::Zero;

mod amount_serde;

pub type Amount = u128;

/// An asset quantity in the token's smallest denomination.
///
/// Serialized as a decimal string so that JSON consumers do not lose
/// precision on amounts beyond 2^53.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coin(#[serde(with = "amount_serde")] Amount);

impl Coin {
    pub const fn new(amount: Amount) -> Self {
        Self(amount)
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == Amount::ZERO
    }

    #[track_caller]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[track_caller]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    #[track_caller]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    #[track_caller]
    pub fn checked_mul(self, rhs: Amount) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    #[track_caller]
    pub fn checked_div(self, rhs: Amount) -> Option<Self> {
        self.0.checked_div(rhs).map(Self)
    }
}

impl Zero for Coin {
    const ZERO: Self = Self(Amount::ZERO);
}

impl From<Amount> for Coin {
    fn from(amount: Amount) -> Self {
        Self(amount)
    }
}

impl From<Coin> for Amount {
    fn from(coin: Coin) -> Self {
        coin.0
    }
}

impl Add for Coin {
    type Output = Self;

    #[track_caller]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.add(rhs.0))
    }
}

impl AddAssign for Coin {
    #[track_caller]
    fn add_assign(&mut self, rhs: Self) {
        *self = self.add(rhs);
    }
}

impl Sub for Coin {
    type Output = Self;

    #[track_caller]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.sub(rhs.0))
    }
}

impl SubAssign for Coin {
    #[track_caller]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.sub(rhs);
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}
