use std::fmt::Debug;

use gcd::Gcd;

use crate::{
    coin::{Amount, Coin},
    percent::{Percent, Units as PercentUnits},
    zero::Zero,
};

/// A unit a fraction may be expressed in.
pub trait FractionUnit
where
    Self: Copy + Debug + Ord + Zero + Into<Amount>,
{
}

impl FractionUnit for PercentUnits {}
impl FractionUnit for u64 {}
impl FractionUnit for Amount {}

/// Values a fraction may be applied to.
///
/// The multiplication is carried out over [`Amount`]-wide intermediates,
/// reduced to coprime factors beforehand so that precision is never given up
/// for range. A product that still does not fit is an overflow, reported as
/// `None`, never wrapped.
pub trait Fractionable
where
    Self: Sized,
{
    fn into_max(self) -> Amount;

    fn try_from_max(max: Amount) -> Option<Self>;
}

impl Fractionable for Amount {
    fn into_max(self) -> Amount {
        self
    }

    fn try_from_max(max: Amount) -> Option<Self> {
        Some(max)
    }
}

impl Fractionable for Coin {
    fn into_max(self) -> Amount {
        self.into()
    }

    fn try_from_max(max: Amount) -> Option<Self> {
        Some(Self::new(max))
    }
}

impl Fractionable for Percent {
    fn into_max(self) -> Amount {
        self.units().into()
    }

    fn try_from_max(max: Amount) -> Option<Self> {
        PercentUnits::try_from(max).ok().map(Self::from_bps)
    }
}

/// A ratio of two like units. May exceed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleFraction<U> {
    nominator: U,
    denominator: U,
}

impl<U> SimpleFraction<U>
where
    U: FractionUnit,
{
    #[track_caller]
    pub fn new(nominator: U, denominator: U) -> Self {
        debug_assert_ne!(denominator, Zero::ZERO);

        Self {
            nominator,
            denominator,
        }
    }

    pub fn nominator(&self) -> U {
        self.nominator
    }

    pub fn denominator(&self) -> U {
        self.denominator
    }

    /// `whole * nominator / denominator`, truncating once.
    #[track_caller]
    pub fn of<A>(&self, whole: A) -> Option<A>
    where
        A: Fractionable,
    {
        let parts: Amount = self.nominator.into();
        let total: Amount = self.denominator.into();

        if parts == total {
            return Some(whole);
        }

        let (whole_red, total) = into_coprime(whole.into_max(), total);
        let (parts, total) = into_coprime(parts, total);

        whole_red
            .checked_mul(parts)
            .map(|product| product / total)
            .and_then(A::try_from_max)
    }
}

/// Divides both values by their greatest common divisor.
///
/// The reduction is exact, hence the represented rational, and any floor
/// computed from it, are unchanged.
pub(crate) fn into_coprime(a: Amount, b: Amount) -> (Amount, Amount) {
    debug_assert_ne!(b, 0);

    let gcd = a.gcd(b);

    debug_assert_ne!(gcd, 0);

    (a / gcd, b / gcd)
}
