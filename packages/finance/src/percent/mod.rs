use crate::error::Error;

pub use self::bound::BoundPercent;

pub mod bound;

pub const MAX_BOUND: Units = Units::MAX;

pub type Units = u32;

/// An annualized rate or an unbounded share, in basis points.
pub type Percent = BoundPercent<MAX_BOUND>;

/// A share of a whole, capped at 100%, in basis points.
pub type Percent100 = BoundPercent<10_000>;

impl From<Percent100> for Percent {
    fn from(percent: Percent100) -> Self {
        Self::from_bps(percent.units())
    }
}

impl TryFrom<Percent> for Percent100 {
    type Error = Error;

    fn try_from(percent: Percent) -> Result<Self, Self::Error> {
        percent.units().try_into()
    }
}
