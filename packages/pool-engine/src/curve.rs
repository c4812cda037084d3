use serde::{Deserialize, Serialize};

use finance::{
    coin::{Amount, Coin},
    fraction::SimpleFraction,
    percent::{Percent, Percent100},
};

use crate::error::{Error, Result};

/// The share of supplied assets currently lent out, truncating, capped at
/// 100% should rounding drift ever push the borrow side above the supply
/// side. An empty pool is idle by definition.
pub fn utilization(total_supply: Coin, total_borrow: Coin) -> Result<Percent100> {
    if total_supply.is_zero() {
        return Ok(Percent100::ZERO);
    }

    SimpleFraction::new(Amount::from(total_borrow), Amount::from(total_supply))
        .of(Percent::HUNDRED)
        .ok_or_else(|| Error::overflow("utilization"))
        .map(|raw| {
            Percent100::try_from(raw.min(Percent::HUNDRED))
                .expect("a rate capped at 100% fits the bound")
        })
}

/// Two-slope interest rate curve with a kink at the target utilization.
///
/// Below the kink the borrow rate climbs gently, `slope1` spread over the
/// whole target range; past it, `slope2` is spread over the remaining
/// utilization span, pricing scarcity steeply to push borrowing back down.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedInterestRateModel")]
pub struct InterestRateModel {
    base_rate: Percent,
    slope1: Percent,
    slope2: Percent,
    kink: Percent100,
    reserve_factor: Percent100,
}

impl InterestRateModel {
    pub fn try_new(
        base_rate: Percent,
        slope1: Percent,
        slope2: Percent,
        kink: Percent100,
        reserve_factor: Percent100,
    ) -> Result<Self> {
        let model = Self {
            base_rate,
            slope1,
            slope2,
            kink,
            reserve_factor,
        };

        if model.validate() {
            Ok(model)
        } else {
            Err(Error::invalid_model(
                "the kink must lay strictly between zero and a hundred percent",
            ))
        }
    }

    pub const fn base_rate(&self) -> Percent {
        self.base_rate
    }

    pub const fn slope1(&self) -> Percent {
        self.slope1
    }

    pub const fn slope2(&self) -> Percent {
        self.slope2
    }

    pub const fn kink(&self) -> Percent100 {
        self.kink
    }

    pub const fn reserve_factor(&self) -> Percent100 {
        self.reserve_factor
    }

    /// The annualized borrow rate at the given utilization. Not capped from
    /// above; anomalous utilization yields an anomalous, yet exact, rate.
    pub fn borrow_rate(&self, utilization: Percent100) -> Result<Percent> {
        let addon = if utilization <= self.kink {
            SimpleFraction::new(utilization.units(), self.kink.units()).of(self.slope1)
        } else {
            let over_kink = utilization - self.kink;
            let span = Percent100::HUNDRED - self.kink;

            SimpleFraction::new(over_kink.units(), span.units())
                .of(self.slope2)
                .and_then(|scarcity| self.slope1.checked_add(scarcity))
        };

        addon
            .and_then(|addon| self.base_rate.checked_add(addon))
            .ok_or_else(|| Error::overflow("borrow rate"))
    }

    /// The annualized rate suppliers earn: the borrower-paid rate scaled
    /// down to the utilized share, net of the protocol reserve cut.
    pub fn supply_rate(&self, utilization: Percent100, borrow_rate: Percent) -> Result<Percent> {
        utilization
            .of(borrow_rate)
            .and_then(|earned| (Percent100::HUNDRED - self.reserve_factor).of(earned))
            .ok_or_else(|| Error::overflow("supply rate"))
    }

    fn validate(&self) -> bool {
        !self.kink.is_zero() && self.kink < Percent100::HUNDRED
    }
}

impl TryFrom<UncheckedInterestRateModel> for InterestRateModel {
    type Error = Error;

    fn try_from(unchecked: UncheckedInterestRateModel) -> Result<Self> {
        Self::try_new(
            unchecked.base_rate,
            unchecked.slope1,
            unchecked.slope2,
            unchecked.kink,
            unchecked.reserve_factor,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
struct UncheckedInterestRateModel {
    base_rate: Percent,
    slope1: Percent,
    slope2: Percent,
    kink: Percent100,
    #[serde(default)]
    reserve_factor: Percent100,
}
