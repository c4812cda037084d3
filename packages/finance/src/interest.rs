use crate::{
    coin::{Amount, Coin},
    duration::Duration,
    fraction::SimpleFraction,
    percent::Percent,
};

const RATE_DENOM: Amount =
    Duration::YEAR.secs() as Amount * Percent::HUNDRED.units() as Amount;

/// Simple interest accrued on `principal` at the annualized `rate` over `period`.
///
/// Computed as `principal * rate * period / (year * 100%)` with a single
/// truncation, the fraction reduced up front. `None` on overflow.
pub fn interest(rate: Percent, principal: Coin, period: Duration) -> Option<Coin> {
    // u32 units by u64 seconds, always fits the 128-bit intermediate
    let rate_time = Amount::from(rate.units()) * Amount::from(period.secs());

    SimpleFraction::new(rate_time, RATE_DENOM).of(principal)
}

#[cfg(test)]
mod tests {
    use crate::{coin::Coin, duration::Duration, percent::Percent, zero::Zero};

    use super::interest;

    #[test]
    fn full_year() {
        assert_eq!(
            Some(Coin::new(125_000)),
            interest(
                Percent::from_bps(1_250),
                Coin::new(1_000_000),
                Duration::YEAR
            )
        );
        assert_eq!(
            Some(Coin::new(50)),
            interest(Percent::from_percent(50), Coin::new(100), Duration::YEAR)
        );
    }

    #[test]
    fn an_hour() {
        // 50% annualized on 50_000_000_000 for one hour
        assert_eq!(
            Some(Coin::new(2_853_881)),
            interest(
                Percent::from_percent(50),
                Coin::new(50_000_000_000),
                Duration::HOUR
            )
        );
    }

    #[test]
    fn zero_rate() {
        assert_eq!(
            Some(Coin::ZERO),
            interest(Percent::ZERO, Coin::new(1_001), Duration::YEAR)
        );
    }

    #[test]
    fn zero_period() {
        assert_eq!(
            Some(Coin::ZERO),
            interest(
                Percent::from_percent(10),
                Coin::new(1_001),
                Duration::from_secs(0)
            )
        );
    }

    #[test]
    fn zero_principal() {
        assert_eq!(
            Some(Coin::ZERO),
            interest(Percent::from_percent(10), Coin::ZERO, Duration::YEAR)
        );
    }

    #[test]
    fn truncates_down() {
        // 10% of 9 over a year is 0.9, truncated
        assert_eq!(
            Some(Coin::ZERO),
            interest(Percent::from_percent(10), Coin::new(9), Duration::YEAR)
        );
    }
}
