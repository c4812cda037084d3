use crate::{
    coin::Amount,
    percent::{Percent, Units},
};

/// The fixed-point scale the per-period growth factor is carried at.
const SCALE: Amount = 1_000_000_000_000_000_000;

const HUNDRED_UNITS: Amount = Percent::HUNDRED.units() as Amount;

/// The effective annual yield of a nominal `rate` compounded `periods` times
/// a year: `(1 + rate / periods)^periods - 1`.
///
/// Carried out entirely in 1e18 fixed point, truncating. Monotonic in `rate`.
/// `periods <= 1` leaves the rate as-is; overflow saturates to
/// [`Percent::MAX`], it never wraps.
pub fn apy(rate: Percent, periods: u32) -> Percent {
    if periods <= 1 {
        return rate;
    }

    let per_period =
        Amount::from(rate.units()) * SCALE / (HUNDRED_UNITS * Amount::from(periods));

    match pow_scaled(SCALE + per_period, periods) {
        Some(compounded) => {
            debug_assert!(compounded >= SCALE);

            let gain = compounded - SCALE;
            match gain.checked_mul(HUNDRED_UNITS) {
                Some(scaled) => {
                    Units::try_from(scaled / SCALE).map_or(Percent::MAX, Percent::from_bps)
                }
                None => Percent::MAX,
            }
        }
        None => Percent::MAX,
    }
}

/// `base^exp` at the [`SCALE`] fixed point, by binary exponentiation.
fn pow_scaled(mut base: Amount, mut exp: u32) -> Option<Amount> {
    let mut result = SCALE;

    loop {
        if exp & 1 == 1 {
            result = mul_scaled(result, base)?;
        }

        exp >>= 1;
        if exp == 0 {
            break Some(result);
        }

        base = mul_scaled(base, base)?;
    }
}

fn mul_scaled(lhs: Amount, rhs: Amount) -> Option<Amount> {
    lhs.checked_mul(rhs).map(|product| product / SCALE)
}
